//! Provider traits.
//!
//! Each external helper is a single request/response call. The HTTP client
//! implements all of them; tests and alternative transports implement only
//! the ones they need.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    CurrencyConversion, CurrencyRequest, Destination, FlightPriceEstimate, FlightPriceRequest,
    RecommendationRequest, VisaRequest, VisaRequirements, WeatherForecast, WeatherRequest,
};

/// Destination recommendations for a set of trip preferences.
///
/// Slow (seconds-scale) and fallible. An empty or undecodable answer is
/// reported as `ProviderError::Malformed`, never as an empty success.
#[async_trait]
pub trait RecommendationProvider: Send + Sync {
    async fn recommend(&self, request: &RecommendationRequest) -> Result<Vec<Destination>>;
}

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn forecast(&self, request: &WeatherRequest) -> Result<WeatherForecast>;
}

#[async_trait]
pub trait VisaProvider: Send + Sync {
    async fn requirements(&self, request: &VisaRequest) -> Result<VisaRequirements>;
}

#[async_trait]
pub trait CurrencyProvider: Send + Sync {
    async fn convert(&self, request: &CurrencyRequest) -> Result<CurrencyConversion>;
}

#[async_trait]
pub trait FlightPriceProvider: Send + Sync {
    async fn estimate(&self, request: &FlightPriceRequest) -> Result<FlightPriceEstimate>;
}
