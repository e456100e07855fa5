//! Typed clients for the tripsync provider functions.
//!
//! Five single-call, single-response providers sit behind this crate:
//! destination recommendations, weather forecasts, visa requirements,
//! currency conversion and flight price estimates. Each one has a trait in
//! [`traits`] and a shared HTTP implementation in [`client`].
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tripsync_client::{HttpProviderClient, ProviderClientConfig, WeatherProvider};
//! use tripsync_client::types::WeatherRequest;
//!
//! async fn example() -> tripsync_client::Result<()> {
//!     let client = HttpProviderClient::new(
//!         ProviderClientConfig::default().with_base_url("https://fn.example/v1"),
//!     )?;
//!     let forecast = client.forecast(&WeatherRequest::new("Manali")).await?;
//!     println!("{} now: {}°C", forecast.location.city, forecast.current.temp);
//!     Ok(())
//! }
//! ```
//!
//! # Mocking for Tests
//!
//! Implement the provider traits directly:
//!
//! ```rust,ignore
//! use tripsync_client::{ProviderError, RecommendationProvider};
//! use tripsync_client::types::{Destination, RecommendationRequest};
//! use async_trait::async_trait;
//!
//! struct Offline;
//!
//! #[async_trait]
//! impl RecommendationProvider for Offline {
//!     async fn recommend(&self, _: &RecommendationRequest)
//!         -> tripsync_client::Result<Vec<Destination>>
//!     {
//!         Err(ProviderError::Malformed("offline".into()))
//!     }
//! }
//! ```

pub mod client;
pub mod error;
pub mod traits;
pub mod types;

pub use client::{HttpProviderClient, ProviderClientConfig};
pub use error::{ProviderError, Result};
pub use reqwest::StatusCode;
pub use traits::{
    CurrencyProvider, FlightPriceProvider, RecommendationProvider, VisaProvider, WeatherProvider,
};
