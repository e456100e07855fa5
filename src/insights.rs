//! Destination insights: weather, visa, currency and flight prices.
//!
//! Each helper is an independent provider call. [`Insights::gather`] runs
//! all four at once and keeps every outcome separate, so one provider
//! failing never hides the others. No sample data is substituted here.

use std::sync::Arc;

use tripsync_client::types::{
    CurrencyConversion, CurrencyRequest, FlightPriceEstimate, FlightPriceRequest, VisaRequest,
    VisaRequirements, WeatherForecast, WeatherRequest,
};
use tripsync_client::{CurrencyProvider, FlightPriceProvider, VisaProvider, WeatherProvider};

use crate::error::{Result, SyncError};

/// Everything the destination page asks about at once.
#[derive(Debug, Clone, PartialEq)]
pub struct InsightsRequest {
    pub weather: WeatherRequest,
    pub visa: VisaRequest,
    pub currency: CurrencyRequest,
    pub flight: FlightPriceRequest,
}

/// Per-provider outcomes of [`Insights::gather`].
#[derive(Debug)]
pub struct TripInsights {
    pub weather: Result<WeatherForecast>,
    pub visa: Result<VisaRequirements>,
    pub currency: Result<CurrencyConversion>,
    pub flight: Result<FlightPriceEstimate>,
}

impl TripInsights {
    pub fn failures(&self) -> usize {
        [
            self.weather.is_err(),
            self.visa.is_err(),
            self.currency.is_err(),
            self.flight.is_err(),
        ]
        .into_iter()
        .filter(|failed| *failed)
        .count()
    }
}

#[derive(Clone)]
pub struct Insights {
    weather: Arc<dyn WeatherProvider>,
    visa: Arc<dyn VisaProvider>,
    currency: Arc<dyn CurrencyProvider>,
    flights: Arc<dyn FlightPriceProvider>,
}

impl Insights {
    pub fn new(
        weather: Arc<dyn WeatherProvider>,
        visa: Arc<dyn VisaProvider>,
        currency: Arc<dyn CurrencyProvider>,
        flights: Arc<dyn FlightPriceProvider>,
    ) -> Self {
        Self {
            weather,
            visa,
            currency,
            flights,
        }
    }

    /// One value implementing every provider.
    pub fn from_provider<P>(provider: Arc<P>) -> Self
    where
        P: WeatherProvider + VisaProvider + CurrencyProvider + FlightPriceProvider + 'static,
    {
        Self::new(provider.clone(), provider.clone(), provider.clone(), provider)
    }

    #[tracing::instrument(name = "insights.weather", skip_all, fields(city = %request.city))]
    pub async fn weather(&self, request: &WeatherRequest) -> Result<WeatherForecast> {
        if request.city.trim().is_empty() {
            return Err(SyncError::validation("city", "Please enter a city"));
        }
        self.weather
            .forecast(request)
            .await
            .map_err(SyncError::from)
    }

    #[tracing::instrument(name = "insights.visa", skip_all, fields(destination = %request.destination))]
    pub async fn visa(&self, request: &VisaRequest) -> Result<VisaRequirements> {
        if request.nationality.trim().is_empty() {
            return Err(SyncError::validation(
                "nationality",
                "Please select your nationality",
            ));
        }
        self.visa
            .requirements(request)
            .await
            .map_err(SyncError::from)
    }

    #[tracing::instrument(name = "insights.currency", skip_all, fields(from = %request.from, to = %request.to))]
    pub async fn convert(&self, request: &CurrencyRequest) -> Result<CurrencyConversion> {
        if !(request.amount.is_finite() && request.amount > 0.0) {
            return Err(SyncError::validation(
                "amount",
                "Please enter a valid amount",
            ));
        }
        self.currency
            .convert(request)
            .await
            .map_err(SyncError::from)
    }

    #[tracing::instrument(name = "insights.flight_price", skip_all, fields(from = %request.from, to = %request.to))]
    pub async fn flight_price(&self, request: &FlightPriceRequest) -> Result<FlightPriceEstimate> {
        if request.return_date.is_some_and(|back| back < request.departure_date) {
            return Err(SyncError::validation(
                "return_date",
                "Return date must be after departure",
            ));
        }
        self.flights
            .estimate(request)
            .await
            .map_err(SyncError::from)
    }

    /// Run all four lookups concurrently.
    pub async fn gather(&self, request: &InsightsRequest) -> TripInsights {
        let (weather, visa, currency, flight) = tokio::join!(
            self.weather(&request.weather),
            self.visa(&request.visa),
            self.convert(&request.currency),
            self.flight_price(&request.flight),
        );
        TripInsights {
            weather,
            visa,
            currency,
            flight,
        }
    }
}
