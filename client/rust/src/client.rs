//! HTTP client for the provider functions.
//!
//! Each provider is a serverless function reached by POSTing a JSON body to
//! `{base_url}/{function}`. Transient failures (timeouts, connect errors,
//! 429 and 5xx) are retried with exponential backoff.

use std::time::Duration;

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::error::{ProviderError, Result};
use crate::traits::{
    CurrencyProvider, FlightPriceProvider, RecommendationProvider, VisaProvider, WeatherProvider,
};
use crate::types::{
    CurrencyConversion, CurrencyRequest, Destination, FlightPriceEstimate, FlightPriceRequest,
    RecommendationRequest, RecommendationResponse, VisaRequest, VisaRequirements,
    WeatherForecast, WeatherRequest,
};

/// Function names appended to the base URL.
pub mod functions {
    pub const RECOMMENDATIONS: &str = "travel-recommendations";
    pub const WEATHER: &str = "weather-forecast";
    pub const VISA: &str = "visa-checker";
    pub const CURRENCY: &str = "currency-convert";
    pub const FLIGHT_PRICE: &str = "flight-price-tracker";
}

/// Provider client configuration.
#[derive(Debug, Clone)]
pub struct ProviderClientConfig {
    /// Functions base URL, e.g. `https://<project>.functions.example/v1`.
    pub base_url: String,

    /// API key sent as bearer token and `apikey` header.
    pub api_key: Option<String>,

    /// Request timeout.
    pub timeout: Duration,

    /// Maximum retries for transient failures.
    pub max_retries: usize,
}

impl Default for ProviderClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: None,
            timeout: Duration::from_secs(60),
            max_retries: 3,
        }
    }
}

impl ProviderClientConfig {
    /// Create config from environment variables.
    ///
    /// - `TRIPSYNC_PROVIDER_URL`: Required functions base URL
    /// - `TRIPSYNC_PROVIDER_KEY`: Optional API key
    /// - `TRIPSYNC_PROVIDER_TIMEOUT`: Optional timeout in seconds (default: 60)
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("TRIPSYNC_PROVIDER_URL")
            .map_err(|_| ProviderError::Config("TRIPSYNC_PROVIDER_URL not set".to_string()))?;

        let timeout_secs = std::env::var("TRIPSYNC_PROVIDER_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);

        Ok(Self {
            base_url,
            api_key: std::env::var("TRIPSYNC_PROVIDER_KEY").ok(),
            timeout: Duration::from_secs(timeout_secs),
            ..Self::default()
        })
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry budget.
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }
}

/// Error body returned by the provider functions.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client implementing every provider trait.
#[derive(Debug, Clone)]
pub struct HttpProviderClient {
    client: Client,
    config: ProviderClientConfig,
}

impl HttpProviderClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ProviderClientConfig) -> Result<Self> {
        if config.base_url.is_empty() {
            return Err(ProviderError::Config(
                "provider base URL not configured".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ProviderError::Http)?;

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ProviderClientConfig::from_env()?)
    }

    /// Backoff configuration for retries.
    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(200))
            .with_max_delay(Duration::from_secs(5))
            .with_max_times(self.config.max_retries)
            .with_jitter()
    }

    fn endpoint(&self, function: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), function)
    }

    /// Map a non-success status and its body to a provider error.
    fn status_error(status: StatusCode, body: &str) -> ProviderError {
        let message = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.error)
            .unwrap_or_else(|_| body.chars().take(200).collect());

        match status {
            StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited(message),
            StatusCode::PAYMENT_REQUIRED => ProviderError::PaymentRequired(message),
            _ => ProviderError::Status { status, message },
        }
    }

    /// POST once and decode the body.
    async fn post_once<Req, Resp>(&self, function: &str, body: &Req) -> Result<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned + Send,
    {
        let url = self.endpoint(function);
        let mut request = self.client.post(&url).json(body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key).header("apikey", key);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            debug!(function, status = %status, "provider call succeeded");
            return Ok(serde_json::from_str(&text)?);
        }

        let err = Self::status_error(status, &text);
        if err.is_retryable() {
            warn!(function, status = %status, error = %err, "provider returned retryable status");
        } else {
            error!(function, status = %status, error = %err, "provider call failed");
        }
        Err(err)
    }

    /// POST with retry on transient failures.
    #[tracing::instrument(name = "provider.call", skip_all, fields(function = %function))]
    async fn call<Req, Resp>(&self, function: &str, body: &Req) -> Result<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned + Send,
    {
        (|| async { self.post_once(function, body).await })
            .retry(self.backoff())
            .when(ProviderError::is_retryable)
            .await
    }
}

#[async_trait]
impl RecommendationProvider for HttpProviderClient {
    async fn recommend(&self, request: &RecommendationRequest) -> Result<Vec<Destination>> {
        let response: RecommendationResponse =
            self.call(functions::RECOMMENDATIONS, request).await?;
        if response.destinations.is_empty() {
            return Err(ProviderError::Malformed(
                "no destinations in response".to_string(),
            ));
        }
        Ok(response.destinations)
    }
}

#[async_trait]
impl WeatherProvider for HttpProviderClient {
    async fn forecast(&self, request: &WeatherRequest) -> Result<WeatherForecast> {
        self.call(functions::WEATHER, request).await
    }
}

#[async_trait]
impl VisaProvider for HttpProviderClient {
    async fn requirements(&self, request: &VisaRequest) -> Result<VisaRequirements> {
        self.call(functions::VISA, request).await
    }
}

#[async_trait]
impl CurrencyProvider for HttpProviderClient {
    async fn convert(&self, request: &CurrencyRequest) -> Result<CurrencyConversion> {
        if request.amount <= 0.0 {
            return Err(ProviderError::Config(
                "amount must be greater than zero".to_string(),
            ));
        }
        self.call(functions::CURRENCY, request).await
    }
}

#[async_trait]
impl FlightPriceProvider for HttpProviderClient {
    async fn estimate(&self, request: &FlightPriceRequest) -> Result<FlightPriceEstimate> {
        self.call(functions::FLIGHT_PRICE, request).await
    }
}
