//! Application entry point.
//!
//! [`TripSync`] owns the row backend and the provider client for the life
//! of the process. Everything user-facing is reached through it: the
//! session-scoped [`Services`] bundle, the recommendation feed and the
//! insight helpers.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};
use tripsync_client::types::{
    CurrencyConversion, CurrencyRequest, Destination, FlightPriceEstimate, FlightPriceRequest,
    RecommendationRequest, VisaRequest, VisaRequirements, WeatherForecast, WeatherRequest,
};
use tripsync_client::{
    CurrencyProvider, FlightPriceProvider, HttpProviderClient, ProviderError,
    RecommendationProvider, VisaProvider, WeatherProvider,
};

use crate::config::{Config, RealtimeConfig};
use crate::error::{Result, SyncError};
use crate::insights::Insights;
use crate::interfaces::RowBackend;
use crate::model::Session;
use crate::recommendations::RecommendationFeed;
use crate::services::Services;
use crate::storage::{init_storage, SessionStore};

/// Stands in for the providers when no base URL is configured. Every call
/// fails with a configuration error, which the consumers handle like any
/// other provider failure.
struct Unconfigured;

impl Unconfigured {
    fn error() -> ProviderError {
        ProviderError::Config("providers.base_url is not set".to_string())
    }
}

#[async_trait]
impl RecommendationProvider for Unconfigured {
    async fn recommend(&self, _: &RecommendationRequest) -> tripsync_client::Result<Vec<Destination>> {
        Err(Self::error())
    }
}

#[async_trait]
impl WeatherProvider for Unconfigured {
    async fn forecast(&self, _: &WeatherRequest) -> tripsync_client::Result<WeatherForecast> {
        Err(Self::error())
    }
}

#[async_trait]
impl VisaProvider for Unconfigured {
    async fn requirements(&self, _: &VisaRequest) -> tripsync_client::Result<VisaRequirements> {
        Err(Self::error())
    }
}

#[async_trait]
impl CurrencyProvider for Unconfigured {
    async fn convert(&self, _: &CurrencyRequest) -> tripsync_client::Result<CurrencyConversion> {
        Err(Self::error())
    }
}

#[async_trait]
impl FlightPriceProvider for Unconfigured {
    async fn estimate(&self, _: &FlightPriceRequest) -> tripsync_client::Result<FlightPriceEstimate> {
        Err(Self::error())
    }
}

#[derive(Clone)]
pub struct TripSync {
    backend: Arc<dyn RowBackend>,
    recommender: Arc<dyn RecommendationProvider>,
    insights: Insights,
    realtime: RealtimeConfig,
}

impl TripSync {
    /// Build the configured backend and provider client.
    pub async fn open(config: &Config) -> Result<Self> {
        let backend = init_storage(&config.storage).await?;

        if config.providers.is_configured() {
            let client = Arc::new(HttpProviderClient::new(config.providers.client_config())?);
            info!(base_url = %config.providers.base_url, "Providers: http");
            Ok(Self::with_providers(backend, client, config.realtime.clone()))
        } else {
            warn!("Providers not configured; recommendations will use sample data");
            Ok(Self::with_providers(
                backend,
                Arc::new(Unconfigured),
                config.realtime.clone(),
            ))
        }
    }

    /// Assemble from parts. One value serves every provider role.
    pub fn with_providers<P>(
        backend: Arc<dyn RowBackend>,
        providers: Arc<P>,
        realtime: RealtimeConfig,
    ) -> Self
    where
        P: RecommendationProvider
            + WeatherProvider
            + VisaProvider
            + CurrencyProvider
            + FlightPriceProvider
            + 'static,
    {
        Self {
            backend,
            recommender: providers.clone(),
            insights: Insights::from_provider(providers),
            realtime,
        }
    }

    /// Services acting as the signed-in user.
    pub fn services(&self, session: Option<Session>) -> Result<Services> {
        let session =
            session.ok_or_else(|| SyncError::NotAuthorized("sign in required".to_string()))?;
        let store = Arc::new(SessionStore::new(self.backend.clone(), session));
        Ok(Services::new(store, self.realtime.clone()))
    }

    /// A fresh feed for one results view.
    pub fn feed(&self) -> RecommendationFeed {
        RecommendationFeed::new(self.recommender.clone())
    }

    pub fn insights(&self) -> &Insights {
        &self.insights
    }

    pub fn backend(&self) -> &Arc<dyn RowBackend> {
        &self.backend
    }
}
