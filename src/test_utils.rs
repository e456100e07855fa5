//! Test utilities and mock implementations.
//!
//! [`Sandbox`] wires an in-memory backend to per-user session stores so
//! tests can act as several signed-in users against one shared store.
//! [`MockProviders`] stands in for every external provider.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tripsync_client::types::{
    CurrencyConversion, CurrencyRequest, CurrentWeather, Destination, FlightPriceEstimate,
    FlightPriceRequest, ForecastDay, PriceRange, RecommendationRequest, Restaurant, VisaRequest,
    VisaRequirements, WeatherForecast, WeatherLocation, WeatherRequest, WeatherSummary,
};
use tripsync_client::{
    CurrencyProvider, FlightPriceProvider, ProviderError, RecommendationProvider, StatusCode,
    VisaProvider, WeatherProvider,
};
use uuid::Uuid;

use crate::config::{Config, RealtimeConfig};
use crate::interfaces::{Filter, Row, RowBackend, RowStore, Table};
use crate::model::{CreateGroup, GroupMember, MemberRole, NewMember, Session, TripGroup};
use crate::repository::Repository;
use crate::services::Services;
use crate::storage::{MemoryBackend, SessionStore};

/// Build a row from a JSON object literal.
pub fn row(value: Value) -> Row {
    value.as_object().cloned().unwrap_or_default()
}

/// A session for a fresh user id.
pub fn session(email: &str) -> Session {
    Session::new(Uuid::new_v4(), email)
}

/// Shared in-memory store acted on by any number of users.
pub struct Sandbox {
    pub backend: Arc<MemoryBackend>,
    pub realtime: RealtimeConfig,
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::new()
    }
}

impl Sandbox {
    pub fn new() -> Self {
        Self::with_backend(Arc::new(MemoryBackend::new()))
    }

    pub fn with_backend(backend: Arc<MemoryBackend>) -> Self {
        Self {
            backend,
            realtime: Config::for_test().realtime,
        }
    }

    /// Session store acting as `session`.
    pub fn store(&self, session: &Session) -> Arc<dyn RowStore> {
        let backend: Arc<dyn RowBackend> = self.backend.clone();
        Arc::new(SessionStore::new(backend, session.clone()))
    }

    pub fn services(&self, session: &Session) -> Services {
        Services::new(self.store(session), self.realtime.clone())
    }

    /// New user with a registered profile.
    pub async fn sign_up(&self, email: &str, full_name: Option<&str>) -> Session {
        let session = session(email);
        self.services(&session)
            .accounts()
            .register(full_name)
            .await
            .expect("profile registration failed");
        session
    }

    /// Group owned by `owner`.
    pub async fn group(&self, owner: &Session, name: &str, total_budget: Option<f64>) -> TripGroup {
        self.services(owner)
            .groups()
            .create(CreateGroup {
                name: name.to_string(),
                total_budget,
                ..CreateGroup::default()
            })
            .await
            .expect("group creation failed")
    }

    /// `manager` adds `member` to the group directly, skipping invitations.
    pub async fn join(&self, manager: &Session, group_id: Uuid, member: &Session) -> GroupMember {
        Repository::<GroupMember>::new(self.store(manager))
            .insert(&NewMember {
                group_id,
                user_id: member.user_id,
                role: MemberRole::Member,
            })
            .await
            .expect("membership insert failed")
    }

    /// Raw table contents, bypassing the policy layer.
    pub async fn backend_rows(&self, table: Table) -> Vec<Row> {
        self.backend
            .select(table, &Filter::new())
            .await
            .expect("backend select failed")
    }
}

/// Recommendation record with the fields tests usually care about.
pub fn destination_in(name: &str, category: &str, cost: f64, rating: f64) -> Destination {
    Destination {
        city: None,
        name: name.to_string(),
        state: "Himachal Pradesh".to_string(),
        category: category.to_string(),
        cost,
        duration: "5 days".to_string(),
        rating,
        description: format!("{name} on a budget"),
        image_url: None,
        restaurants: vec![Restaurant::Simple("Johnson's Cafe".to_string())],
        hotels: Vec::new(),
        activities: Vec::new(),
        distance: None,
        travel_duration: None,
        travel_options: Vec::new(),
        itinerary: Vec::new(),
        budget_tips: Vec::new(),
        weather: WeatherSummary::default(),
        best_time: String::new(),
        seasonal_pricing: None,
        coordinates: None,
    }
}

pub fn destination(name: &str, cost: f64) -> Destination {
    destination_in(name, "Adventure", cost, 4.5)
}

/// Provider names accepted by [`MockProviders::set_failing`].
pub const RECOMMEND: &str = "recommend";
pub const WEATHER: &str = "weather";
pub const VISA: &str = "visa";
pub const CURRENCY: &str = "currency";
pub const FLIGHT_PRICE: &str = "flight-price";

/// Every provider trait, answered from memory.
#[derive(Default)]
pub struct MockProviders {
    destinations: RwLock<Vec<Destination>>,
    failing: RwLock<HashSet<&'static str>>,
    delay: RwLock<Option<Duration>>,
    recommend_calls: AtomicUsize,
}

impl MockProviders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_destinations(destinations: Vec<Destination>) -> Self {
        Self {
            destinations: RwLock::new(destinations),
            ..Self::default()
        }
    }

    pub async fn set_destinations(&self, destinations: Vec<Destination>) {
        *self.destinations.write().await = destinations;
    }

    /// Make one provider answer with a server error.
    pub async fn set_failing(&self, provider: &'static str, fail: bool) {
        let mut failing = self.failing.write().await;
        if fail {
            failing.insert(provider);
        } else {
            failing.remove(provider);
        }
    }

    /// Hold every recommendation answer back for `delay`.
    pub async fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.write().await = delay;
    }

    pub fn recommend_calls(&self) -> usize {
        self.recommend_calls.load(Ordering::SeqCst)
    }

    async fn check(&self, provider: &'static str) -> tripsync_client::Result<()> {
        if self.failing.read().await.contains(provider) {
            return Err(ProviderError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: format!("{provider} unavailable"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RecommendationProvider for MockProviders {
    async fn recommend(
        &self,
        _request: &RecommendationRequest,
    ) -> tripsync_client::Result<Vec<Destination>> {
        self.recommend_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.check(RECOMMEND).await?;

        let destinations = self.destinations.read().await.clone();
        if destinations.is_empty() {
            return Err(ProviderError::Malformed(
                "no destinations in response".to_string(),
            ));
        }
        Ok(destinations)
    }
}

#[async_trait]
impl WeatherProvider for MockProviders {
    async fn forecast(&self, request: &WeatherRequest) -> tripsync_client::Result<WeatherForecast> {
        self.check(WEATHER).await?;
        Ok(WeatherForecast {
            current: CurrentWeather {
                temp: 18.0,
                condition: "Clear".to_string(),
                description: "clear sky".to_string(),
                humidity: 40.0,
                wind_speed: 3.2,
                feels_like: 17.0,
            },
            forecast: (0..request.days)
                .map(|day| ForecastDay {
                    date: format!("2026-12-{:02}", day + 1),
                    day_of_week: String::new(),
                    high: 20.0,
                    low: 8.0,
                    condition: "Clear".to_string(),
                    description: String::new(),
                    precipitation: 0.0,
                })
                .collect(),
            location: WeatherLocation {
                city: request.city.clone(),
                country: "IN".to_string(),
            },
        })
    }
}

#[async_trait]
impl VisaProvider for MockProviders {
    async fn requirements(&self, request: &VisaRequest) -> tripsync_client::Result<VisaRequirements> {
        self.check(VISA).await?;
        Ok(VisaRequirements {
            visa_required: request.nationality != request.destination,
            processing_time: "5-7 business days".to_string(),
            validity_period: "30 days".to_string(),
            estimated_cost: "USD 25".to_string(),
            required_documents: vec!["Passport".to_string()],
            application_process: Vec::new(),
            important_notes: Vec::new(),
            official_website: None,
        })
    }
}

#[async_trait]
impl CurrencyProvider for MockProviders {
    async fn convert(&self, request: &CurrencyRequest) -> tripsync_client::Result<CurrencyConversion> {
        self.check(CURRENCY).await?;
        let rate = if request.from == request.to { 1.0 } else { 0.012 };
        Ok(CurrencyConversion {
            amount: request.amount,
            from: request.from.clone(),
            to: request.to.clone(),
            rate,
            converted_amount: request.amount * rate,
            last_updated: None,
        })
    }
}

#[async_trait]
impl FlightPriceProvider for MockProviders {
    async fn estimate(
        &self,
        _request: &FlightPriceRequest,
    ) -> tripsync_client::Result<FlightPriceEstimate> {
        self.check(FLIGHT_PRICE).await?;
        Ok(FlightPriceEstimate {
            estimated_price: PriceRange {
                min: 3500.0,
                max: 9000.0,
                average: 5200.0,
            },
            price_level: "moderate".to_string(),
            trend: "stable".to_string(),
            best_time_to_book: "3-4 weeks ahead".to_string(),
            airlines: Vec::new(),
            saving_tips: Vec::new(),
            booking_recommendations: Vec::new(),
        })
    }
}
