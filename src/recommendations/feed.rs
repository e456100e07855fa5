//! Recommendation loading with a local fallback.

use std::sync::Arc;

use tracing::{debug, info};
use tripsync_client::types::Destination;
use tripsync_client::{ProviderError, RecommendationProvider};

use super::{fallback_destinations, TripPreferences};
use crate::error::SyncError;
use crate::utils::Interest;

/// Where a result set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Provider,
    Fallback,
}

/// A result set ready for display.
#[derive(Debug)]
pub struct Recommendations {
    pub destinations: Vec<Destination>,
    pub source: Source,
    /// Why the fallback was used. The sample is still shown.
    pub failure: Option<SyncError>,
}

impl Recommendations {
    pub fn is_fallback(&self) -> bool {
        self.source == Source::Fallback
    }

    /// Notice to show next to a fallback result set.
    pub fn notice(&self) -> Option<&'static str> {
        self.is_fallback()
            .then_some("Failed to fetch recommendations. Showing sample data.")
    }
}

/// Loads recommendations for one results view.
///
/// Loads are not cancelled. A response that lands after a newer load
/// started, or after [`RecommendationFeed::withdraw`], is dropped.
#[derive(Clone)]
pub struct RecommendationFeed {
    provider: Arc<dyn RecommendationProvider>,
    interest: Interest,
}

impl RecommendationFeed {
    pub fn new(provider: Arc<dyn RecommendationProvider>) -> Self {
        Self {
            provider,
            interest: Interest::new(),
        }
    }

    /// Fetch recommendations, falling back to the local sample on any
    /// failure. `None` when nobody is waiting for the answer anymore.
    #[tracing::instrument(name = "recommendations.load", skip_all, fields(budget = prefs.budget, days = prefs.duration_days))]
    pub async fn load(&self, prefs: &TripPreferences) -> Option<Recommendations> {
        let ticket = self.interest.ticket();
        let result = self.provider.recommend(&prefs.to_request()).await;

        if !ticket.is_current() {
            debug!("Dropping stale recommendations");
            return None;
        }

        let failure = match result {
            Ok(destinations) if !destinations.is_empty() => {
                info!(count = destinations.len(), "Recommendations loaded");
                return Some(Recommendations {
                    destinations,
                    source: Source::Provider,
                    failure: None,
                });
            }
            Ok(_) => SyncError::from(ProviderError::Malformed(
                "no destinations in response".to_string(),
            )),
            Err(e) => SyncError::from(e),
        };

        info!("Recommendation provider unavailable, using sample data");
        Some(Recommendations {
            destinations: fallback_destinations(prefs),
            source: Source::Fallback,
            failure: Some(failure),
        })
    }

    /// The results view went away.
    pub fn withdraw(&self) {
        self.interest.withdraw();
    }
}
