//! Bookmarked recommendations.

use std::sync::Arc;

use tracing::info;
use tripsync_client::types::Destination;
use uuid::Uuid;

use super::caller;
use crate::error::Result;
use crate::interfaces::{Filter, RowStore};
use crate::model::{NewSavedTrip, SavedTrip};
use crate::repository::Repository;

#[derive(Clone)]
pub struct SavedTripService {
    me: Uuid,
    trips: Repository<SavedTrip>,
}

impl SavedTripService {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self {
            me: caller(&store),
            trips: Repository::new(store),
        }
    }

    /// Bookmark a recommendation. Saving the same destination twice is a
    /// duplicate.
    #[tracing::instrument(name = "saved_trips.save", skip_all, fields(destination = %destination.name))]
    pub async fn save(&self, destination: &Destination) -> Result<SavedTrip> {
        let saved = self
            .trips
            .insert(&NewSavedTrip {
                user_id: self.me,
                destination_name: destination.name.clone(),
                destination_state: destination.state.clone(),
                category: destination.category.clone(),
                cost: destination.cost,
                duration: destination.duration.clone(),
                rating: destination.rating,
                description: destination.description.clone(),
                image_url: destination.image_url.clone(),
                restaurants: destination
                    .restaurants
                    .iter()
                    .map(|r| r.name().to_string())
                    .collect(),
            })
            .await?;
        info!("Trip saved");
        Ok(saved)
    }

    /// The caller's saved trips, newest first.
    pub async fn list(&self) -> Result<Vec<SavedTrip>> {
        self.trips.list(Filter::new()).await
    }

    pub async fn remove(&self, trip_id: Uuid) -> Result<()> {
        self.trips.delete(trip_id).await
    }
}
