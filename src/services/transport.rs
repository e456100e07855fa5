//! Transport bookings.

use std::sync::Arc;

use rand::Rng;
use tracing::debug;
use uuid::Uuid;

use super::{caller, optional_text, required_text};
use crate::aggregates::transport_total;
use crate::error::{Result, SyncError};
use crate::interfaces::RowStore;
use crate::model::{
    BookingRequest, NewTransportBooking, TransportBooking, TransportMode, ROUND_TRIP_MULTIPLIER,
};
use crate::repository::Repository;

/// Synthetic price for a booking entered without one: a whole amount drawn
/// uniformly from the mode's band, scaled for round trips.
pub fn estimate_price<R: Rng + ?Sized>(mode: TransportMode, round_trip: bool, rng: &mut R) -> f64 {
    let (min, max) = mode.price_band();
    let one_way = rng.random_range(min..max).floor();
    if round_trip {
        one_way * ROUND_TRIP_MULTIPLIER
    } else {
        one_way
    }
}

#[derive(Clone)]
pub struct TransportService {
    me: Uuid,
    bookings: Repository<TransportBooking>,
}

impl TransportService {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self {
            me: caller(&store),
            bookings: Repository::new(store),
        }
    }

    #[tracing::instrument(name = "transport.add", skip_all, fields(group_id = %group_id))]
    pub async fn add(&self, group_id: Uuid, request: BookingRequest) -> Result<TransportBooking> {
        let from = required_text("from_location", &request.from, "Please enter a departure point")?;
        let to = required_text("to_location", &request.to, "Please enter a destination")?;

        let estimated_price = match request.price {
            Some(price) if !(price.is_finite() && price >= 0.0) => {
                return Err(SyncError::validation(
                    "estimated_price",
                    "Price cannot be negative",
                ));
            }
            Some(price) => price,
            None => {
                let estimate = estimate_price(
                    request.mode,
                    request.return_date.is_some(),
                    &mut rand::rng(),
                );
                debug!(mode = ?request.mode, estimate, "Price estimated");
                estimate
            }
        };

        self.bookings
            .insert(&NewTransportBooking {
                group_id,
                user_id: self.me,
                transport_type: request.mode,
                from_location: from,
                to_location: to,
                departure_date: request.departure_date,
                return_date: request.return_date,
                estimated_price: Some(estimated_price),
                notes: optional_text(request.notes.as_deref()),
            })
            .await
    }

    pub async fn remove(&self, booking_id: Uuid) -> Result<()> {
        self.bookings.delete(booking_id).await
    }

    /// Bookings in departure order.
    pub async fn list(&self, group_id: Uuid) -> Result<Vec<TransportBooking>> {
        self.bookings.list_by_group(group_id).await
    }

    pub async fn total_estimated(&self, group_id: Uuid) -> Result<f64> {
        Ok(transport_total(&self.list(group_id).await?))
    }
}
