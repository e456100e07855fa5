use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Flight,
    Train,
    Bus,
    Cab,
}

impl TransportMode {
    /// Synthetic one-way price band `[min, max)` used when no price is given.
    pub fn price_band(&self) -> (f64, f64) {
        match self {
            TransportMode::Flight => (3000.0, 15000.0),
            TransportMode::Train => (500.0, 3000.0),
            TransportMode::Bus => (200.0, 1500.0),
            TransportMode::Cab => (1000.0, 5000.0),
        }
    }
}

/// Round trips cost this multiple of the one-way estimate.
pub const ROUND_TRIP_MULTIPLIER: f64 = 1.8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportBooking {
    pub id: Uuid,
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub transport_type: TransportMode,
    pub from_location: String,
    pub to_location: String,
    pub departure_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub estimated_price: Option<f64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransportBooking {
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub transport_type: TransportMode,
    pub from_location: String,
    pub to_location: String,
    pub departure_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub estimated_price: Option<f64>,
    pub notes: Option<String>,
}

/// Booking form input. A missing price is estimated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub mode: TransportMode,
    pub from: String,
    pub to: String,
    pub departure_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub price: Option<f64>,
    pub notes: Option<String>,
}
