use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recommendation a user bookmarked. Unique per (user, destination).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedTrip {
    pub id: Uuid,
    pub user_id: Uuid,
    pub destination_name: String,
    pub destination_state: String,
    pub category: String,
    pub cost: f64,
    pub duration: String,
    pub rating: f64,
    pub description: String,
    pub image_url: Option<String>,
    #[serde(default)]
    pub restaurants: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSavedTrip {
    pub user_id: Uuid,
    pub destination_name: String,
    pub destination_state: String,
    pub category: String,
    pub cost: f64,
    pub duration: String,
    pub rating: f64,
    pub description: String,
    pub image_url: Option<String>,
    pub restaurants: Vec<String>,
}

/// A user's review of a destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub user_id: Uuid,
    pub destination_name: String,
    pub rating: u8,
    pub review_text: String,
    pub tips: Option<String>,
    #[serde(default)]
    pub photos: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReview {
    pub user_id: Uuid,
    pub destination_name: String,
    pub rating: u8,
    pub review_text: String,
    pub tips: Option<String>,
    pub photos: Option<Vec<String>>,
}
