use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One planned activity. End before start is accepted as entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryItem {
    pub id: Uuid,
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub day_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItineraryItem {
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub day_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
}

/// Itinerary form input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryEntry {
    pub day_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
}

impl ItineraryEntry {
    pub fn new(day_date: NaiveDate, title: impl Into<String>) -> Self {
        Self {
            day_date,
            start_time: None,
            end_time: None,
            title: title.into(),
            description: None,
            location: None,
            category: None,
        }
    }

    pub fn at(mut self, start: NaiveTime, end: Option<NaiveTime>) -> Self {
        self.start_time = Some(start);
        self.end_time = end;
        self
    }
}
