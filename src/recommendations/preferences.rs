//! Trip preference form and its validated form.

use tripsync_client::types::{Cuisine, Mood, RecommendationRequest, TravelModePreference};

use crate::error::{Result, SyncError};

const FILL_ALL_FIELDS: &str = "Please fill in all fields";

/// Raw preference input as submitted by the search form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreferenceForm {
    pub budget: f64,
    pub duration: String,
    pub mood: String,
    pub cuisine: String,
    pub departure_city: String,
    pub destination_city: String,
    pub num_travelers: Option<u32>,
    pub travel_mode: String,
    pub surprise_me: bool,
}

impl PreferenceForm {
    /// Check every field and build the preferences sent to the provider.
    pub fn validate(&self) -> Result<TripPreferences> {
        if !(self.budget.is_finite() && self.budget > 0.0) {
            return Err(SyncError::validation("budget", "Please set a budget"));
        }

        let duration_days = self
            .duration
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|days| *days >= 1)
            .ok_or_else(|| SyncError::validation("duration", "Please choose a trip length"))?;

        let mood = required(&self.mood, "mood")?
            .parse::<Mood>()
            .map_err(|e| SyncError::validation("mood", e))?;
        let cuisine = required(&self.cuisine, "cuisine")?
            .parse::<Cuisine>()
            .map_err(|e| SyncError::validation("cuisine", e))?;
        let departure_city = required(&self.departure_city, "departure_city")?.to_string();

        let num_travelers = self.num_travelers.unwrap_or(1);
        if num_travelers == 0 {
            return Err(SyncError::validation(
                "num_travelers",
                "At least one traveler is required",
            ));
        }

        let travel_mode = self
            .travel_mode
            .trim()
            .to_lowercase()
            .parse::<TravelModePreference>()
            .map_err(|e| SyncError::validation("travel_mode", e))?;

        let destination_city = Some(self.destination_city.trim())
            .filter(|city| !city.is_empty())
            .map(str::to_string);

        Ok(TripPreferences {
            budget: self.budget,
            duration_days,
            mood,
            cuisine,
            departure_city,
            destination_city,
            num_travelers,
            travel_mode,
            surprise_me: self.surprise_me,
        })
    }
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(SyncError::validation(field, FILL_ALL_FIELDS));
    }
    Ok(value)
}

/// Validated trip preferences.
#[derive(Debug, Clone, PartialEq)]
pub struct TripPreferences {
    pub budget: f64,
    pub duration_days: u32,
    pub mood: Mood,
    pub cuisine: Cuisine,
    pub departure_city: String,
    pub destination_city: Option<String>,
    pub num_travelers: u32,
    pub travel_mode: TravelModePreference,
    pub surprise_me: bool,
}

impl TripPreferences {
    pub fn to_request(&self) -> RecommendationRequest {
        RecommendationRequest {
            budget: self.budget,
            duration_days: self.duration_days,
            mood: self.mood,
            cuisine: self.cuisine,
            departure_city: self.departure_city.clone(),
            destination_city: self.destination_city.clone(),
            num_travelers: self.num_travelers,
            travel_mode_preference: self.travel_mode,
            surprise_me: self.surprise_me,
        }
    }
}

/// Carries a submitted search from the form to the results view.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchContext {
    preferences: TripPreferences,
}

impl SearchContext {
    pub fn submit(form: &PreferenceForm) -> Result<Self> {
        Ok(Self {
            preferences: form.validate()?,
        })
    }

    pub fn preferences(&self) -> &TripPreferences {
        &self.preferences
    }
}
