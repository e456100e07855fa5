//! Recommendation request and destination record schemas.

use serde::{Deserialize, Serialize};

/// Trip mood the traveller is after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mood {
    Adventure,
    Relaxation,
    Culture,
    Nature,
    Party,
    Spiritual,
}

impl Mood {
    pub const ALL: [Mood; 6] = [
        Mood::Adventure,
        Mood::Relaxation,
        Mood::Culture,
        Mood::Nature,
        Mood::Party,
        Mood::Spiritual,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Adventure => "adventure",
            Mood::Relaxation => "relaxation",
            Mood::Culture => "culture",
            Mood::Nature => "nature",
            Mood::Party => "party",
            Mood::Spiritual => "spiritual",
        }
    }
}

impl std::str::FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mood::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("unknown mood: {s}"))
    }
}

/// Dining preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cuisine {
    Vegetarian,
    NonVegetarian,
    Vegan,
    StreetFood,
    FineDining,
    Local,
}

impl Cuisine {
    pub const ALL: [Cuisine; 6] = [
        Cuisine::Vegetarian,
        Cuisine::NonVegetarian,
        Cuisine::Vegan,
        Cuisine::StreetFood,
        Cuisine::FineDining,
        Cuisine::Local,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Cuisine::Vegetarian => "vegetarian",
            Cuisine::NonVegetarian => "non-vegetarian",
            Cuisine::Vegan => "vegan",
            Cuisine::StreetFood => "street-food",
            Cuisine::FineDining => "fine-dining",
            Cuisine::Local => "local",
        }
    }
}

impl std::str::FromStr for Cuisine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cuisine::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown cuisine: {s}"))
    }
}

/// Preferred way to get there. `Any` lets the provider optimize.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelModePreference {
    #[default]
    Any,
    Flight,
    Train,
    Bus,
    Car,
}

impl std::str::FromStr for TravelModePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "any" => Ok(Self::Any),
            "flight" => Ok(Self::Flight),
            "train" => Ok(Self::Train),
            "bus" => Ok(Self::Bus),
            "car" => Ok(Self::Car),
            other => Err(format!("unknown travel mode: {other}")),
        }
    }
}

/// Request body for the recommendation provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    pub budget: f64,
    pub duration_days: u32,
    pub mood: Mood,
    pub cuisine: Cuisine,
    pub departure_city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_city: Option<String>,
    pub num_travelers: u32,
    pub travel_mode_preference: TravelModePreference,
    pub surprise_me: bool,
}

/// Response body of the recommendation provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub destinations: Vec<Destination>,
}

/// Restaurant entry. Older payloads carry a bare name, newer ones a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Restaurant {
    Simple(String),
    #[serde(rename_all = "camelCase")]
    Detailed {
        name: String,
        #[serde(default)]
        rating: Option<f64>,
        #[serde(default)]
        price_range: Option<String>,
        #[serde(default)]
        cuisine: Option<String>,
    },
}

impl Restaurant {
    pub fn name(&self) -> &str {
        match self {
            Restaurant::Simple(name) => name,
            Restaurant::Detailed { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub name: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub price_per_night: f64,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelOption {
    pub mode: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryDay {
    pub day: u32,
    #[serde(default)]
    pub activities: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSummary {
    #[serde(default)]
    pub climate: String,
    #[serde(default)]
    pub avg_temp: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// One recommended destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    #[serde(default)]
    pub city: Option<String>,
    pub name: String,
    pub state: String,
    pub category: String,
    pub cost: f64,
    #[serde(default)]
    pub duration: String,
    pub rating: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub restaurants: Vec<Restaurant>,
    #[serde(default)]
    pub hotels: Vec<Hotel>,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub travel_duration: Option<String>,
    #[serde(default)]
    pub travel_options: Vec<TravelOption>,
    #[serde(default)]
    pub itinerary: Vec<ItineraryDay>,
    #[serde(default)]
    pub budget_tips: Vec<String>,
    #[serde(default)]
    pub weather: WeatherSummary,
    #[serde(default)]
    pub best_time: String,
    #[serde(default)]
    pub seasonal_pricing: Option<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}
