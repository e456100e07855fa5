//! Weather, visa, currency and flight-price helper schemas.

use serde::{Deserialize, Serialize};

fn default_forecast_days() -> u32 {
    7
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRequest {
    pub city: String,
    #[serde(default = "default_forecast_days")]
    pub days: u32,
}

impl WeatherRequest {
    pub fn new(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            days: default_forecast_days(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeather {
    pub temp: f64,
    pub condition: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub humidity: f64,
    #[serde(default)]
    pub wind_speed: f64,
    #[serde(default)]
    pub feels_like: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    pub date: String,
    #[serde(default)]
    pub day_of_week: String,
    pub high: f64,
    pub low: f64,
    pub condition: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub precipitation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherLocation {
    pub city: String,
    #[serde(default)]
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherForecast {
    pub current: CurrentWeather,
    #[serde(default)]
    pub forecast: Vec<ForecastDay>,
    pub location: WeatherLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisaRequest {
    pub nationality: String,
    pub destination: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisaRequirements {
    pub visa_required: bool,
    #[serde(default)]
    pub processing_time: String,
    #[serde(default)]
    pub validity_period: String,
    #[serde(default)]
    pub estimated_cost: String,
    #[serde(default)]
    pub required_documents: Vec<String>,
    #[serde(default)]
    pub application_process: Vec<String>,
    #[serde(default)]
    pub important_notes: Vec<String>,
    #[serde(default)]
    pub official_website: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyRequest {
    pub amount: f64,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyConversion {
    pub amount: f64,
    pub from: String,
    pub to: String,
    pub rate: f64,
    pub converted_amount: f64,
    #[serde(default)]
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightPriceRequest {
    pub from: String,
    pub to: String,
    pub departure_date: chrono::NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<chrono::NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirlineQuote {
    pub name: String,
    #[serde(default, rename = "type")]
    pub carrier_type: String,
    #[serde(default)]
    pub estimated_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightPriceEstimate {
    pub estimated_price: PriceRange,
    #[serde(default)]
    pub price_level: String,
    #[serde(default)]
    pub trend: String,
    #[serde(default)]
    pub best_time_to_book: String,
    #[serde(default)]
    pub airlines: Vec<AirlineQuote>,
    #[serde(default)]
    pub saving_tips: Vec<String>,
    #[serde(default)]
    pub booking_recommendations: Vec<String>,
}
