//! Request/response schemas for the provider boundary.

mod insights;
mod recommendation;

pub use insights::{
    AirlineQuote, CurrencyConversion, CurrencyRequest, CurrentWeather, FlightPriceEstimate,
    FlightPriceRequest, ForecastDay, PriceRange, VisaRequest, VisaRequirements, WeatherForecast,
    WeatherLocation, WeatherRequest,
};
pub use recommendation::{
    Activity, Coordinates, Cuisine, Destination, Hotel, ItineraryDay, Mood, RecommendationRequest,
    RecommendationResponse, Restaurant, TravelModePreference, TravelOption, WeatherSummary,
};
