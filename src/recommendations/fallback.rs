//! Local sample shown when the provider cannot answer.

use tripsync_client::types::{
    Activity, Coordinates, Destination, Hotel, ItineraryDay, Restaurant, TravelOption,
    WeatherSummary,
};

use super::TripPreferences;

/// Share of the budget each sample destination is priced at.
pub const FALLBACK_COST_RATIOS: [f64; 3] = [0.8, 0.7, 0.6];

fn restaurant(name: &str, rating: f64, price_range: &str, cuisine: &str) -> Restaurant {
    Restaurant::Detailed {
        name: name.to_string(),
        rating: Some(rating),
        price_range: Some(price_range.to_string()),
        cuisine: Some(cuisine.to_string()),
    }
}

fn hotel(name: &str, rating: f64, price_per_night: f64, amenities: &[&str]) -> Hotel {
    Hotel {
        name: name.to_string(),
        rating,
        price_per_night,
        amenities: strings(amenities),
        image_url: None,
    }
}

fn activity(name: &str, description: &str, rating: f64, cost: f64) -> Activity {
    Activity {
        name: name.to_string(),
        description: description.to_string(),
        rating,
        cost,
        image_url: None,
    }
}

fn option(mode: &str, duration: &str, cost: f64, details: &str) -> TravelOption {
    TravelOption {
        mode: mode.to_string(),
        duration: duration.to_string(),
        cost,
        details: details.to_string(),
    }
}

fn day(day: u32, activities: &[&str]) -> ItineraryDay {
    ItineraryDay {
        day,
        activities: strings(activities),
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Manali, Goa and Jaipur priced against the submitted budget.
pub fn fallback_destinations(prefs: &TripPreferences) -> Vec<Destination> {
    let duration = format!("{} days", prefs.duration_days);
    let [manali_ratio, goa_ratio, jaipur_ratio] = FALLBACK_COST_RATIOS;

    vec![
        Destination {
            city: Some("Manali".to_string()),
            name: "Manali".to_string(),
            state: "Himachal Pradesh".to_string(),
            category: "Adventure".to_string(),
            cost: prefs.budget * manali_ratio,
            duration: duration.clone(),
            rating: 4.7,
            description: "A paradise for adventure seekers with Himalayan landscapes, \
                          snow-capped peaks and thrilling activities."
                .to_string(),
            image_url: None,
            restaurants: vec![
                restaurant("Johnson's Cafe", 4.6, "₹₹", "Continental"),
                restaurant("The Lazy Dog", 4.5, "₹₹₹", "Multi-cuisine"),
                restaurant("Cafe 1947", 4.7, "₹₹", "Italian"),
            ],
            hotels: vec![
                hotel("Snow Valley Resort", 4.5, 3500.0, &["Mountain View", "Heater", "WiFi"]),
                hotel("Manali Heights", 4.3, 2500.0, &["Free Parking", "Restaurant"]),
            ],
            activities: vec![
                activity("Paragliding", "Soar over Solang Valley", 4.8, 2500.0),
                activity("River Rafting", "Beas River adventure", 4.7, 1500.0),
                activity("Trekking", "Himalayan trails", 4.6, 1000.0),
            ],
            distance: Some(500.0),
            travel_duration: Some("12 hours by car".to_string()),
            travel_options: vec![
                option("flight", "1.5 hours", 5000.0, "Delhi to Kullu, then 1 hour taxi"),
                option("bus", "14 hours", 1200.0, "Overnight Volvo from Delhi"),
                option("car", "12 hours", 3000.0, "Self-drive via NH44"),
            ],
            itinerary: vec![
                day(1, &["Arrival and check-in", "Explore Mall Road", "Visit Hadimba Temple"]),
                day(2, &["Solang Valley adventure sports", "Paragliding", "Cable car ride"]),
            ],
            budget_tips: strings(&[
                "Book hotels in advance for better rates",
                "Use local buses instead of taxis",
                "Eat at local dhabas",
            ]),
            weather: WeatherSummary {
                climate: "Cold Mountain Climate".to_string(),
                avg_temp: "10°C - 25°C".to_string(),
            },
            best_time: "March to June, September to November".to_string(),
            seasonal_pricing: Some("Peak: Apr-Jun (+35%), Off-season: Jan-Feb (-20%)".to_string()),
            coordinates: Some(Coordinates {
                lat: 32.2432,
                lng: 77.1892,
            }),
        },
        Destination {
            city: Some("Panaji".to_string()),
            name: "Goa".to_string(),
            state: "Goa".to_string(),
            category: "Beach & Relaxation".to_string(),
            cost: prefs.budget * goa_ratio,
            duration: duration.clone(),
            rating: 4.5,
            description: "Sun, sand and sea, with beach shacks, nightlife and Portuguese heritage."
                .to_string(),
            image_url: None,
            restaurants: vec![
                restaurant("Thalassa", 4.8, "₹₹₹", "Greek"),
                restaurant("Pousada by the Beach", 4.6, "₹₹", "Goan"),
                restaurant("Fisherman's Wharf", 4.7, "₹₹₹", "Seafood"),
            ],
            hotels: vec![
                hotel("Taj Exotica", 4.9, 8000.0, &["Beach Access", "Pool", "Spa"]),
                hotel("Casa Palacio", 4.4, 3500.0, &["Pool", "WiFi", "Breakfast"]),
            ],
            activities: vec![
                activity("Water Sports", "Jet ski, parasailing, banana boat", 4.7, 2000.0),
                activity("Scuba Diving", "Explore underwater life", 4.8, 3500.0),
                activity("Sunset Cruise", "Evening cruise on the Mandovi", 4.6, 1200.0),
            ],
            distance: Some(600.0),
            travel_duration: Some("1.5 hours by flight".to_string()),
            travel_options: vec![
                option("flight", "1.5 hours", 4500.0, "Direct flights from major cities"),
                option("train", "12 hours", 1800.0, "Overnight express trains"),
                option("bus", "16 hours", 1500.0, "Luxury sleeper buses"),
            ],
            itinerary: vec![
                day(1, &["Arrival at Goa airport", "Calangute Beach sunset", "Beach shack dinner"]),
                day(2, &["Water sports at Baga Beach", "Fort Aguada", "Old Goa church tour"]),
                day(3, &["South Goa beaches", "Palolem Beach", "Cabo de Rama Fort"]),
            ],
            budget_tips: strings(&[
                "Visit during monsoon for cheaper rates",
                "Rent a scooter for affordable transport",
                "Eat at beach shacks",
            ]),
            weather: WeatherSummary {
                climate: "Tropical Coastal".to_string(),
                avg_temp: "25°C - 35°C".to_string(),
            },
            best_time: "November to February".to_string(),
            seasonal_pricing: Some("Peak: Dec-Jan (+40%), Off-season: Jun-Aug (-30%)".to_string()),
            coordinates: Some(Coordinates {
                lat: 15.2993,
                lng: 74.1240,
            }),
        },
        Destination {
            city: Some("Jaipur".to_string()),
            name: "Jaipur".to_string(),
            state: "Rajasthan".to_string(),
            category: "Culture & Heritage".to_string(),
            cost: prefs.budget * jaipur_ratio,
            duration,
            rating: 4.6,
            description: "The Pink City, with forts, palaces and Rajasthani food.".to_string(),
            image_url: None,
            restaurants: vec![
                restaurant("Laxmi Mishthan Bhandar", 4.7, "₹", "Traditional Rajasthani"),
                restaurant("Peacock Rooftop", 4.5, "₹₹", "Indian"),
                restaurant("Handi Restaurant", 4.6, "₹₹", "Mughlai"),
            ],
            hotels: vec![
                hotel("Raj Palace", 4.7, 4500.0, &["Heritage Property", "Pool"]),
                hotel("Hotel Pearl Palace", 4.4, 2000.0, &["Rooftop", "WiFi", "Breakfast"]),
            ],
            activities: vec![
                activity("Amber Fort Tour", "Explore the hilltop fort", 4.8, 1500.0),
                activity("City Palace Visit", "Royal heritage tour", 4.7, 800.0),
            ],
            distance: Some(400.0),
            travel_duration: Some("1 hour by flight".to_string()),
            travel_options: vec![
                option("flight", "1 hour", 3500.0, "Frequent flights from Delhi/Mumbai"),
                option("train", "5 hours", 800.0, "Shatabdi Express from Delhi"),
                option("car", "5 hours", 2500.0, "Highway via NH48"),
            ],
            itinerary: vec![
                day(1, &["Amber Fort morning visit", "City Palace tour", "Hawa Mahal"]),
                day(2, &["Jantar Mantar", "Albert Hall Museum", "Nahargarh Fort sunset"]),
            ],
            budget_tips: strings(&[
                "Use metro and local buses",
                "Book combo tickets for forts",
                "Bargain in markets",
            ]),
            weather: WeatherSummary {
                climate: "Hot Semi-arid".to_string(),
                avg_temp: "20°C - 40°C".to_string(),
            },
            best_time: "October to March".to_string(),
            seasonal_pricing: Some("Peak: Oct-Mar (+25%), Off-season: Apr-Jun (-15%)".to_string()),
            coordinates: Some(Coordinates {
                lat: 26.9124,
                lng: 75.7873,
            }),
        },
    ]
}
