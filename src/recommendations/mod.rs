//! Recommendation consumer.
//!
//! The search form is validated into [`TripPreferences`] and carried to the
//! results view in a [`SearchContext`]. [`RecommendationFeed`] calls the
//! provider and substitutes a fixed local sample whenever the provider
//! fails, so the user always gets a result set. The [`results`] helpers
//! shape that set for display; [`costs`] and [`packing`] derive per-trip
//! planning aids from a single destination.

pub mod costs;
mod fallback;
mod feed;
pub mod packing;
mod preferences;
pub mod results;

pub use costs::{cost_breakdown, destination_breakdown, CostShare};
pub use fallback::{fallback_destinations, FALLBACK_COST_RATIOS};
pub use feed::{RecommendationFeed, Recommendations, Source};
pub use packing::{PackingItem, PackingList};
pub use preferences::{PreferenceForm, SearchContext, TripPreferences};
pub use results::{CompareSelection, SortBy};
