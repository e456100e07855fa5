//! Sorting, filtering and comparison over a loaded result set.

use std::str::FromStr;

use tripsync_client::types::Destination;

use crate::error::{Result, SyncError};

/// Most destinations that can be compared side by side.
pub const MAX_COMPARE: usize = 4;

/// Category filter value that keeps everything.
pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortBy {
    #[default]
    Rating,
    CostLow,
    CostHigh,
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "rating" => Ok(SortBy::Rating),
            "cost-low" => Ok(SortBy::CostLow),
            "cost-high" => Ok(SortBy::CostHigh),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

/// Stable sort; equal keys keep the provider's order.
pub fn sort(destinations: &mut [Destination], by: SortBy) {
    match by {
        SortBy::Rating => destinations.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        SortBy::CostLow => destinations.sort_by(|a, b| a.cost.total_cmp(&b.cost)),
        SortBy::CostHigh => destinations.sort_by(|a, b| b.cost.total_cmp(&a.cost)),
    }
}

/// Destinations whose category contains `category`, ignoring case.
/// [`ALL_CATEGORIES`] keeps every destination.
pub fn filter_category<'a>(destinations: &'a [Destination], category: &str) -> Vec<&'a Destination> {
    if category == ALL_CATEGORIES {
        return destinations.iter().collect();
    }
    let needle = category.to_lowercase();
    destinations
        .iter()
        .filter(|d| d.category.to_lowercase().contains(&needle))
        .collect()
}

/// Distinct categories in first-seen order.
pub fn categories(destinations: &[Destination]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for destination in destinations {
        if !seen.contains(&destination.category) {
            seen.push(destination.category.clone());
        }
    }
    seen
}

pub fn average_cost(destinations: &[Destination]) -> f64 {
    if destinations.is_empty() {
        return 0.0;
    }
    destinations.iter().map(|d| d.cost).sum::<f64>() / destinations.len() as f64
}

/// Filter then sort, the way the results view shows them.
pub fn shape(destinations: &[Destination], category: &str, by: SortBy) -> Vec<Destination> {
    let mut shaped: Vec<Destination> = filter_category(destinations, category)
        .into_iter()
        .cloned()
        .collect();
    sort(&mut shaped, by);
    shaped
}

/// Destinations picked for side-by-side comparison, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct CompareSelection {
    selected: Vec<Destination>,
}

impl CompareSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the destination, or remove it if already picked.
    pub fn toggle(&mut self, destination: &Destination) -> Result<()> {
        if let Some(pos) = self.selected.iter().position(|d| d.name == destination.name) {
            self.selected.remove(pos);
            return Ok(());
        }
        if self.selected.len() >= MAX_COMPARE {
            return Err(SyncError::validation(
                "compare",
                format!("You can compare up to {MAX_COMPARE} destinations"),
            ));
        }
        self.selected.push(destination.clone());
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.selected.len() >= 2
    }

    pub fn selected(&self) -> &[Destination] {
        &self.selected
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }
}
