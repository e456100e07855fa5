//! Estimated split of a destination's cost by spending category.

use tripsync_client::types::Destination;

/// Spending categories and their fixed share of the total.
pub const COST_SHARES: [(&str, f64); 4] = [
    ("Accommodation", 0.40),
    ("Food & Dining", 0.30),
    ("Transport", 0.20),
    ("Activities", 0.10),
];

#[derive(Debug, Clone, PartialEq)]
pub struct CostShare {
    pub category: &'static str,
    pub amount: f64,
}

/// Each category's share of `total_cost`, rounded to whole rupees.
///
/// Shares are rounded independently, so they may not add up to the total.
pub fn cost_breakdown(total_cost: f64) -> Vec<CostShare> {
    COST_SHARES
        .iter()
        .map(|&(category, ratio)| CostShare {
            category,
            amount: (total_cost * ratio).round(),
        })
        .collect()
}

/// Breakdown of a recommended destination's estimated cost.
pub fn destination_breakdown(destination: &Destination) -> Vec<CostShare> {
    cost_breakdown(destination.cost)
}
