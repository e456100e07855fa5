//! Aggregate calculators.
//!
//! Pure functions deriving view numbers from a row set. None of them hold
//! state the rows do not already encode, so re-running on the same rows
//! yields the same output.

mod budget;
mod expenses;
mod votes;

pub use budget::{summarize_budget, BudgetSummary, MemberShare};
pub use expenses::{CategoryTotal, Expense, ExpenseLedger, ExpenseSummary};
pub use votes::{tally_votes, VoteTally};

use crate::model::TransportBooking;

/// Round to one decimal place.
pub fn one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Sum of estimated booking prices. Bookings without a price count as zero.
pub fn transport_total(bookings: &[TransportBooking]) -> f64 {
    bookings.iter().filter_map(|b| b.estimated_price).sum()
}
