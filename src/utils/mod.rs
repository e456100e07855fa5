//! Shared utilities.

pub mod bootstrap;
pub mod interest;

pub use interest::{Interest, Ticket};
