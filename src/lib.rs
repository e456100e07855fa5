//! Tripsync - collaborative resource sync for group trip planning.
//!
//! Group members share trip groups, invitations, votes, chat, itinerary,
//! transport bookings and budget splits through a row store. This crate
//! provides the layer between the views and that store: typed
//! repositories under a row-level policy, profile joins, realtime
//! reconciliation of pushed rows, aggregate calculators and the
//! recommendation consumer with its local fallback.

pub mod aggregates;
pub mod app;
pub mod config;
pub mod error;
pub mod feed;
pub mod insights;
pub mod interfaces;
pub mod model;
pub mod profiles;
pub mod reconciler;
pub mod recommendations;
pub mod repository;
pub mod services;
pub mod storage;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use app::TripSync;
pub use config::Config;
pub use error::{ResourceKind, Result, SyncError};
pub use model::Session;
pub use reconciler::{ReconcileEvent, Reconciler, ReconcilerHandle, SyncState};
pub use services::Services;
