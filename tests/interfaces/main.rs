//! Interface tests for row backends using Cucumber.
//!
//! The same scenarios run against every backend so policy and uniqueness
//! behave identically everywhere. Select a backend via environment variable:
//!
//! ```bash
//! # In-memory (default)
//! cargo test --test interfaces --features test-utils
//!
//! # SQLite in a temporary file
//! STORAGE_BACKEND=sqlite cargo test --test interfaces --features sqlite,test-utils
//! ```

mod backend;
mod steps;

use cucumber::World;
use steps::TripWorld;

#[tokio::main]
async fn main() {
    println!("\n=== Running Row Store Interface Tests ===\n");
    TripWorld::cucumber()
        .fail_on_skipped()
        .run("tests/interfaces/features/row_store.feature")
        .await;

    println!("\n=== Running Collaboration Interface Tests ===\n");
    TripWorld::cucumber()
        .fail_on_skipped()
        .run("tests/interfaces/features/collaboration.feature")
        .await;
}
