//! Shared storage integration tests.
//!
//! Tests the RowBackend contract against every implementation. Each
//! backend's test binary runs these through the macro runners.

pub mod row_backend_tests;
