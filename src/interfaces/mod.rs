//! Abstract interfaces for tripsync components.
//!
//! These traits define the contracts for:
//! - Row storage (backends and the session-scoped, policy-checked store)
//! - Queries (tables, filters, ordering)

pub mod query;
pub mod row_store;

pub use query::{compare_values, uuid_column, Condition, Filter, OrderBy, Row, Table};
pub use row_store::{Result, RowBackend, RowStore, StoreError};
