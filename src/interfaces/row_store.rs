//! Row store interfaces.

use async_trait::async_trait;
use uuid::Uuid;

use super::query::{Filter, Row, Table};
use crate::feed::{ChangeFeed, Subscription};
use crate::model::Session;

/// Result type for row store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur during row store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    #[error("Duplicate row in {table}: {key}")]
    Duplicate { table: Table, key: String },

    #[error("Row not found: table={table}, id={id}")]
    NotFound { table: Table, id: Uuid },

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid row for {table}: {reason}")]
    InvalidRow { table: Table, reason: String },

    #[error("Row encoding error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[cfg(feature = "sqlite")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Connectivity-style failures that a later attempt may not hit.
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Unavailable(_) => true,
            #[cfg(feature = "sqlite")]
            StoreError::Database(e) => matches!(
                e,
                sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed
            ),
            _ => false,
        }
    }
}

/// Unauthenticated table access, implemented by storage backends.
///
/// Backends fill column defaults (id, timestamps, role, status), enforce
/// the per-table uniqueness constraints and publish every committed change
/// on their [`ChangeFeed`].
///
/// Implementations:
/// - `MemoryBackend`: in-process tables
/// - `SqliteBackend`: SQLite via sqlx
#[async_trait]
pub trait RowBackend: Send + Sync {
    /// Rows matching `filter`, ordered by the filter's ordering, ties in
    /// insertion order.
    async fn select(&self, table: Table, filter: &Filter) -> Result<Vec<Row>>;

    /// Insert a batch. All rows commit or none do.
    async fn insert(&self, table: Table, rows: Vec<Row>) -> Result<Vec<Row>>;

    /// Merge `patch` into the row with `id`.
    async fn update(&self, table: Table, id: Uuid, patch: Row) -> Result<Row>;

    /// Delete by id, returning the removed row.
    async fn delete(&self, table: Table, id: Uuid) -> Result<Row>;

    /// Change feed for this backend.
    fn feed(&self) -> &ChangeFeed;
}

/// Session-scoped row access with row-level authorization.
///
/// This is the boundary repositories talk to. Every call is made as the
/// session's user and checked against the table's access policy.
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Caller identity.
    fn session(&self) -> &Session;

    async fn select(&self, table: Table, filter: Filter) -> Result<Vec<Row>>;

    async fn insert(&self, table: Table, rows: Vec<Row>) -> Result<Vec<Row>>;

    async fn update(&self, table: Table, id: Uuid, patch: Row) -> Result<Row>;

    async fn delete(&self, table: Table, id: Uuid) -> Result<()>;

    /// Subscribe to inserts on `table` matching `filter`.
    async fn subscribe(&self, table: Table, filter: Filter) -> Result<Subscription>;

    /// Run the store-side budget split recomputation for a group.
    async fn recompute_budget_splits(&self, group_id: Uuid) -> Result<()>;
}
