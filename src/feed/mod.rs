//! In-process change feed for row stores.
//!
//! Uses a tokio broadcast channel for pub/sub within a single process.
//! Table and predicate filtering is done on the subscriber side.

use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

use crate::interfaces::{Filter, Row, Table};


/// Default channel capacity for broadcast.
pub const CHANNEL_CAPACITY: usize = 1024;

/// What happened to a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// A committed row change.
#[derive(Debug, Clone, PartialEq)]
pub struct RowChange {
    pub table: Table,
    pub kind: ChangeKind,
    pub row: Row,
}

/// Why a subscription stopped delivering.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedError {
    /// Receiver fell behind and changes were dropped.
    #[error("subscription lagged, {0} changes skipped")]
    Lagged(u64),

    /// Channel was torn down.
    #[error("subscription closed")]
    Closed,
}

/// Broadcast of committed row changes.
pub struct ChangeFeed {
    sender: RwLock<broadcast::Sender<Arc<RowChange>>>,
    capacity: usize,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender: RwLock::new(sender),
            capacity: capacity.max(1),
        }
    }

    /// Publish a change. Returns the number of live receivers.
    #[tracing::instrument(name = "feed.publish", skip_all, fields(table = %change.table))]
    pub async fn publish(&self, change: RowChange) -> usize {
        let sender = self.sender.read().await;
        // Send fails only when nobody is listening
        match sender.send(Arc::new(change)) {
            Ok(receivers) => {
                debug!(receivers, "Row change published");
                receivers
            }
            Err(_) => 0,
        }
    }

    /// Subscribe to inserts on `table` matching `filter`.
    pub async fn subscribe(&self, table: Table, filter: Filter) -> Subscription {
        let receiver = self.sender.read().await.subscribe();
        debug!(table = %table, "Change feed subscription opened");
        Subscription {
            receiver,
            table,
            filter,
            kind: ChangeKind::Insert,
        }
    }

    /// Drop every current subscriber's channel.
    ///
    /// Open subscriptions drain what was already buffered and then report
    /// [`FeedError::Closed`]. New subscriptions attach to a fresh channel.
    pub async fn disconnect_all(&self) {
        let mut sender = self.sender.write().await;
        let (fresh, _) = broadcast::channel(self.capacity);
        let dropped = sender.receiver_count();
        *sender = fresh;
        warn!(dropped, "Change feed disconnected all subscribers");
    }

    /// Number of open subscriptions.
    pub async fn receiver_count(&self) -> usize {
        self.sender.read().await.receiver_count()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(CHANNEL_CAPACITY)
    }
}

/// Live subscription to one table. Dropping it unsubscribes.
pub struct Subscription {
    receiver: broadcast::Receiver<Arc<RowChange>>,
    table: Table,
    filter: Filter,
    kind: ChangeKind,
}

impl Subscription {
    pub fn table(&self) -> Table {
        self.table
    }

    /// Next matching row.
    pub async fn recv(&mut self) -> Result<Row, FeedError> {
        loop {
            match self.receiver.recv().await {
                Ok(change) => {
                    if change.table != self.table
                        || change.kind != self.kind
                        || !self.filter.matches(&change.row)
                    {
                        continue;
                    }
                    return Ok(change.row.clone());
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(table = %self.table, skipped = n, "Subscription lagged");
                    return Err(FeedError::Lagged(n));
                }
                Err(broadcast::error::RecvError::Closed) => {
                    info!(table = %self.table, "Subscription closed");
                    return Err(FeedError::Closed);
                }
            }
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("table", &self.table)
            .field("filter", &self.filter)
            .finish()
    }
}
