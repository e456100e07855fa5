//! Realtime reconciler.
//!
//! Keeps one ordered, duplicate-free list of rows for a (group, resource)
//! pair. The list is seeded by a bulk read and extended by pushed inserts.
//! Pushed rows are appended in arrival order and never re-sorted.
//!
//! ```text
//! Idle ──start──▶ Syncing ──loaded──▶ Live ──channel lost──▶ Disconnected
//!                    ▲                                            │
//!                    └───────────────── resync ◀──────────────────┘
//! ```

mod handle;

#[cfg(test)]
mod tests;

pub use handle::{ReconcilerHandle, Snapshot};

use std::collections::HashSet;
use std::sync::Arc;

use backon::BackoffBuilder;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::RealtimeConfig;
use crate::error::{Result, SyncError};
use crate::feed::Subscription;
use crate::interfaces::RowStore;
use crate::profiles::{DisplayProfile, Joined, ProfileJoiner};
use crate::repository::{Authored, Repository, Resource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Syncing,
    Live,
    Disconnected,
}

/// Outcome of one [`Reconciler::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileEvent {
    /// A new row was appended.
    Appended(Uuid),
    /// A row already in the list was delivered again and dropped.
    Duplicate(Uuid),
    /// The list was rebuilt from a bulk read; carries the row count.
    Resynced(usize),
}

pub struct Reconciler<R> {
    group_id: Uuid,
    repo: Repository<R>,
    joiner: ProfileJoiner,
    realtime: RealtimeConfig,
    state: SyncState,
    entries: Vec<Joined<R>>,
    known: HashSet<Uuid>,
    subscription: Option<Subscription>,
}

impl<R: Resource + Authored> Reconciler<R> {
    pub fn new(store: Arc<dyn RowStore>, group_id: Uuid, realtime: RealtimeConfig) -> Self {
        Self {
            group_id,
            repo: Repository::new(Arc::clone(&store)),
            joiner: ProfileJoiner::new(store),
            realtime,
            state: SyncState::Idle,
            entries: Vec::new(),
            known: HashSet::new(),
            subscription: None,
        }
    }

    pub fn group_id(&self) -> Uuid {
        self.group_id
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn entries(&self) -> &[Joined<R>] {
        &self.entries
    }

    pub fn snapshot(&self) -> Snapshot<R> {
        Snapshot {
            state: self.state,
            entries: self.entries.clone(),
        }
    }

    /// Subscribe, then bulk-load. Subscribing first means nothing committed
    /// between the two calls is missed; overlap is dropped as duplicates.
    #[tracing::instrument(name = "reconciler.start", skip_all, fields(table = %R::TABLE, group_id = %self.group_id))]
    pub async fn start(&mut self) -> Result<usize> {
        self.state = SyncState::Syncing;
        match self.sync_once().await {
            Ok(count) => {
                self.state = SyncState::Live;
                info!(count, "Reconciler live");
                Ok(count)
            }
            Err(e) => {
                self.state = SyncState::Idle;
                Err(e)
            }
        }
    }

    async fn sync_once(&mut self) -> Result<usize> {
        self.subscription = None;
        let subscription = self.repo.subscribe(self.group_id).await?;
        let rows = self.repo.list_by_group(self.group_id).await?;
        let joined = self.joiner.join(rows).await?;

        self.known = joined.iter().map(|j| j.row.id()).collect();
        self.entries = joined;
        self.subscription = Some(subscription);
        Ok(self.entries.len())
    }

    /// Append a row unless its id is already present. Returns whether it
    /// was appended.
    pub fn merge(&mut self, row: R, author: DisplayProfile) -> bool {
        if !self.known.insert(row.id()) {
            return false;
        }
        self.entries.push(Joined { row, author });
        true
    }

    /// Bulk re-fetch after the channel dropped, retrying transient
    /// failures with backoff. Stays disconnected when retries run out.
    #[tracing::instrument(name = "reconciler.resync", skip_all, fields(table = %R::TABLE, group_id = %self.group_id))]
    pub async fn resync(&mut self) -> Result<usize> {
        self.state = SyncState::Syncing;
        let mut delays = self.realtime.backoff().build();
        loop {
            match self.sync_once().await {
                Ok(count) => {
                    self.state = SyncState::Live;
                    info!(count, "Reconciler resynced");
                    return Ok(count);
                }
                Err(e) if e.is_retryable() => match delays.next() {
                    Some(delay) => {
                        warn!(error = %e, ?delay, "Resync failed, retrying");
                        tokio::time::sleep(delay).await;
                    }
                    None => {
                        self.state = SyncState::Disconnected;
                        return Err(e);
                    }
                },
                Err(e) => {
                    self.state = SyncState::Disconnected;
                    return Err(e);
                }
            }
        }
    }

    /// Wait for the next push and fold it in.
    pub async fn poll(&mut self) -> Result<ReconcileEvent> {
        let received = match self.subscription.as_mut() {
            Some(subscription) => subscription.recv().await,
            None => return self.start().await.map(ReconcileEvent::Resynced),
        };

        match received {
            Ok(row) => {
                let item = self.repo.decode(row)?;
                let id = item.id();
                if self.known.contains(&id) {
                    debug!(id = %id, "Duplicate push dropped");
                    return Ok(ReconcileEvent::Duplicate(id));
                }
                let author = match self.joiner.resolve_one(item.author_id()).await {
                    Ok(profile) => profile,
                    Err(e) => {
                        warn!(error = %e, "Author lookup failed for pushed row");
                        DisplayProfile::unknown(item.author_id())
                    }
                };
                self.merge(item, author);
                Ok(ReconcileEvent::Appended(id))
            }
            Err(e) => {
                warn!(table = %R::TABLE, group_id = %self.group_id, error = %e, "Push channel lost");
                self.state = SyncState::Disconnected;
                self.subscription = None;
                self.resync().await.map(ReconcileEvent::Resynced)
            }
        }
    }

    /// Drop the subscription and go idle. The list is kept.
    pub fn stop(&mut self) {
        self.subscription = None;
        self.state = SyncState::Idle;
    }

    /// Run on a background task. Dropping the handle stops it.
    pub fn spawn(self) -> ReconcilerHandle<R> {
        handle::spawn(self)
    }
}

impl<R> std::fmt::Debug for Reconciler<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("table", &std::any::type_name::<R>())
            .field("group_id", &self.group_id)
            .field("state", &self.state)
            .field("entries", &self.entries.len())
            .finish()
    }
}

/// Push errors that should not stop a running reconciler.
fn is_row_level(err: &SyncError) -> bool {
    matches!(err, SyncError::TransientStore(_) | SyncError::Validation { .. })
}
