//! Background driver for a [`Reconciler`].

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, warn};

use super::{is_row_level, ReconcileEvent, Reconciler, SyncState};
use crate::profiles::Joined;
use crate::repository::{Authored, Resource};

/// Point-in-time view of a reconciled list.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<R> {
    pub state: SyncState,
    pub entries: Vec<Joined<R>>,
}

/// Owner of a running reconciler. Dropping it aborts the task, which
/// releases the subscription.
pub struct ReconcilerHandle<R> {
    receiver: watch::Receiver<Snapshot<R>>,
    task: JoinHandle<()>,
}

impl<R: Clone> ReconcilerHandle<R> {
    pub fn snapshot(&self) -> Snapshot<R> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next published snapshot. Fails once the task ended.
    pub async fn changed(&mut self) -> Result<Snapshot<R>, watch::error::RecvError> {
        self.receiver.changed().await?;
        Ok(self.receiver.borrow_and_update().clone())
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot<R>> {
        self.receiver.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl<R> Drop for ReconcilerHandle<R> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub(super) fn spawn<R: Resource + Authored>(mut reconciler: Reconciler<R>) -> ReconcilerHandle<R> {
    let (sender, receiver) = watch::channel(reconciler.snapshot());

    let task = tokio::spawn(async move {
        if reconciler.state() != SyncState::Live {
            if let Err(e) = reconciler.start().await {
                error!(error = %e, group_id = %reconciler.group_id(), "Reconciler failed to start");
                let _ = sender.send(reconciler.snapshot());
                return;
            }
        }
        if sender.send(reconciler.snapshot()).is_err() {
            return;
        }

        loop {
            match reconciler.poll().await {
                Ok(ReconcileEvent::Duplicate(_)) => continue,
                Ok(_) => {}
                Err(e) if reconciler.state() == SyncState::Disconnected => {
                    error!(error = %e, group_id = %reconciler.group_id(), "Reconciler gave up resyncing");
                    let _ = sender.send(reconciler.snapshot());
                    return;
                }
                Err(e) if is_row_level(&e) => {
                    warn!(error = %e, "Pushed row skipped");
                    continue;
                }
                Err(e) => {
                    error!(error = %e, group_id = %reconciler.group_id(), "Reconciler stopped");
                    reconciler.stop();
                    let _ = sender.send(reconciler.snapshot());
                    return;
                }
            }
            if sender.send(reconciler.snapshot()).is_err() {
                return;
            }
        }
    });

    ReconcilerHandle { receiver, task }
}
