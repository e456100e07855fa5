//! Stale-response guard.
//!
//! Calls are not cancelled when a consumer stops caring about them. Instead
//! the consumer takes a [`Ticket`] before the call and checks it when the
//! response lands; anything that arrives after a newer request or after
//! [`Interest::withdraw`] is dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Generation counter shared between a consumer and its tickets.
#[derive(Debug, Clone, Default)]
pub struct Interest {
    generation: Arc<AtomicU64>,
}

impl Interest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request. Supersedes every earlier ticket.
    pub fn ticket(&self) -> Ticket {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        Ticket {
            generation,
            source: Arc::clone(&self.generation),
        }
    }

    /// Consumer went away; every outstanding ticket becomes stale.
    pub fn withdraw(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }
}

/// Proof of interest taken when a request started.
#[derive(Debug, Clone)]
pub struct Ticket {
    generation: u64,
    source: Arc<AtomicU64>,
}

impl Ticket {
    pub fn is_current(&self) -> bool {
        self.source.load(Ordering::Acquire) == self.generation
    }
}
