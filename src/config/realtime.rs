//! Realtime reconciliation configuration.

use std::time::Duration;

use backon::ExponentialBuilder;
use serde::Deserialize;

/// Resync policy applied when a push channel drops.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RealtimeConfig {
    pub resync_min_delay_ms: u64,
    pub resync_max_delay_ms: u64,
    /// Re-fetch attempts before the reconciler gives up and stays
    /// disconnected.
    pub resync_max_attempts: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            resync_min_delay_ms: 200,
            resync_max_delay_ms: 5000,
            resync_max_attempts: 5,
        }
    }
}

impl RealtimeConfig {
    /// Backoff for resync attempts.
    pub fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(self.resync_min_delay_ms))
            .with_max_delay(Duration::from_millis(self.resync_max_delay_ms))
            .with_max_times(self.resync_max_attempts)
            .with_jitter()
    }
}
