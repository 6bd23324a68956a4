//! Periodic eviction of expired denylist entries

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::clock::Clock;
use super::denylist::TokenDenylist;

/// Configuration for the denylist cleanup task
#[derive(Debug, Clone)]
pub struct DenylistCleanupConfig {
    /// How often to purge (in seconds)
    pub interval_seconds: u64,
    pub enabled: bool,
}

impl Default for DenylistCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 600,
            enabled: true,
        }
    }
}

/// Background purge of revoked ids whose tokens have expired
pub struct DenylistCleanup {
    denylist: Arc<dyn TokenDenylist>,
    clock: Arc<dyn Clock>,
    config: DenylistCleanupConfig,
}

impl DenylistCleanup {
    pub fn new(
        denylist: Arc<dyn TokenDenylist>,
        clock: Arc<dyn Clock>,
        config: DenylistCleanupConfig,
    ) -> Self {
        Self {
            denylist,
            clock,
            config,
        }
    }

    /// Run a single purge cycle, returning the number of evicted entries
    pub fn run_once(&self) -> usize {
        let removed = self.denylist.purge_expired(self.clock.now());
        debug!(
            removed,
            remaining = self.denylist.len(),
            "Denylist purge completed"
        );
        removed
    }

    /// Spawn the purge loop on the current tokio runtime
    pub fn start_background_task(self: Arc<Self>) {
        if !self.config.enabled {
            warn!("Denylist cleanup is disabled");
            return;
        }

        let period = Duration::from_secs(self.config.interval_seconds.max(1));
        tokio::spawn(async move {
            info!(
                "Denylist cleanup started - will run every {} seconds",
                self.config.interval_seconds
            );
            let mut timer = tokio::time::interval(period);
            loop {
                timer.tick().await;
                self.run_once();
            }
        });
    }
}
