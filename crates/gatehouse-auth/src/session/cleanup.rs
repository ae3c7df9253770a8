//! Periodic removal of expired sessions.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use super::provider::SessionProvider;

/// Background task that sweeps expired sessions on a fixed interval.
#[derive(Debug, Clone)]
pub struct SessionSweeper {
    /// Store to sweep.
    store: Arc<dyn SessionProvider>,
    /// Time between sweeps.
    interval: Duration,
}

impl SessionSweeper {
    /// Creates a new sweeper.
    pub fn new(store: Arc<dyn SessionProvider>, interval: Duration) -> Self {
        Self { store, interval }
    }

    /// Runs a single sweep and logs the outcome. Returns the number of
    /// sessions removed; failures count as zero.
    pub async fn sweep_once(&self) -> usize {
        match self.store.sweep().await {
            Ok(0) => {
                debug!("No expired sessions");
                0
            }
            Ok(removed) => {
                info!(removed, "Swept expired sessions");
                removed
            }
            Err(e) => {
                error!(error = %e, "Session sweep failed");
                0
            }
        }
    }

    /// Sweeps until `shutdown` flips to `true` or its sender is dropped.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval_secs = self.interval.as_secs(),
            "Session sweeper started"
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.sweep_once().await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Session sweeper stopped");
    }
}
