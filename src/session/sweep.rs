//! Background TTL sweep for abandoned sessions.
//!
//! Bounds memory for sessions that went quiet without a hand-off: a tokio
//! task wakes on a fixed interval and evicts tracker entries past their
//! TTL. Eviction runs against the live maps (DashMap), so it tolerates
//! concurrent mutation from the enforcement call path.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::{DelegationTracker, ExplorationTracker};

pub struct SessionSweeper {
    delegations: Arc<DelegationTracker>,
    explorations: Arc<ExplorationTracker>,
    interval: Duration,
    ttl: chrono::Duration,
}

/// Handle to a running sweep task. `stop()` for clean shutdown.
pub struct SweepHandle {
    token: CancellationToken,
    task: tokio::task::JoinHandle<()>,
}

impl SweepHandle {
    /// Cancel the sweep task and wait for it to finish.
    pub async fn stop(self) {
        self.token.cancel();
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "sweep task did not shut down cleanly");
        }
    }
}

impl SessionSweeper {
    pub fn new(
        delegations: Arc<DelegationTracker>,
        explorations: Arc<ExplorationTracker>,
        interval: Duration,
        ttl: Duration,
    ) -> Self {
        Self {
            delegations,
            explorations,
            interval,
            // chrono::Duration::from_std only fails on out-of-range
            // values; fall back to the default TTL rather than panic.
            ttl: chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::minutes(30)),
        }
    }

    /// Run one eviction pass over both trackers.
    pub fn sweep_once(&self) {
        let before = self.delegations.len() + self.explorations.len();
        self.delegations.sweep_expired(self.ttl);
        self.explorations.sweep_expired(self.ttl);
        let after = self.delegations.len() + self.explorations.len();
        if after < before {
            tracing::debug!(evicted = before - after, "swept expired session entries");
        }
    }

    /// Spawn the periodic sweep task on the current tokio runtime.
    pub fn spawn(self) -> SweepHandle {
        let token = CancellationToken::new();
        let task_token = token.clone();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            // The first tick fires immediately; skip it so a fresh engine
            // does not sweep before anything can age.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => self.sweep_once(),
                    _ = task_token.cancelled() => break,
                }
            }
        });
        SweepHandle { token, task }
    }
}
