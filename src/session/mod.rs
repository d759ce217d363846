//! Per-session enforcement state.
//!
//! Two session-keyed maps back the policy engine: the outstanding
//! hand-off per session, and the running count of consecutive exploration
//! calls. Both live in engine-owned `DashMap`s (no module-level
//! singletons), entries are touched with single map operations, and a
//! background sweep evicts sessions idle past their TTL.

pub mod sweep;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

/// An outstanding hand-off request awaiting its execution call.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingDelegation {
    pub agent: String,
    pub created_at: DateTime<Utc>,
}

/// Tracks at most one pending hand-off per session.
#[derive(Debug, Default)]
pub struct DelegationTracker {
    entries: DashMap<String, PendingDelegation>,
}

impl DelegationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a prepared hand-off. A new delegation observed while one is
    /// pending overwrites it.
    pub fn record(&self, session_id: &str, agent: &str) {
        self.entries.insert(
            session_id.to_string(),
            PendingDelegation {
                agent: agent.to_string(),
                created_at: Utc::now(),
            },
        );
    }

    /// The pending hand-off for a session, if any.
    pub fn pending(&self, session_id: &str) -> Option<PendingDelegation> {
        self.entries.get(session_id).map(|e| e.clone())
    }

    /// Remove and return the session's pending hand-off.
    pub fn take(&self, session_id: &str) -> Option<PendingDelegation> {
        self.entries.remove(session_id).map(|(_, e)| e)
    }

    /// Drop entries whose hand-off was requested longer than `ttl` ago.
    pub fn sweep_expired(&self, ttl: Duration) {
        let cutoff = Utc::now() - ttl;
        self.entries.retain(|_, entry| entry.created_at >= cutoff);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Running count of consecutive exploration-category calls in a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplorationCounter {
    pub count: u32,
    pub last_seen: DateTime<Utc>,
}

/// Tracks exploration pressure per session.
#[derive(Debug, Default)]
pub struct ExplorationTracker {
    entries: DashMap<String, ExplorationCounter>,
}

impl ExplorationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one exploration call and return the new consecutive total.
    pub fn record(&self, session_id: &str) -> u32 {
        let mut entry = self
            .entries
            .entry(session_id.to_string())
            .or_insert(ExplorationCounter {
                count: 0,
                last_seen: Utc::now(),
            });
        entry.count += 1;
        entry.last_seen = Utc::now();
        entry.count
    }

    /// Current consecutive count for a session.
    pub fn count(&self, session_id: &str) -> u32 {
        self.entries.get(session_id).map(|e| e.count).unwrap_or(0)
    }

    /// Reset a session's counter (a completed hand-off resets exploration
    /// pressure).
    pub fn reset(&self, session_id: &str) {
        self.entries.remove(session_id);
    }

    /// Drop entries idle longer than `ttl`.
    pub fn sweep_expired(&self, ttl: Duration) {
        let cutoff = Utc::now() - ttl;
        self.entries.retain(|_, entry| entry.last_seen >= cutoff);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delegation_record_and_take() {
        let tracker = DelegationTracker::new();
        tracker.record("s1", "executor");

        let pending = tracker.pending("s1").unwrap();
        assert_eq!(pending.agent, "executor");

        let taken = tracker.take("s1").unwrap();
        assert_eq!(taken.agent, "executor");
        assert!(tracker.pending("s1").is_none());
    }

    #[test]
    fn test_delegation_overwrites_existing_entry() {
        let tracker = DelegationTracker::new();
        tracker.record("s1", "executor");
        tracker.record("s1", "researcher");

        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.pending("s1").unwrap().agent, "researcher");
    }

    #[test]
    fn test_delegation_sessions_are_independent() {
        let tracker = DelegationTracker::new();
        tracker.record("s1", "executor");
        tracker.record("s2", "researcher");

        tracker.take("s1");
        assert_eq!(tracker.pending("s2").unwrap().agent, "researcher");
    }

    #[test]
    fn test_delegation_sweep_removes_expired() {
        let tracker = DelegationTracker::new();
        tracker.record("s1", "executor");

        // Anything older than a zero-width TTL window is expired.
        tracker.sweep_expired(Duration::seconds(-1));
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_delegation_sweep_keeps_fresh_entries() {
        let tracker = DelegationTracker::new();
        tracker.record("s1", "executor");

        tracker.sweep_expired(Duration::hours(1));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_exploration_counts_consecutive_calls() {
        let tracker = ExplorationTracker::new();
        assert_eq!(tracker.record("s1"), 1);
        assert_eq!(tracker.record("s1"), 2);
        assert_eq!(tracker.record("s1"), 3);
        assert_eq!(tracker.count("s1"), 3);
    }

    #[test]
    fn test_exploration_reset_clears_counter() {
        let tracker = ExplorationTracker::new();
        tracker.record("s1");
        tracker.record("s1");
        tracker.reset("s1");
        assert_eq!(tracker.count("s1"), 0);
        assert_eq!(tracker.record("s1"), 1);
    }

    #[test]
    fn test_exploration_sessions_are_independent() {
        let tracker = ExplorationTracker::new();
        tracker.record("s1");
        tracker.record("s1");
        assert_eq!(tracker.record("s2"), 1);
    }

    #[test]
    fn test_exploration_sweep_removes_idle_sessions() {
        let tracker = ExplorationTracker::new();
        tracker.record("s1");

        tracker.sweep_expired(Duration::seconds(-1));
        assert!(tracker.is_empty());

        tracker.record("s2");
        tracker.sweep_expired(Duration::hours(1));
        assert_eq!(tracker.len(), 1);
    }
}
