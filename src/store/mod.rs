//! External state-store and plan-artifact boundaries.
//!
//! The engine never touches durable storage itself: it reads workflow
//! state through [`StateStore`] and requests every mutation through the
//! same trait. [`InMemoryStateStore`] is the reference implementation
//! used by embedders without a durable backend and by the scenario tests.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::StoreError;
use crate::workflow::{WorkflowPhase, WorkflowState, is_valid_transition};

/// Kind of event recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditKind {
    /// An automatic guard-approved phase transition.
    PhaseTransition,
    /// An operator-forced transition that bypassed guard evaluation.
    ForcedTransition,
    /// A pre-action deny decision.
    ActionBlocked,
}

/// Immutable record of an enforcement decision or phase transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub kind: AuditKind,
    /// Human-readable description of what happened and why.
    pub description: String,
    /// The tool or transition the entry refers to.
    pub action: String,
}

impl AuditEntry {
    fn new(kind: AuditKind, description: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            kind,
            description: description.into(),
            action: action.into(),
        }
    }

    /// Record a guard-approved automatic transition.
    pub fn phase_transition(
        from: WorkflowPhase,
        to: WorkflowPhase,
        reason: impl std::fmt::Display,
    ) -> Self {
        Self::new(
            AuditKind::PhaseTransition,
            format!("Auto-advanced {from} → {to}: {reason}"),
            format!("{from} → {to}"),
        )
    }

    /// Record an operator-forced transition with its mandatory reason.
    pub fn forced_transition(
        from: WorkflowPhase,
        to: WorkflowPhase,
        reason: impl std::fmt::Display,
    ) -> Self {
        Self::new(
            AuditKind::ForcedTransition,
            format!("Forced {from} → {to}: {reason}"),
            format!("{from} → {to}"),
        )
    }

    /// Record a blocked pre-action attempt.
    pub fn blocked(tool_id: &str, description: impl Into<String>) -> Self {
        Self::new(AuditKind::ActionBlocked, description, tool_id)
    }
}

/// Partial update to workflow fields. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowUpdate {
    pub interview_complete: Option<bool>,
    pub spec_locked: Option<bool>,
    pub acceptance_confirmed: Option<bool>,
    pub current_wave: Option<u32>,
    pub total_waves: Option<u32>,
}

impl WorkflowUpdate {
    /// The reset applied when a cycle completes (accept → idle): all
    /// per-cycle flags and wave counters back to their defaults.
    pub fn cycle_reset() -> Self {
        Self {
            interview_complete: None,
            spec_locked: Some(false),
            acceptance_confirmed: Some(false),
            current_wave: Some(0),
            total_waves: Some(0),
        }
    }

    /// Apply this update to a state record in place.
    pub fn apply(&self, state: &mut WorkflowState) {
        if let Some(v) = self.interview_complete {
            state.interview_complete = v;
        }
        if let Some(v) = self.spec_locked {
            state.spec_locked = v;
        }
        if let Some(v) = self.acceptance_confirmed {
            state.acceptance_confirmed = v;
        }
        if let Some(v) = self.current_wave {
            state.current_wave = v;
        }
        if let Some(v) = self.total_waves {
            state.total_waves = v;
        }
        state.last_activity = Utc::now();
    }
}

/// The durable workflow record, owned by the host.
///
/// `request_transition` validates against the phase table and reports
/// rejection as `Ok(false)`, never as an error; `force_transition` is the
/// explicit escape hatch and always records its reason in the audit log.
pub trait StateStore: Send + Sync {
    fn get_state(&self) -> Result<WorkflowState, StoreError>;

    /// Request a guard-approved transition. Returns `false` when the
    /// transition is not in the phase table or the store's current phase
    /// no longer matches.
    fn request_transition(&self, to: WorkflowPhase) -> Result<bool, StoreError>;

    /// Force a transition outside the table. The reason is mandatory and
    /// must be audited by the implementation.
    fn force_transition(&self, to: WorkflowPhase, reason: &str) -> Result<(), StoreError>;

    fn update_workflow_fields(&self, update: WorkflowUpdate) -> Result<(), StoreError>;

    fn append_audit_entry(&self, entry: AuditEntry) -> Result<(), StoreError>;
}

/// Existence check for the execution plan document.
///
/// Used only by the specify → execute guard; the engine never reads the
/// document itself.
pub trait PlanArtifacts: Send + Sync {
    fn plan_exists(&self) -> bool;
}

/// Plan-artifact check against a path on disk.
pub struct FsPlanArtifacts {
    path: std::path::PathBuf,
}

impl FsPlanArtifacts {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PlanArtifacts for FsPlanArtifacts {
    fn plan_exists(&self) -> bool {
        self.path.exists()
    }
}

/// Fixed-answer plan check for tests and embedders that track the plan
/// elsewhere.
pub struct StaticPlanArtifacts(pub bool);

impl PlanArtifacts for StaticPlanArtifacts {
    fn plan_exists(&self) -> bool {
        self.0
    }
}

/// In-memory state store.
#[derive(Default)]
pub struct InMemoryStateStore {
    state: Mutex<WorkflowState>,
    audit: Mutex<Vec<AuditEntry>>,
}

impl InMemoryStateStore {
    pub fn new(state: WorkflowState) -> Self {
        Self {
            state: Mutex::new(state),
            audit: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of the audit log, oldest first.
    pub fn audit_log(&self) -> Vec<AuditEntry> {
        self.audit.lock().map(|log| log.clone()).unwrap_or_default()
    }

    fn lock_state(&self) -> Result<std::sync::MutexGuard<'_, WorkflowState>, StoreError> {
        self.state.lock().map_err(|_| StoreError::Unavailable {
            reason: "state lock poisoned".to_string(),
        })
    }
}

impl StateStore for InMemoryStateStore {
    fn get_state(&self) -> Result<WorkflowState, StoreError> {
        Ok(self.lock_state()?.clone())
    }

    fn request_transition(&self, to: WorkflowPhase) -> Result<bool, StoreError> {
        let mut state = self.lock_state()?;
        if !is_valid_transition(state.phase, to) {
            return Ok(false);
        }
        state.phase = to;
        state.last_activity = Utc::now();
        Ok(true)
    }

    fn force_transition(&self, to: WorkflowPhase, reason: &str) -> Result<(), StoreError> {
        let from = {
            let mut state = self.lock_state()?;
            let from = state.phase;
            state.phase = to;
            state.last_activity = Utc::now();
            from
        };
        self.append_audit_entry(AuditEntry::forced_transition(from, to, reason))
    }

    fn update_workflow_fields(&self, update: WorkflowUpdate) -> Result<(), StoreError> {
        let mut state = self.lock_state()?;
        update.apply(&mut state);
        Ok(())
    }

    fn append_audit_entry(&self, entry: AuditEntry) -> Result<(), StoreError> {
        self.audit
            .lock()
            .map_err(|_| StoreError::Unavailable {
                reason: "audit lock poisoned".to_string(),
            })?
            .push(entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_transition_follows_table() {
        let store = InMemoryStateStore::new(WorkflowState::at_phase(WorkflowPhase::Idle));
        assert!(store.request_transition(WorkflowPhase::Plan).unwrap());
        assert_eq!(store.get_state().unwrap().phase, WorkflowPhase::Plan);
    }

    #[test]
    fn test_request_transition_rejects_off_table() {
        let store = InMemoryStateStore::new(WorkflowState::at_phase(WorkflowPhase::Idle));
        assert!(!store.request_transition(WorkflowPhase::Execute).unwrap());
        assert_eq!(store.get_state().unwrap().phase, WorkflowPhase::Idle);
    }

    #[test]
    fn test_force_transition_bypasses_table_and_audits_reason() {
        let store = InMemoryStateStore::new(WorkflowState::at_phase(WorkflowPhase::Idle));
        store
            .force_transition(WorkflowPhase::Execute, "operator correction after crash")
            .unwrap();

        assert_eq!(store.get_state().unwrap().phase, WorkflowPhase::Execute);
        let log = store.audit_log();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].kind, AuditKind::ForcedTransition);
        assert!(log[0].description.contains("operator correction"));
        assert_eq!(log[0].action, "idle → execute");
    }

    #[test]
    fn test_update_workflow_fields_partial() {
        let store = InMemoryStateStore::new(WorkflowState::at_phase(WorkflowPhase::Specify));
        store
            .update_workflow_fields(WorkflowUpdate {
                spec_locked: Some(true),
                total_waves: Some(4),
                ..Default::default()
            })
            .unwrap();

        let state = store.get_state().unwrap();
        assert!(state.spec_locked);
        assert_eq!(state.total_waves, 4);
        // Untouched fields keep their values.
        assert!(!state.acceptance_confirmed);
        assert_eq!(state.current_wave, 0);
    }

    #[test]
    fn test_cycle_reset_clears_per_cycle_fields() {
        let mut state = WorkflowState::at_phase(WorkflowPhase::Accept);
        state.interview_complete = true;
        state.spec_locked = true;
        state.acceptance_confirmed = true;
        state.current_wave = 3;
        state.total_waves = 3;

        WorkflowUpdate::cycle_reset().apply(&mut state);

        assert!(!state.spec_locked);
        assert!(!state.acceptance_confirmed);
        assert_eq!(state.current_wave, 0);
        assert_eq!(state.total_waves, 0);
        // interview_complete is not a per-cycle flag.
        assert!(state.interview_complete);
    }

    #[test]
    fn test_audit_entry_constructors() {
        let auto = AuditEntry::phase_transition(
            WorkflowPhase::Specify,
            WorkflowPhase::Execute,
            "spec locked and plan present",
        );
        assert_eq!(auto.kind, AuditKind::PhaseTransition);
        assert!(auto.description.contains("specify → execute"));

        let blocked = AuditEntry::blocked("WebSearch", "research tools are delegated");
        assert_eq!(blocked.kind, AuditKind::ActionBlocked);
        assert_eq!(blocked.action, "WebSearch");
    }

    #[test]
    fn test_static_plan_artifacts() {
        assert!(StaticPlanArtifacts(true).plan_exists());
        assert!(!StaticPlanArtifacts(false).plan_exists());
    }

    #[test]
    fn test_fs_plan_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("PLAN.md");

        let check = FsPlanArtifacts::new(&path);
        assert!(!check.plan_exists());

        std::fs::write(&path, "# Plan").unwrap();
        assert!(check.plan_exists());
    }
}
