//! Automatic phase progression.
//!
//! Invoked once per completed action. Evaluates the guards in a fixed
//! order (specify → execute, execute → accept, accept → idle); at most one
//! transition fires per invocation. A fired transition is requested from
//! the state store, audited, and announced by appending a notice to the
//! action's displayed result. A store-rejected transition is a silent
//! no-op: the guard was checked against a snapshot, and the store is the
//! authority.

use std::sync::Arc;

use super::WorkflowPhase;
use super::guards::check_guards;
use crate::hooks::ActionResult;
use crate::store::{AuditEntry, PlanArtifacts, StateStore, WorkflowUpdate};

pub struct AutoProgressionMonitor {
    store: Arc<dyn StateStore>,
    plan: Arc<dyn PlanArtifacts>,
}

impl AutoProgressionMonitor {
    pub fn new(store: Arc<dyn StateStore>, plan: Arc<dyn PlanArtifacts>) -> Self {
        Self { store, plan }
    }

    /// Check guards against the current state and fire at most one
    /// transition, appending a notice to `result` on success.
    ///
    /// Never fails: a store read error, a rejected transition, or a
    /// failed audit append all degrade to "no progression effect".
    pub fn run_auto_progression(&self, result: &mut ActionResult) {
        let state = match self.store.get_state() {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(error = %e, "skipping auto-progression: state unavailable");
                return;
            }
        };

        let check = check_guards(&state, self.plan.plan_exists());

        let (from, to, reason) = if check.can_advance_specify_to_execute {
            (
                WorkflowPhase::Specify,
                WorkflowPhase::Execute,
                "spec locked and execution plan present".to_string(),
            )
        } else if check.can_advance_execute_to_accept {
            (
                WorkflowPhase::Execute,
                WorkflowPhase::Accept,
                format!("all {} waves complete", state.total_waves),
            )
        } else if check.can_advance_accept_to_idle {
            (
                WorkflowPhase::Accept,
                WorkflowPhase::Idle,
                "acceptance confirmed".to_string(),
            )
        } else {
            return;
        };

        match self.store.request_transition(to) {
            Ok(true) => {}
            Ok(false) => {
                // Guard held against our snapshot but the store refused;
                // likely a concurrent change. Nothing to announce.
                tracing::debug!(%from, %to, "store rejected guard-approved transition");
                return;
            }
            Err(e) => {
                tracing::warn!(%from, %to, error = %e, "transition request failed");
                return;
            }
        }

        tracing::info!(%from, %to, %reason, "workflow phase auto-advanced");

        if let Err(e) = self
            .store
            .append_audit_entry(AuditEntry::phase_transition(from, to, &reason))
        {
            tracing::warn!(error = %e, "failed to append phase-transition audit entry");
        }

        if to == WorkflowPhase::Idle
            && let Err(e) = self.store.update_workflow_fields(WorkflowUpdate::cycle_reset())
        {
            tracing::warn!(error = %e, "failed to reset workflow fields after cycle completion");
        }

        result.append_block(&format!("Phase advanced: {from} → {to} ({reason})."));
    }

    /// Force a transition outside the phase table.
    ///
    /// The escape hatch for operator-driven corrections: bypasses guard
    /// evaluation entirely but always records the reason.
    pub fn force_transition(
        &self,
        to: WorkflowPhase,
        reason: &str,
    ) -> Result<(), crate::errors::StoreError> {
        tracing::info!(%to, %reason, "forcing workflow transition");
        self.store.force_transition(to, reason)
    }
}
