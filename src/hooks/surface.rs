//! `EnforcementHooks`: the assembled engine behind the host's two
//! interception points.
//!
//! One instance owns one `RolePolicyEngine`, one `AutoProgressionMonitor`,
//! and the session trackers they share. The host calls `pre_action` before
//! dispatching a tool call and `post_action` after the call's result is
//! available, threading the pre-action verdict through.

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::errors::StoreError;
use crate::hooks::{ActionResult, PermissionDecision};
use crate::policy::engine::RolePolicyEngine;
use crate::session::sweep::{SessionSweeper, SweepHandle};
use crate::session::{DelegationTracker, ExplorationTracker};
use crate::store::{PlanArtifacts, StateStore};
use crate::workflow::WorkflowPhase;
use crate::workflow::progression::AutoProgressionMonitor;

pub struct EnforcementHooks {
    policy: RolePolicyEngine,
    progression: AutoProgressionMonitor,
    delegations: Arc<DelegationTracker>,
    explorations: Arc<ExplorationTracker>,
    config: EngineConfig,
}

impl EnforcementHooks {
    pub fn new(
        store: Arc<dyn StateStore>,
        plan: Arc<dyn PlanArtifacts>,
        config: EngineConfig,
    ) -> Self {
        let delegations = Arc::new(DelegationTracker::new());
        let explorations = Arc::new(ExplorationTracker::new());
        let policy = RolePolicyEngine::new(
            config.enforcement.coordinator.clone(),
            config.enforcement.task_tool.clone(),
            config.enforcement.nudge_threshold,
            store.clone(),
            delegations.clone(),
            explorations.clone(),
        );
        let progression = AutoProgressionMonitor::new(store, plan);
        Self {
            policy,
            progression,
            delegations,
            explorations,
            config,
        }
    }

    /// Pre-action interception point. Returns the verdict the host must
    /// honor and thread back into `post_action` for this same call.
    pub fn pre_action(
        &self,
        actor_id: &str,
        tool_id: &str,
        path: Option<&str>,
    ) -> PermissionDecision {
        self.policy.evaluate_permission(actor_id, tool_id, path)
    }

    /// Post-action interception point. Mutates `result` in place:
    /// delegation tracking and guidance first, then at most one automatic
    /// phase transition. Never fails the host's action.
    pub fn post_action(
        &self,
        session_id: &str,
        actor_id: &str,
        tool_id: &str,
        decision: &PermissionDecision,
        result: &mut ActionResult,
    ) {
        self.policy
            .observe_action(session_id, actor_id, tool_id, decision, result);
        self.progression.run_auto_progression(result);
    }

    /// Force a workflow transition outside the phase table, with an
    /// audited reason.
    pub fn force_transition(&self, to: WorkflowPhase, reason: &str) -> Result<(), StoreError> {
        self.progression.force_transition(to, reason)
    }

    /// Spawn the periodic session-TTL sweep on the current tokio runtime.
    pub fn start_sweeper(&self) -> SweepHandle {
        SessionSweeper::new(
            self.delegations.clone(),
            self.explorations.clone(),
            self.config.sweep_interval(),
            self.config.session_ttl(),
        )
        .spawn()
    }
}
