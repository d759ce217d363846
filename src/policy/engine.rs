//! Role policy engine.
//!
//! Composes the path policy, tool classifier, and both session trackers
//! into the two decisions invoked around every action:
//! - `evaluate_permission`: the pre-action allow/deny verdict
//! - `observe_action`: the post-action pass that tracks hand-offs,
//!   nudges away from manual exploration, and turns denies into guidance
//!
//! Only the coordinator role is ever restricted; worker actors pass
//! through both decisions untouched.

use std::sync::Arc;

use crate::hooks::{ActionResult, DenyReason, PermissionDecision, task_call_example};
use crate::marker::parse_delegation_marker;
use crate::policy::paths::is_protected_path;
use crate::policy::tools::{classify_tool, is_write_tool, normalize_tool_id};
use crate::rules::{EXPLORATION_AGENT, ToolCategory};
use crate::session::{DelegationTracker, ExplorationTracker};
use crate::store::{AuditEntry, StateStore};

pub struct RolePolicyEngine {
    coordinator_name: String,
    task_tool: String,
    nudge_threshold: u32,
    store: Arc<dyn StateStore>,
    delegations: Arc<DelegationTracker>,
    explorations: Arc<ExplorationTracker>,
}

impl RolePolicyEngine {
    pub fn new(
        coordinator_name: impl Into<String>,
        task_tool: impl Into<String>,
        nudge_threshold: u32,
        store: Arc<dyn StateStore>,
        delegations: Arc<DelegationTracker>,
        explorations: Arc<ExplorationTracker>,
    ) -> Self {
        Self {
            coordinator_name: coordinator_name.into(),
            task_tool: task_tool.into(),
            nudge_threshold,
            store,
            delegations,
            explorations,
        }
    }

    /// Whether the actor is the coordinator role. The canonical name
    /// matches case-insensitively; orchestrator-named variants count too.
    pub fn is_coordinator_role(&self, actor_id: &str) -> bool {
        let lower = actor_id.to_lowercase();
        lower == self.coordinator_name.to_lowercase() || lower.contains("orchestrator")
    }

    /// Pre-action verdict. Synchronous; the only side effect is a
    /// fire-and-forget audit append on deny.
    pub fn evaluate_permission(
        &self,
        actor_id: &str,
        tool_id: &str,
        path: Option<&str>,
    ) -> PermissionDecision {
        if !self.is_coordinator_role(actor_id) {
            return PermissionDecision::Allow;
        }

        if classify_tool(tool_id) == Some(ToolCategory::Research) {
            self.audit_deny(actor_id, tool_id, DenyReason::ResearchTool);
            return PermissionDecision::Deny(DenyReason::ResearchTool);
        }

        if is_write_tool(tool_id)
            && let Some(path) = path
            && is_protected_path(path)
        {
            self.audit_deny(actor_id, tool_id, DenyReason::ProtectedPath);
            return PermissionDecision::Deny(DenyReason::ProtectedPath);
        }

        PermissionDecision::Allow
    }

    fn audit_deny(&self, actor_id: &str, tool_id: &str, reason: DenyReason) {
        tracing::debug!(actor = actor_id, tool = tool_id, %reason, "blocking coordinator action");
        let entry = AuditEntry::blocked(
            tool_id,
            format!("Blocked {actor_id} call to {tool_id}: {reason}"),
        );
        if let Err(e) = self.store.append_audit_entry(entry) {
            tracing::warn!(error = %e, "failed to append deny audit entry");
        }
    }

    /// Post-action pass over a completed call's displayed result.
    ///
    /// `decision` is the verdict `evaluate_permission` returned for this
    /// same call; the host threads it through so deny guidance does not
    /// depend on engine-side correlation.
    pub fn observe_action(
        &self,
        session_id: &str,
        actor_id: &str,
        tool_id: &str,
        decision: &PermissionDecision,
        result: &mut ActionResult,
    ) {
        if !self.is_coordinator_role(actor_id) {
            return;
        }

        if let Some(marker) = parse_delegation_marker(&result.text) {
            self.delegations.record(session_id, &marker.agent);
            tracing::debug!(
                session = session_id,
                agent = %marker.agent,
                "recorded pending delegation"
            );
            let description = if marker.description.is_empty() {
                "<one-line summary of the hand-off>"
            } else {
                &marker.description
            };
            result.append_block(&format!(
                "ACTION REQUIRED: a hand-off to \"{agent}\" has been prepared. \
                 Execute it now with the {task_tool} tool:\n  {example}",
                agent = marker.agent,
                task_tool = self.task_tool,
                example = task_call_example(&self.task_tool, &marker.agent, description),
            ));
            return;
        }

        if normalize_tool_id(tool_id) == self.task_tool {
            if let Some(done) = self.delegations.take(session_id) {
                tracing::debug!(
                    session = session_id,
                    agent = %done.agent,
                    "delegation executed"
                );
            }
            // A completed hand-off resets exploration pressure.
            self.explorations.reset(session_id);
            return;
        }

        if let Some(reason) = decision.deny_reason() {
            let agent = reason.suggested_agent();
            result.append_block(&format!(
                "This call was blocked: {reason}. Delegate instead:\n  {example}",
                example = task_call_example(&self.task_tool, agent, "<one-line summary of the task>"),
            ));
            return;
        }

        if classify_tool(tool_id) == Some(ToolCategory::Exploration) {
            let count = self.explorations.record(session_id);
            if count >= self.nudge_threshold {
                result.append_block(&format!(
                    "Consider Delegating Exploration: {count} consecutive exploration calls \
                     in this session. The {EXPLORATION_AGENT} agent can cover this ground in \
                     one delegated task:\n  {example}",
                    example = task_call_example(
                        &self.task_tool,
                        EXPLORATION_AGENT,
                        "<what to find in the codebase>",
                    ),
                ));
            }
        }
    }
}
