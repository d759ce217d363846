//! Enforcement hook surface.
//!
//! The composition point between the engine and the host's interception
//! points:
//! - `PermissionDecision` / `DenyReason`: the pre-action verdict
//! - `ActionResult`: the mutable displayed-result the post-action path
//!   appends to
//! - `EnforcementHooks`: one engine instance wired to one store, exposing
//!   `pre_action` and `post_action`

mod surface;

pub use surface::EnforcementHooks;

use serde::{Deserialize, Serialize};

use crate::rules::{EXECUTION_AGENT, RESEARCH_AGENT};

/// Why a pre-action request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// Research-category tools are reserved for the research agent.
    ResearchTool,
    /// Write/edit on a protected source path is reserved for the
    /// execution agent.
    ProtectedPath,
}

impl DenyReason {
    /// The worker agent that should have been delegated to instead.
    pub fn suggested_agent(&self) -> &'static str {
        match self {
            DenyReason::ResearchTool => RESEARCH_AGENT,
            DenyReason::ProtectedPath => EXECUTION_AGENT,
        }
    }
}

impl std::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DenyReason::ResearchTool => {
                write!(f, "research tools are delegated to the {RESEARCH_AGENT} agent")
            }
            DenyReason::ProtectedPath => write!(
                f,
                "direct edits to protected source paths are delegated to the {EXECUTION_AGENT} agent"
            ),
        }
    }
}

/// Verdict returned from the pre-action interception point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "decision", content = "reason")]
pub enum PermissionDecision {
    /// No restriction; the caller's own decision stands.
    Allow,
    Deny(DenyReason),
}

impl PermissionDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, PermissionDecision::Allow)
    }

    /// The deny reason, when this decision is a deny.
    pub fn deny_reason(&self) -> Option<DenyReason> {
        match self {
            PermissionDecision::Allow => None,
            PermissionDecision::Deny(reason) => Some(*reason),
        }
    }
}

/// Mutable displayed result of a completed action.
///
/// The post-action path appends guidance blocks; the host displays the
/// final text.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionResult {
    pub text: String,
}

impl ActionResult {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Append a block separated from the existing text by a blank line.
    pub fn append_block(&mut self, block: &str) {
        if !self.text.is_empty() {
            self.text.push_str("\n\n");
        }
        self.text.push_str(block);
    }
}

/// Example call shape for handing work to a worker agent.
pub(crate) fn task_call_example(task_tool: &str, agent: &str, description: &str) -> String {
    format!(
        "{task_tool}(subagent_type: \"{agent}\", description: \"{description}\", prompt: \"<full instructions for the agent>\")"
    )
}
