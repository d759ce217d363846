//! Delegation marker types and parsing.
//!
//! A delegation-preparation tool signals a prepared hand-off by embedding
//! a tagged block in its displayed result:
//!
//! ```text
//! <delegation-request>{"action": "delegate_via_task", "agent": "executor"}</delegation-request>
//! ```
//!
//! This is a textual side-channel: the marker is advisory, and anything
//! malformed is ignored without error. All text scanning lives behind
//! `parse_delegation_marker` so the channel can be swapped for a typed one
//! without touching the policy engine.

mod parser;

pub use parser::parse_delegation_marker;

use serde::{Deserialize, Serialize};

/// The `action` value that marks a payload as a task hand-off.
pub const DELEGATE_ACTION: &str = "delegate_via_task";

/// Parsed payload of a delegation marker block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelegationMarker {
    /// Hand-off action tag. Only `delegate_via_task` is recognized.
    pub action: String,
    /// Target worker agent for the hand-off.
    pub agent: String,
    /// Short description for the execution call.
    #[serde(default)]
    pub description: String,
    /// Full prompt for the worker agent.
    #[serde(default)]
    pub prompt: String,
}

impl DelegationMarker {
    /// Whether the payload carries the recognized hand-off action.
    pub fn is_task_delegation(&self) -> bool {
        self.action == DELEGATE_ACTION
    }
}
