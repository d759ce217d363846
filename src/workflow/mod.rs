//! Workflow phase model.
//!
//! This module provides:
//! - `WorkflowPhase`: the six-phase cycle the coordinator moves through
//! - `WorkflowState`: the engine's read view of the state store's record
//! - The transition table: which phase changes are ever legal

pub mod guards;
pub mod progression;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Position in the phase cycle.
///
/// The first three transitions are driven by explicit commands; the last
/// three fire automatically when their guard conditions hold (see
/// [`guards`]). `Accept` wraps back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowPhase {
    #[default]
    Idle,
    Plan,
    Research,
    Specify,
    Execute,
    Accept,
}

impl WorkflowPhase {
    /// The phase an automatic or explicit step advances to, if any.
    pub fn next(&self) -> Option<WorkflowPhase> {
        match self {
            WorkflowPhase::Idle => Some(WorkflowPhase::Plan),
            WorkflowPhase::Plan => Some(WorkflowPhase::Research),
            WorkflowPhase::Research => Some(WorkflowPhase::Specify),
            WorkflowPhase::Specify => Some(WorkflowPhase::Execute),
            WorkflowPhase::Execute => Some(WorkflowPhase::Accept),
            WorkflowPhase::Accept => Some(WorkflowPhase::Idle),
        }
    }
}

impl std::fmt::Display for WorkflowPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkflowPhase::Idle => write!(f, "idle"),
            WorkflowPhase::Plan => write!(f, "plan"),
            WorkflowPhase::Research => write!(f, "research"),
            WorkflowPhase::Specify => write!(f, "specify"),
            WorkflowPhase::Execute => write!(f, "execute"),
            WorkflowPhase::Accept => write!(f, "accept"),
        }
    }
}

impl std::str::FromStr for WorkflowPhase {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "idle" => Ok(WorkflowPhase::Idle),
            "plan" => Ok(WorkflowPhase::Plan),
            "research" => Ok(WorkflowPhase::Research),
            "specify" => Ok(WorkflowPhase::Specify),
            "execute" => Ok(WorkflowPhase::Execute),
            "accept" => Ok(WorkflowPhase::Accept),
            _ => anyhow::bail!(
                "Invalid workflow phase '{}'. Valid values: idle, plan, research, specify, execute, accept",
                s
            ),
        }
    }
}

/// Whether `from → to` appears in the transition table.
///
/// The table is the single-step cycle; everything else needs the forced
/// path, which bypasses this check but still records a reason.
pub fn is_valid_transition(from: WorkflowPhase, to: WorkflowPhase) -> bool {
    from.next() == Some(to)
}

/// The engine's view of the workflow record owned by the state store.
///
/// Every field defaults so that a missing or malformed field degrades to
/// "guard not satisfied" instead of failing guard evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowState {
    #[serde(default)]
    pub phase: WorkflowPhase,
    /// Whether the requirements interview has finished.
    #[serde(default)]
    pub interview_complete: bool,
    /// Whether the specification has been locked for execution.
    #[serde(default)]
    pub spec_locked: bool,
    /// Whether the user confirmed acceptance of the delivered work.
    #[serde(default)]
    pub acceptance_confirmed: bool,
    /// Last completed execution wave. Always `<= total_waves`.
    #[serde(default)]
    pub current_wave: u32,
    /// Number of execution waves planned. Zero means no waves defined.
    #[serde(default)]
    pub total_waves: u32,
    #[serde(default = "Utc::now")]
    pub last_activity: DateTime<Utc>,
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self {
            phase: WorkflowPhase::default(),
            interview_complete: false,
            spec_locked: false,
            acceptance_confirmed: false,
            current_wave: 0,
            total_waves: 0,
            last_activity: Utc::now(),
        }
    }
}

impl WorkflowState {
    /// Fresh state positioned at the given phase.
    pub fn at_phase(phase: WorkflowPhase) -> Self {
        Self {
            phase,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_display() {
        assert_eq!(WorkflowPhase::Idle.to_string(), "idle");
        assert_eq!(WorkflowPhase::Specify.to_string(), "specify");
        assert_eq!(WorkflowPhase::Accept.to_string(), "accept");
    }

    #[test]
    fn test_phase_from_str() {
        assert_eq!(
            "execute".parse::<WorkflowPhase>().unwrap(),
            WorkflowPhase::Execute
        );
        assert_eq!(
            "PLAN".parse::<WorkflowPhase>().unwrap(),
            WorkflowPhase::Plan
        );
    }

    #[test]
    fn test_phase_from_str_invalid() {
        let result = "review".parse::<WorkflowPhase>();
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Invalid workflow phase")
        );
    }

    #[test]
    fn test_cycle_wraps_accept_to_idle() {
        assert_eq!(WorkflowPhase::Accept.next(), Some(WorkflowPhase::Idle));
    }

    #[test]
    fn test_valid_transitions_follow_the_table() {
        assert!(is_valid_transition(WorkflowPhase::Idle, WorkflowPhase::Plan));
        assert!(is_valid_transition(
            WorkflowPhase::Specify,
            WorkflowPhase::Execute
        ));
        assert!(is_valid_transition(
            WorkflowPhase::Accept,
            WorkflowPhase::Idle
        ));
    }

    #[test]
    fn test_off_table_transitions_are_invalid() {
        assert!(!is_valid_transition(
            WorkflowPhase::Idle,
            WorkflowPhase::Execute
        ));
        assert!(!is_valid_transition(
            WorkflowPhase::Execute,
            WorkflowPhase::Specify
        ));
        assert!(!is_valid_transition(WorkflowPhase::Plan, WorkflowPhase::Plan));
    }

    #[test]
    fn test_state_deserialization_with_missing_fields() {
        // Missing guard fields must default to "not satisfied".
        let json = r#"{"phase": "execute"}"#;
        let state: WorkflowState = serde_json::from_str(json).unwrap();
        assert_eq!(state.phase, WorkflowPhase::Execute);
        assert!(!state.spec_locked);
        assert!(!state.acceptance_confirmed);
        assert_eq!(state.total_waves, 0);
    }

    #[test]
    fn test_state_serialization_round_trip() {
        let mut state = WorkflowState::at_phase(WorkflowPhase::Specify);
        state.spec_locked = true;
        state.total_waves = 3;

        let json = serde_json::to_string(&state).unwrap();
        let parsed: WorkflowState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.phase, WorkflowPhase::Specify);
        assert!(parsed.spec_locked);
        assert_eq!(parsed.total_waves, 3);
    }
}
