//! Guard predicates for automatic phase transitions.
//!
//! Pure functions over [`WorkflowState`] — no store access, no side
//! effects. The auto-progression monitor calls these after every action
//! and acts on the first guard that holds.

use super::{WorkflowPhase, WorkflowState};

/// Result of evaluating all automatic-transition guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GuardCheck {
    /// specify → execute: spec locked and the execution plan exists.
    pub can_advance_specify_to_execute: bool,
    /// execute → accept: waves are defined and all of them are done.
    pub can_advance_execute_to_accept: bool,
    /// accept → idle: the user confirmed acceptance.
    pub can_advance_accept_to_idle: bool,
}

impl GuardCheck {
    /// Whether any automatic transition may fire.
    pub fn any(&self) -> bool {
        self.can_advance_specify_to_execute
            || self.can_advance_execute_to_accept
            || self.can_advance_accept_to_idle
    }
}

/// Evaluate the automatic-transition guards for the current state.
///
/// Each guard also requires being *in* the source phase, so at most one
/// guard can hold for any given state.
pub fn check_guards(state: &WorkflowState, plan_exists: bool) -> GuardCheck {
    GuardCheck {
        can_advance_specify_to_execute: state.phase == WorkflowPhase::Specify
            && state.spec_locked
            && plan_exists,
        // total_waves == 0 means no waves were defined; that never counts
        // as "all waves complete".
        can_advance_execute_to_accept: state.phase == WorkflowPhase::Execute
            && state.total_waves > 0
            && state.current_wave >= state.total_waves,
        can_advance_accept_to_idle: state.phase == WorkflowPhase::Accept
            && state.acceptance_confirmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_at(phase: WorkflowPhase) -> WorkflowState {
        WorkflowState::at_phase(phase)
    }

    #[test]
    fn test_specify_guard_requires_lock_and_plan() {
        let mut state = state_at(WorkflowPhase::Specify);
        assert!(!check_guards(&state, true).can_advance_specify_to_execute);

        state.spec_locked = true;
        assert!(!check_guards(&state, false).can_advance_specify_to_execute);
        assert!(check_guards(&state, true).can_advance_specify_to_execute);
    }

    #[test]
    fn test_specify_guard_requires_specify_phase() {
        let mut state = state_at(WorkflowPhase::Research);
        state.spec_locked = true;
        assert!(!check_guards(&state, true).can_advance_specify_to_execute);
    }

    #[test]
    fn test_execute_guard_requires_all_waves_complete() {
        let mut state = state_at(WorkflowPhase::Execute);
        state.total_waves = 3;

        state.current_wave = 2;
        assert!(!check_guards(&state, false).can_advance_execute_to_accept);

        state.current_wave = 3;
        assert!(check_guards(&state, false).can_advance_execute_to_accept);
    }

    #[test]
    fn test_execute_guard_zero_waves_never_fires() {
        let mut state = state_at(WorkflowPhase::Execute);
        state.total_waves = 0;
        state.current_wave = 0;
        assert!(!check_guards(&state, true).can_advance_execute_to_accept);
    }

    #[test]
    fn test_accept_guard_requires_confirmation() {
        let mut state = state_at(WorkflowPhase::Accept);
        assert!(!check_guards(&state, false).can_advance_accept_to_idle);

        state.acceptance_confirmed = true;
        assert!(check_guards(&state, false).can_advance_accept_to_idle);
    }

    #[test]
    fn test_at_most_one_guard_holds() {
        // A state satisfying one guard's field conditions is still gated
        // by its phase, so guards are mutually exclusive.
        let mut state = state_at(WorkflowPhase::Specify);
        state.spec_locked = true;
        state.acceptance_confirmed = true;
        state.total_waves = 1;
        state.current_wave = 1;

        let check = check_guards(&state, true);
        assert!(check.can_advance_specify_to_execute);
        assert!(!check.can_advance_execute_to_accept);
        assert!(!check.can_advance_accept_to_idle);
    }

    #[test]
    fn test_any_reports_no_guard() {
        let state = state_at(WorkflowPhase::Plan);
        assert!(!check_guards(&state, true).any());
    }
}
