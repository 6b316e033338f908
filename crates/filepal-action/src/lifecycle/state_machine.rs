//! Action state machine with validated transitions.
//!
//! Idle -> Pending -> Completed/Discarded -> Idle

use crate::error::ActionError;
use crate::types::ActionStatus;

/// Validate that a status transition is allowed.
///
/// Valid transitions:
/// - Idle -> Pending
/// - Pending -> Completed (delay elapsed)
/// - Pending -> Discarded (timeline cleared)
/// - Completed -> Idle
/// - Discarded -> Idle
pub fn validate_transition(from: ActionStatus, to: ActionStatus) -> Result<(), ActionError> {
    let valid = matches!(
        (from, to),
        (ActionStatus::Idle, ActionStatus::Pending)
            | (ActionStatus::Pending, ActionStatus::Completed)
            | (ActionStatus::Pending, ActionStatus::Discarded)
            | (ActionStatus::Completed, ActionStatus::Idle)
            | (ActionStatus::Discarded, ActionStatus::Idle)
    );

    if valid {
        Ok(())
    } else {
        Err(ActionError::InvalidTransition(from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ActionStatus; 4] = [
        ActionStatus::Idle,
        ActionStatus::Pending,
        ActionStatus::Completed,
        ActionStatus::Discarded,
    ];

    // ---- valid ----

    #[test]
    fn test_idle_to_pending() {
        assert!(validate_transition(ActionStatus::Idle, ActionStatus::Pending).is_ok());
    }

    #[test]
    fn test_pending_to_completed() {
        assert!(validate_transition(ActionStatus::Pending, ActionStatus::Completed).is_ok());
    }

    #[test]
    fn test_pending_to_discarded() {
        assert!(validate_transition(ActionStatus::Pending, ActionStatus::Discarded).is_ok());
    }

    #[test]
    fn test_terminal_states_return_to_idle() {
        assert!(validate_transition(ActionStatus::Completed, ActionStatus::Idle).is_ok());
        assert!(validate_transition(ActionStatus::Discarded, ActionStatus::Idle).is_ok());
    }

    // ---- invalid ----

    #[test]
    fn test_pending_to_pending_invalid() {
        let err = validate_transition(ActionStatus::Pending, ActionStatus::Pending).unwrap_err();
        assert!(matches!(
            err,
            ActionError::InvalidTransition(ActionStatus::Pending, ActionStatus::Pending)
        ));
    }

    #[test]
    fn test_idle_cannot_complete_or_discard() {
        assert!(validate_transition(ActionStatus::Idle, ActionStatus::Completed).is_err());
        assert!(validate_transition(ActionStatus::Idle, ActionStatus::Discarded).is_err());
    }

    #[test]
    fn test_completed_cannot_be_discarded() {
        assert!(validate_transition(ActionStatus::Completed, ActionStatus::Discarded).is_err());
        assert!(validate_transition(ActionStatus::Discarded, ActionStatus::Completed).is_err());
    }

    #[test]
    fn test_exactly_five_transitions_are_valid() {
        let valid = ALL
            .iter()
            .flat_map(|from| ALL.iter().map(move |to| (*from, *to)))
            .filter(|(from, to)| validate_transition(*from, *to).is_ok())
            .count();
        assert_eq!(valid, 5);
    }
}
