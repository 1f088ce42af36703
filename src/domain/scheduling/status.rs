//! AppointmentStatus state machine.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Lifecycle status of an appointment.
///
/// Transitions are monotone toward a terminal state; `Canceled` and
/// `Completed` admit no further transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Canceled,
    Completed,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Canceled => "canceled",
            AppointmentStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(AppointmentStatus::Pending),
            "confirmed" => Some(AppointmentStatus::Confirmed),
            "canceled" => Some(AppointmentStatus::Canceled),
            "completed" => Some(AppointmentStatus::Completed),
            _ => None,
        }
    }

    /// Statuses that occupy a slot for collision purposes.
    pub fn blocks_slot(&self) -> bool {
        *self != AppointmentStatus::Canceled
    }
}

impl StateMachine for AppointmentStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use AppointmentStatus::*;
        matches!(
            (self, target),
            (Pending, Confirmed)
                | (Pending, Canceled)
                | (Pending, Completed)
                | (Confirmed, Canceled)
                | (Confirmed, Completed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use AppointmentStatus::*;
        match self {
            Pending => vec![Confirmed, Canceled, Completed],
            Confirmed => vec![Canceled, Completed],
            Canceled => vec![],
            Completed => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canceled_and_completed_are_terminal() {
        assert!(AppointmentStatus::Canceled.is_terminal());
        assert!(AppointmentStatus::Completed.is_terminal());
        assert!(!AppointmentStatus::Pending.is_terminal());
        assert!(!AppointmentStatus::Confirmed.is_terminal());
    }

    #[test]
    fn no_transition_out_of_terminal_states() {
        for target in [
            AppointmentStatus::Pending,
            AppointmentStatus::Confirmed,
            AppointmentStatus::Canceled,
            AppointmentStatus::Completed,
        ] {
            assert!(AppointmentStatus::Canceled.transition_to(target).is_err());
            assert!(AppointmentStatus::Completed.transition_to(target).is_err());
        }
    }

    #[test]
    fn pending_confirms_and_confirmed_completes() {
        assert_eq!(
            AppointmentStatus::Pending.transition_to(AppointmentStatus::Confirmed),
            Ok(AppointmentStatus::Confirmed)
        );
        assert_eq!(
            AppointmentStatus::Confirmed.transition_to(AppointmentStatus::Completed),
            Ok(AppointmentStatus::Completed)
        );
    }

    #[test]
    fn confirmed_cannot_regress_to_pending() {
        assert!(AppointmentStatus::Confirmed
            .transition_to(AppointmentStatus::Pending)
            .is_err());
    }

    #[test]
    fn only_canceled_frees_the_slot() {
        assert!(!AppointmentStatus::Canceled.blocks_slot());
        assert!(AppointmentStatus::Pending.blocks_slot());
        assert!(AppointmentStatus::Confirmed.blocks_slot());
        assert!(AppointmentStatus::Completed.blocks_slot());
    }

    #[test]
    fn status_round_trips_through_strings() {
        for s in [
            AppointmentStatus::Pending,
            AppointmentStatus::Confirmed,
            AppointmentStatus::Canceled,
            AppointmentStatus::Completed,
        ] {
            assert_eq!(AppointmentStatus::parse(s.as_str()), Some(s));
        }
    }
}
