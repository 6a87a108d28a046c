//! Session state machine.
//!
//! ```text
//! Idle → Opening → Debating → (Reconciling) → Voting → Resolving → Adjourned
//!                     ⇅
//!                   Paused
//! ```
//!
//! Statuses only move forward along the main sequence (phases may be
//! skipped). `Paused` is an overlay that can only be entered from
//! `Debating` and only left back to `Debating` (or to `Adjourned` when the
//! session is stopped while paused). `Adjourned` is terminal.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Idle,
    Opening,
    Debating,
    /// Research mode only
    Reconciling,
    Voting,
    Resolving,
    Adjourned,
    /// Overlay toggled by pause requests
    Paused,
}

/// Observable effect of applying a status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    /// The status moved
    Changed {
        from: SessionStatus,
        to: SessionStatus,
    },
    /// Same status set again; only the timestamp moves
    Unchanged,
}

impl StatusChange {
    pub fn is_changed(&self) -> bool {
        matches!(self, StatusChange::Changed { .. })
    }
}

impl SessionStatus {
    /// Position along the main sequence; `None` for the Paused overlay
    fn rank(self) -> Option<u8> {
        match self {
            SessionStatus::Idle => Some(0),
            SessionStatus::Opening => Some(1),
            SessionStatus::Debating => Some(2),
            SessionStatus::Reconciling => Some(3),
            SessionStatus::Voting => Some(4),
            SessionStatus::Resolving => Some(5),
            SessionStatus::Adjourned => Some(6),
            SessionStatus::Paused => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == SessionStatus::Adjourned
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Opening => "opening",
            SessionStatus::Debating => "debating",
            SessionStatus::Reconciling => "reconciling",
            SessionStatus::Voting => "voting",
            SessionStatus::Resolving => "resolving",
            SessionStatus::Adjourned => "adjourned",
            SessionStatus::Paused => "paused",
        }
    }

    /// Validate a transition from `self` to `next`
    pub fn transition(self, next: SessionStatus) -> Result<StatusChange, DomainError> {
        if self == next {
            return Ok(StatusChange::Unchanged);
        }
        let illegal = DomainError::InvalidTransition {
            from: self,
            to: next,
        };
        if self.is_terminal() {
            return Err(DomainError::SessionAdjourned);
        }
        let allowed = match (self, next) {
            (SessionStatus::Debating, SessionStatus::Paused) => true,
            (_, SessionStatus::Paused) => false,
            (SessionStatus::Paused, SessionStatus::Debating | SessionStatus::Adjourned) => true,
            (SessionStatus::Paused, _) => false,
            (from, to) => match (from.rank(), to.rank()) {
                (Some(a), Some(b)) => b > a,
                _ => false,
            },
        };
        if allowed {
            Ok(StatusChange::Changed {
                from: self,
                to: next,
            })
        } else {
            Err(illegal)
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SessionStatus::Idle => "Idle",
            SessionStatus::Opening => "Opening",
            SessionStatus::Debating => "Debating",
            SessionStatus::Reconciling => "Reconciling",
            SessionStatus::Voting => "Voting",
            SessionStatus::Resolving => "Resolving",
            SessionStatus::Adjourned => "Adjourned",
            SessionStatus::Paused => "Paused",
        };
        write!(f, "{}", label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SessionStatus::*;

    #[test]
    fn test_forward_transitions() {
        assert!(Idle.transition(Opening).unwrap().is_changed());
        assert!(Opening.transition(Debating).unwrap().is_changed());
        // Reconciling may be skipped
        assert!(Debating.transition(Voting).unwrap().is_changed());
        assert!(Resolving.transition(Adjourned).unwrap().is_changed());
        assert!(Idle.transition(Adjourned).unwrap().is_changed());
    }

    #[test]
    fn test_backward_transition_rejected() {
        assert_eq!(
            Voting.transition(Debating),
            Err(DomainError::InvalidTransition {
                from: Voting,
                to: Debating
            })
        );
    }

    #[test]
    fn test_same_status_is_unchanged() {
        assert_eq!(Debating.transition(Debating), Ok(StatusChange::Unchanged));
        assert_eq!(Adjourned.transition(Adjourned), Ok(StatusChange::Unchanged));
    }

    #[test]
    fn test_adjourned_is_terminal() {
        assert_eq!(Adjourned.transition(Resolving), Err(DomainError::SessionAdjourned));
        assert!(Adjourned.is_terminal());
    }

    #[test]
    fn test_pause_overlay_only_adjacent_to_debating() {
        assert!(Debating.transition(Paused).is_ok());
        assert!(Paused.transition(Debating).is_ok());
        assert!(Paused.transition(Adjourned).is_ok());
        assert!(Opening.transition(Paused).is_err());
        assert!(Voting.transition(Paused).is_err());
        assert!(Paused.transition(Voting).is_err());
    }
}
