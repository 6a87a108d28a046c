//! Domain error types

use crate::session::status::SessionStatus;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("No enabled speaker in the council roster")]
    NoSpeaker,

    #[error("No enabled council members to deliberate")]
    NoCouncilMembers,

    #[error("Invalid topic: {0}")]
    InvalidTopic(String),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Illegal status transition: {from} -> {to}")]
    InvalidTransition {
        from: SessionStatus,
        to: SessionStatus,
    },

    #[error("Session is adjourned")]
    SessionAdjourned,

    #[error("Message not found: {0}")]
    MessageNotFound(String),

    #[error("{0} already recorded for this session")]
    AlreadyRecorded(&'static str),
}

impl DomainError {
    /// Check if this error is raised because the session already reached its terminal state
    pub fn is_adjourned(&self) -> bool {
        matches!(self, DomainError::SessionAdjourned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_error_display() {
        let error = DomainError::InvalidTransition {
            from: SessionStatus::Voting,
            to: SessionStatus::Opening,
        };
        assert_eq!(error.to_string(), "Illegal status transition: Voting -> Opening");
    }

    #[test]
    fn test_is_adjourned_check() {
        assert!(DomainError::SessionAdjourned.is_adjourned());
        assert!(!DomainError::NoSpeaker.is_adjourned());
        assert!(!DomainError::AlreadyRecorded("Vote data").is_adjourned());
    }
}
