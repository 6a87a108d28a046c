//! Session store port
//!
//! All operations are synchronous against the in-memory record; adapters
//! persist asynchronously (debounced) as a side effect.

use council_domain::{
    DomainError, GeneratedFile, Message, MessagePatch, PredictionData, Session, SessionStatus,
    StatusChange, VoteData,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Session already exists: {0}")]
    AlreadyExists(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

pub trait SessionStore: Send + Sync {
    fn create_session(&self, session: Session) -> Result<(), StoreError>;

    /// Snapshot of a session
    fn get_session(&self, session_id: &str) -> Option<Session>;

    /// Append a message, returning its id
    fn add_message(&self, session_id: &str, message: Message) -> Result<String, StoreError>;

    fn update_message(
        &self,
        session_id: &str,
        message_id: &str,
        patch: MessagePatch,
    ) -> Result<(), StoreError>;

    /// Set the status. Repeating the current status is observationally a no-op.
    fn update_status(
        &self,
        session_id: &str,
        status: SessionStatus,
    ) -> Result<StatusChange, StoreError>;

    fn set_vote_data(&self, session_id: &str, data: VoteData) -> Result<(), StoreError>;

    fn set_prediction_data(&self, session_id: &str, data: PredictionData)
    -> Result<(), StoreError>;

    fn add_generated_files(
        &self,
        session_id: &str,
        files: Vec<GeneratedFile>,
    ) -> Result<(), StoreError>;
}
