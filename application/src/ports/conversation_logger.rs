//! Session record port
//!
//! Every turn, status change, tally, prediction and adjournment can be
//! appended to a machine-readable record (one JSON object per line in the
//! file-backed adapter). Diagnostics stay on `tracing`.

use serde_json::Value;

/// One entry in the session record
pub struct ConversationEvent {
    /// `turn_complete`, `status_change`, `vote_tally`, ...
    pub event_type: &'static str,
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Sink for the session record. Write failures are the adapter's problem;
/// they never reach the orchestrator.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// Used when no record file is configured
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
