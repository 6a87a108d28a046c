//! Progress notification port
//!
//! Defines the interface for reporting progress while a session runs.

use council_domain::{Participant, SessionMode, SessionStatus};

/// Callback for progress updates during a session
///
/// Implementations live in the presentation layer. Turns of one batch run
/// concurrently, so callbacks may interleave across participants.
pub trait ProgressNotifier: Send + Sync {
    fn on_session_start(&self, _session_id: &str, _mode: SessionMode) {}

    fn on_status_change(&self, status: SessionStatus);

    fn on_turn_start(&self, participant: &Participant, role_label: &str);

    fn on_turn_complete(&self, participant: &Participant, role_label: &str, success: bool);

    /// Called for each streamed fragment of a visible turn
    fn on_turn_chunk(&self, _participant: &Participant, _chunk: &str) {}

    fn on_session_end(&self, _summary: &str) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_status_change(&self, _status: SessionStatus) {}
    fn on_turn_start(&self, _participant: &Participant, _role_label: &str) {}
    fn on_turn_complete(&self, _participant: &Participant, _role_label: &str, _success: bool) {}
}
