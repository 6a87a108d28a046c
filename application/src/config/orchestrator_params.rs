//! Orchestrator parameters: pipeline pacing and prompt sizing.
//!
//! These are application-layer concerns, not domain policy: the participant
//! roster and mode live in `CouncilSettings`, while [`OrchestratorParams`]
//! controls how the orchestrator drives any session.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorParams {
    /// Pause between batch chunks (provider rate-limit courtesy)
    pub batch_delay: Duration,
    /// Number of recent session messages sent as chat history
    pub history_window: usize,
    /// Output token allowance added to every admission estimate
    pub max_output_tokens: u64,
    /// Seed for the debate reshuffle; entropy when unset
    pub seed: Option<u64>,
    /// Characters of the closing message kept in the summary
    pub summary_chars: usize,
}

impl Default for OrchestratorParams {
    fn default() -> Self {
        Self {
            batch_delay: Duration::from_millis(500),
            history_window: 12,
            max_output_tokens: 500,
            seed: None,
            summary_chars: 400,
        }
    }
}

impl OrchestratorParams {
    // ==================== Builder Methods ====================

    pub fn with_batch_delay(mut self, delay: Duration) -> Self {
        self.batch_delay = delay;
        self
    }

    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    pub fn with_max_output_tokens(mut self, tokens: u64) -> Self {
        self.max_output_tokens = tokens;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Estimated tokens of a call: prompt characters / 4 plus the output allowance
    pub fn estimate_tokens(&self, prompt_chars: usize) -> u64 {
        (prompt_chars / 4) as u64 + self.max_output_tokens
    }
}
