//! Long-term store of passed motions

use council_domain::{ConsensusLabel, VoteOutcome};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
#[error("Failed to record precedent: {0}")]
pub struct PrecedentError(pub String);

/// A ruling kept for future sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Precedent {
    pub session_id: String,
    pub topic: String,
    pub outcome: VoteOutcome,
    pub consensus_score: u8,
    pub consensus_label: ConsensusLabel,
    pub ruling: String,
    /// Every participant speech of the session, ruling included
    #[serde(default)]
    pub transcript: Vec<PrecedentSpeech>,
    /// Unix milliseconds
    pub timestamp: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecedentSpeech {
    pub author: String,
    pub content: String,
}

impl From<(String, String)> for PrecedentSpeech {
    fn from((author, content): (String, String)) -> Self {
        Self { author, content }
    }
}

pub trait PrecedentStore: Send + Sync {
    fn record(&self, precedent: &Precedent) -> Result<(), PrecedentError>;
}

/// Store that keeps nothing
pub struct NoPrecedents;

impl PrecedentStore for NoPrecedents {
    fn record(&self, _precedent: &Precedent) -> Result<(), PrecedentError> {
        Ok(())
    }
}
