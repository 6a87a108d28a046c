//! Forecast produced by a prediction session

use serde::{Deserialize, Serialize};

pub const DEFAULT_PREDICTION_CONFIDENCE: u8 = 50;
pub const UNKNOWN_TIMELINE: &str = "Unknown";

/// Final forecast of the speaker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionData {
    pub outcome: String,
    /// Probability in percent (0–100)
    pub confidence: u8,
    pub timeline: String,
    pub reasoning: String,
}

impl PredictionData {
    pub fn new(outcome: impl Into<String>, confidence: u8) -> Self {
        Self {
            outcome: outcome.into(),
            confidence: confidence.min(100),
            timeline: UNKNOWN_TIMELINE.to_string(),
            reasoning: String::new(),
        }
    }

    pub fn with_timeline(mut self, timeline: impl Into<String>) -> Self {
        self.timeline = timeline.into();
        self
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = reasoning.into();
        self
    }
}
