//! Weighted votes and the consensus tally
//!
//! The tally turns individual [`VoteRecord`]s into [`VoteData`]:
//! raw and weighted counts, a 0–100 consensus score blending unanimity with
//! stated confidence, and the motion outcome.

use serde::{Deserialize, Serialize};

/// Consensus score below which a split council must reconcile
pub const RECONCILIATION_SCORE: u8 = 40;
/// Total weight above which a low-consensus vote is overridden
pub const RECONCILIATION_MIN_WEIGHT: f64 = 2.0;

/// A single ballot choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VoteChoice {
    Yea,
    Nay,
}

impl VoteChoice {
    /// Parse the first word of a ballot (`YEA`, `AYE`, `YES`, `FOR` / `NAY`, `NO`, `AGAINST`)
    pub fn parse(raw: &str) -> Option<Self> {
        let word: String = raw
            .trim()
            .chars()
            .skip_while(|c| !c.is_ascii_alphabetic())
            .take_while(|c| c.is_ascii_alphabetic())
            .collect();
        match word.to_ascii_uppercase().as_str() {
            "YEA" | "AYE" | "YES" | "FOR" => Some(VoteChoice::Yea),
            "NAY" | "NO" | "AGAINST" => Some(VoteChoice::Nay),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VoteChoice::Yea => "YEA",
            VoteChoice::Nay => "NAY",
        }
    }
}

impl std::fmt::Display for VoteChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One participant's recorded vote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub voter: String,
    pub choice: VoteChoice,
    /// Stated confidence on a 0–10 scale, if one could be read
    pub confidence: Option<f64>,
    pub reason: String,
    pub weight: f64,
    pub color: String,
}

/// Qualitative band of the consensus score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsensusLabel {
    Unanimous,
    #[serde(rename = "Strong Consensus")]
    StrongConsensus,
    Contentious,
    Divided,
}

impl ConsensusLabel {
    pub fn from_score(score: u8) -> Self {
        match score {
            s if s > 85 => ConsensusLabel::Unanimous,
            s if s > 65 => ConsensusLabel::StrongConsensus,
            s if s > 40 => ConsensusLabel::Contentious,
            _ => ConsensusLabel::Divided,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConsensusLabel::Unanimous => "Unanimous",
            ConsensusLabel::StrongConsensus => "Strong Consensus",
            ConsensusLabel::Contentious => "Contentious",
            ConsensusLabel::Divided => "Divided",
        }
    }
}

impl std::fmt::Display for ConsensusLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of the motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteOutcome {
    Passed,
    Rejected,
    ReconciliationNeeded,
}

impl VoteOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, VoteOutcome::Passed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VoteOutcome::Passed => "PASSED",
            VoteOutcome::Rejected => "REJECTED",
            VoteOutcome::ReconciliationNeeded => "RECONCILIATION NEEDED",
        }
    }
}

impl std::fmt::Display for VoteOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Aggregated vote of a proposal session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteData {
    pub topic: String,
    pub yeas: usize,
    pub nays: usize,
    pub weighted_yeas: f64,
    pub weighted_nays: f64,
    pub total_weight: f64,
    /// Mean of the confidences that could be read (0–10)
    pub avg_confidence: f64,
    pub consensus_score: u8,
    pub consensus_label: ConsensusLabel,
    pub outcome: VoteOutcome,
    pub votes: Vec<VoteRecord>,
}

impl VoteData {
    /// Tally a set of votes.
    ///
    /// `unanimity = |wYea - wNay| / (wYea + wNay)` and
    /// `score = round((unanimity * 0.7 + avgConfidence / 10 * 0.3) * 100)`.
    /// Weighted ties are rejected.
    pub fn tally(topic: impl Into<String>, votes: Vec<VoteRecord>) -> Self {
        let mut yeas = 0;
        let mut nays = 0;
        let mut weighted_yeas = 0.0;
        let mut weighted_nays = 0.0;
        let mut confidence_sum = 0.0;
        let mut confidence_count = 0usize;

        for vote in &votes {
            match vote.choice {
                VoteChoice::Yea => {
                    yeas += 1;
                    weighted_yeas += vote.weight;
                }
                VoteChoice::Nay => {
                    nays += 1;
                    weighted_nays += vote.weight;
                }
            }
            if let Some(confidence) = vote.confidence {
                confidence_sum += confidence;
                confidence_count += 1;
            }
        }

        let total_weight = weighted_yeas + weighted_nays;
        let unanimity = if total_weight > 0.0 {
            (weighted_yeas - weighted_nays).abs() / total_weight
        } else {
            0.0
        };
        let avg_confidence = if confidence_count > 0 {
            confidence_sum / confidence_count as f64
        } else {
            0.0
        };

        let consensus_score = ((unanimity * 0.7 + (avg_confidence / 10.0) * 0.3) * 100.0)
            .round()
            .clamp(0.0, 100.0) as u8;
        let consensus_label = ConsensusLabel::from_score(consensus_score);

        let outcome = if consensus_score < RECONCILIATION_SCORE
            && total_weight > RECONCILIATION_MIN_WEIGHT
        {
            VoteOutcome::ReconciliationNeeded
        } else if weighted_yeas > weighted_nays {
            VoteOutcome::Passed
        } else {
            VoteOutcome::Rejected
        };

        Self {
            topic: topic.into(),
            yeas,
            nays,
            weighted_yeas,
            weighted_nays,
            total_weight,
            avg_confidence,
            consensus_score,
            consensus_label,
            outcome,
            votes,
        }
    }

    /// Visual ballot summary (e.g. "[●●○]")
    pub fn ballot_summary(&self) -> String {
        let mut summary = String::from("[");
        for vote in &self.votes {
            summary.push(match vote.choice {
                VoteChoice::Yea => '●',
                VoteChoice::Nay => '○',
            });
        }
        summary.push(']');
        summary
    }
}
