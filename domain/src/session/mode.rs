//! Session modes and per-mode settings.

use crate::participant::roster::Roster;
use serde::{Deserialize, Serialize};

/// Pipeline kind selected for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionMode {
    /// Legislative debate with a weighted vote
    Proposal,
    /// Open roundtable discussion
    Deliberation,
    /// Direct Q&A with councilors
    Inquiry,
    /// Deep research with gap analysis
    Research,
    /// Parallel task execution
    Swarm,
    /// Multi-agent code generation
    SwarmCoding,
    /// Probabilistic forecasting
    Prediction,
    /// Personal counsel on the user's question
    Advisory,
}

impl SessionMode {
    pub const ALL: [SessionMode; 8] = [
        SessionMode::Proposal,
        SessionMode::Deliberation,
        SessionMode::Inquiry,
        SessionMode::Research,
        SessionMode::Swarm,
        SessionMode::SwarmCoding,
        SessionMode::Prediction,
        SessionMode::Advisory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionMode::Proposal => "proposal",
            SessionMode::Deliberation => "deliberation",
            SessionMode::Inquiry => "inquiry",
            SessionMode::Research => "research",
            SessionMode::Swarm => "swarm",
            SessionMode::SwarmCoding => "swarm-coding",
            SessionMode::Prediction => "prediction",
            SessionMode::Advisory => "advisory",
        }
    }

    /// Default settings for this mode
    pub fn default_settings(&self) -> ModeSettings {
        match self {
            SessionMode::Proposal => ModeSettings::Proposal { economy: false },
            SessionMode::Deliberation => ModeSettings::Deliberation { rounds: 2 },
            SessionMode::Inquiry => ModeSettings::Inquiry { addressed_to: None },
            SessionMode::Research => ModeSettings::Research { follow_up: true },
            SessionMode::Swarm => ModeSettings::Swarm,
            SessionMode::SwarmCoding => ModeSettings::SwarmCoding { language: None },
            SessionMode::Prediction => ModeSettings::Prediction,
            SessionMode::Advisory => ModeSettings::Advisory,
        }
    }
}

impl std::fmt::Display for SessionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SessionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "proposal" | "legislative" => Ok(SessionMode::Proposal),
            "deliberation" => Ok(SessionMode::Deliberation),
            "inquiry" => Ok(SessionMode::Inquiry),
            "research" => Ok(SessionMode::Research),
            "swarm" => Ok(SessionMode::Swarm),
            "swarm-coding" | "swarm_coding" => Ok(SessionMode::SwarmCoding),
            "prediction" => Ok(SessionMode::Prediction),
            "advisory" => Ok(SessionMode::Advisory),
            other => Err(format!(
                "unknown session mode '{}' (expected one of: {})",
                other,
                SessionMode::ALL
                    .iter()
                    .map(|m| m.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

/// Mode-specific settings: each variant carries exactly what its pipeline consumes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum ModeSettings {
    Proposal {
        /// Single-call simulated debate instead of one call per councilor
        economy: bool,
    },
    Deliberation {
        rounds: usize,
    },
    Inquiry {
        /// Address a single councilor by name instead of the whole council
        addressed_to: Option<String>,
    },
    Research {
        /// Run the gap-filling round while reconciling
        follow_up: bool,
    },
    Swarm,
    SwarmCoding {
        language: Option<String>,
    },
    Prediction,
    Advisory,
}

impl ModeSettings {
    pub fn mode(&self) -> SessionMode {
        match self {
            ModeSettings::Proposal { .. } => SessionMode::Proposal,
            ModeSettings::Deliberation { .. } => SessionMode::Deliberation,
            ModeSettings::Inquiry { .. } => SessionMode::Inquiry,
            ModeSettings::Research { .. } => SessionMode::Research,
            ModeSettings::Swarm => SessionMode::Swarm,
            ModeSettings::SwarmCoding { .. } => SessionMode::SwarmCoding,
            ModeSettings::Prediction => SessionMode::Prediction,
            ModeSettings::Advisory => SessionMode::Advisory,
        }
    }
}

/// Settings snapshot loaded once into a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouncilSettings {
    pub participants: Roster,
    /// Maximum concurrent turns per batch chunk
    pub max_concurrency: usize,
    pub mode: ModeSettings,
}

impl CouncilSettings {
    pub fn new(participants: impl Into<Roster>, mode: ModeSettings) -> Self {
        Self {
            participants: participants.into(),
            max_concurrency: 2,
            mode,
        }
    }

    pub fn with_max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = max.max(1);
        self
    }

    pub fn session_mode(&self) -> SessionMode {
        self.mode.mode()
    }
}
