//! Participant entities

use serde::{Deserialize, Serialize};

/// Default display color for participants without one, and for unmatched voters
pub const NEUTRAL_COLOR: &str = "#9ca3af";

/// Role of a participant within the council
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParticipantRole {
    /// Opens and closes sessions, tallies votes
    Speaker,
    /// Interjects to break argument loops
    Moderator,
    /// Debates and votes
    Councilor,
    /// Domain expert contributing to deliberations
    Specialist,
    /// Worker in swarm modes
    SwarmAgent,
}

impl ParticipantRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantRole::Speaker => "speaker",
            ParticipantRole::Moderator => "moderator",
            ParticipantRole::Councilor => "councilor",
            ParticipantRole::Specialist => "specialist",
            ParticipantRole::SwarmAgent => "swarm-agent",
        }
    }

    /// Councilors and specialists contribute debate turns
    pub fn is_council_member(&self) -> bool {
        matches!(self, ParticipantRole::Councilor | ParticipantRole::Specialist)
    }
}

impl std::fmt::Display for ParticipantRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ParticipantRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "speaker" => Ok(ParticipantRole::Speaker),
            "moderator" => Ok(ParticipantRole::Moderator),
            "councilor" | "councillor" => Ok(ParticipantRole::Councilor),
            "specialist" => Ok(ParticipantRole::Specialist),
            "swarm-agent" | "swarm" => Ok(ParticipantRole::SwarmAgent),
            other => Err(format!("unknown participant role: {}", other)),
        }
    }
}

/// A configured AI participant (Entity)
///
/// Static for the lifetime of a session; the orchestrator never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    /// Stable identifier (e.g. "councilor-skeptic")
    pub id: String,
    /// Display name used in transcripts and vote blocks
    pub name: String,
    pub role: ParticipantRole,
    /// Free-text persona and instructions
    pub persona: String,
    /// Model identifier understood by the model invoker
    pub model: String,
    /// Relative vote weight
    #[serde(default = "default_weight")]
    pub vote_weight: f64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Display color (UI only)
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_weight() -> f64 {
    1.0
}

fn default_enabled() -> bool {
    true
}

fn default_color() -> String {
    NEUTRAL_COLOR.to_string()
}

impl Participant {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        role: ParticipantRole,
        model: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
            persona: String::new(),
            model: model.into(),
            vote_weight: default_weight(),
            enabled: true,
            color: default_color(),
        }
    }

    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = persona.into();
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.vote_weight = weight;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Vote weight, treating non-positive or non-finite weights as 1
    pub fn effective_weight(&self) -> f64 {
        if self.vote_weight.is_finite() && self.vote_weight > 0.0 {
            self.vote_weight
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_and_display() {
        assert_eq!("speaker".parse::<ParticipantRole>(), Ok(ParticipantRole::Speaker));
        assert_eq!("swarm_agent".parse::<ParticipantRole>(), Ok(ParticipantRole::SwarmAgent));
        assert_eq!("Councillor".parse::<ParticipantRole>(), Ok(ParticipantRole::Councilor));
        assert!("jester".parse::<ParticipantRole>().is_err());
        assert_eq!(ParticipantRole::SwarmAgent.to_string(), "swarm-agent");
    }

    #[test]
    fn test_participant_builder() {
        let p = Participant::new("councilor-skeptic", "Skeptic", ParticipantRole::Councilor, "local")
            .with_persona("Challenges assumptions")
            .with_weight(2.0);
        assert_eq!(p.effective_weight(), 2.0);
        assert!(p.enabled);
        assert_eq!(p.color, NEUTRAL_COLOR);
        assert!(p.role.is_council_member());
    }

    #[test]
    fn test_effective_weight_falls_back_to_one() {
        let p = Participant::new("a", "A", ParticipantRole::Councilor, "m").with_weight(0.0);
        assert_eq!(p.effective_weight(), 1.0);
        let p = p.with_weight(f64::NAN);
        assert_eq!(p.effective_weight(), 1.0);
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{"id":"speaker","name":"Speaker","role":"speaker","persona":"","model":"m"}"#;
        let p: Participant = serde_json::from_str(json).unwrap();
        assert_eq!(p.vote_weight, 1.0);
        assert!(p.enabled);
    }
}
