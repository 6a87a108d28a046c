//! Council configuration from TOML (`[council]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [council]
//! max_concurrency = 2
//! economy = false
//! batch_delay_ms = 500
//! history_window = 12
//! seed = 42
//!
//! [[council.participants]]
//! id = "councilor-historian"
//! enabled = true
//!
//! [[council.participants]]
//! id = "councilor-economist"
//! name = "Economist"
//! role = "councilor"
//! persona = "You weigh incentives and market effects."
//! vote_weight = 1.5
//! ```

use council_application::OrchestratorParams;
use council_domain::{
    ConfigIssue, ConfigIssueCode, Participant, ParticipantRole, Roster, default_roster,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// Council pacing and roster overrides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCouncilConfig {
    /// Maximum concurrent turns per batch chunk
    pub max_concurrency: usize,
    /// Default for proposal sessions: one simulated debate call
    pub economy: bool,
    /// Pause between batch chunks
    pub batch_delay_ms: u64,
    /// Recent messages sent to each participant as history
    pub history_window: usize,
    /// Fixed seed for the debate reshuffle
    pub seed: Option<u64>,
    /// Overrides of catalog personas, or new participants
    pub participants: Vec<FileParticipantConfig>,
}

impl Default for FileCouncilConfig {
    fn default() -> Self {
        let params = OrchestratorParams::default();
        Self {
            max_concurrency: 2,
            economy: false,
            batch_delay_ms: params.batch_delay.as_millis() as u64,
            history_window: params.history_window,
            seed: None,
            participants: Vec::new(),
        }
    }
}

/// One `[[council.participants]]` entry
///
/// Entries whose id matches a catalog persona patch it field by field;
/// other entries add a participant and must name a role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileParticipantConfig {
    pub id: String,
    pub name: Option<String>,
    pub role: Option<String>,
    pub persona: Option<String>,
    pub model: Option<String>,
    pub vote_weight: Option<f64>,
    pub enabled: Option<bool>,
    pub color: Option<String>,
}

impl FileParticipantConfig {
    fn apply(&self, participant: &mut Participant) {
        if let Some(name) = &self.name {
            participant.name = name.clone();
        }
        if let Some(role) = self.role.as_deref().and_then(|r| r.parse().ok()) {
            participant.role = role;
        }
        if let Some(persona) = &self.persona {
            participant.persona = persona.clone();
        }
        if let Some(model) = &self.model {
            participant.model = model.clone();
        }
        if let Some(weight) = self.vote_weight {
            participant.vote_weight = weight;
        }
        if let Some(enabled) = self.enabled {
            participant.enabled = enabled;
        }
        if let Some(color) = &self.color {
            participant.color = color.clone();
        }
    }
}

impl FileCouncilConfig {
    /// Build the roster: the persona catalog with every override applied.
    ///
    /// Returns the roster plus issues for entries that could not be applied.
    pub fn roster(&self, default_model: &str) -> (Roster, Vec<ConfigIssue>) {
        let mut roster = default_roster(default_model);
        let mut issues = Vec::new();

        for entry in &self.participants {
            if entry.id.trim().is_empty() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::DuplicateParticipant,
                    "council.participants: entry without an id",
                ));
                continue;
            }
            if let Some(role) = &entry.role
                && role.parse::<ParticipantRole>().is_err()
            {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::UnknownRole,
                    format!(
                        "council.participants '{}': unknown role '{}'",
                        entry.id, role
                    ),
                ));
                continue;
            }

            let mut participant = match roster.by_id(&entry.id) {
                Some(existing) => existing.clone(),
                None => {
                    let Some(role) = entry.role.as_deref().and_then(|r| r.parse().ok()) else {
                        issues.push(ConfigIssue::error(
                            ConfigIssueCode::UnknownRole,
                            format!(
                                "council.participants '{}': new participants need a role",
                                entry.id
                            ),
                        ));
                        continue;
                    };
                    let name = entry.name.clone().unwrap_or_else(|| entry.id.clone());
                    Participant::new(&entry.id, name, role, default_model)
                }
            };
            entry.apply(&mut participant);
            roster.upsert(participant);
        }

        (roster, issues)
    }

    /// Issues found in the `[council]` section itself
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.max_concurrency == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroConcurrency,
                "council.max_concurrency is 0, treating it as 1",
            ));
        }

        let mut seen = HashSet::new();
        for entry in &self.participants {
            if !entry.id.is_empty() && !seen.insert(entry.id.as_str()) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::DuplicateParticipant,
                    format!("council.participants: duplicate id '{}'", entry.id),
                ));
            }
            if let Some(weight) = entry.vote_weight
                && !(weight.is_finite() && weight > 0.0)
            {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::InvalidVoteWeight,
                    format!(
                        "council.participants '{}': vote_weight {} is not positive, treating it as 1",
                        entry.id, weight
                    ),
                ));
            }
        }

        issues
    }

    /// Orchestrator pacing derived from this section
    pub fn orchestrator_params(&self, max_output_tokens: u64) -> OrchestratorParams {
        OrchestratorParams::default()
            .with_batch_delay(Duration::from_millis(self.batch_delay_ms))
            .with_history_window(self.history_window.max(1))
            .with_max_output_tokens(max_output_tokens)
            .with_seed(self.seed)
    }
}
