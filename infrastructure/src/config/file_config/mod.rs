//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod budget;
mod council;
mod output;
mod provider;
mod storage;

pub use budget::FileBudgetConfig;
pub use council::{FileCouncilConfig, FileParticipantConfig};
pub use output::FileOutputConfig;
pub use provider::{DEFAULT_BASE_URL, DEFAULT_MODEL, FileProviderConfig};
pub use storage::FileStorageConfig;

use council_domain::{ConfigIssue, ConfigIssueCode, ParticipantRole, Roster};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// OpenAI-compatible endpoint
    pub provider: FileProviderConfig,
    /// Pacing and roster overrides
    pub council: FileCouncilConfig,
    /// Per-session admission limits
    pub budget: FileBudgetConfig,
    /// Snapshots, precedents and transcript logs
    pub storage: FileStorageConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// The roster this configuration produces
    pub fn roster(&self) -> (Roster, Vec<ConfigIssue>) {
        self.council.roster(&self.provider.model)
    }

    /// Validate the entire configuration, returning all detected issues.
    ///
    /// This is the single entry point for config validation. It checks:
    /// 1. The `[council]` section (concurrency, duplicate ids, vote weights)
    /// 2. Participant overrides that could not be applied
    /// 3. Speaker presence in the resulting roster
    /// 4. Batch concurrency against the concurrent-call ceiling
    /// 5. The output format name
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.council.validate();
        issues.extend(self.concurrency_issue(self.council.max_concurrency));

        let (roster, roster_issues) = self.roster();
        issues.extend(roster_issues);

        let speakers = roster
            .enabled()
            .filter(|p| p.role == ParticipantRole::Speaker)
            .count();
        match speakers {
            0 => issues.push(ConfigIssue::error(
                ConfigIssueCode::MissingSpeaker,
                "No enabled participant has the speaker role",
            )),
            1 => {}
            n => issues.push(ConfigIssue::warning(
                ConfigIssueCode::MultipleSpeakers,
                format!("{} enabled speakers, only the first one presides", n),
            )),
        }

        if let Some(format) = &self.output.format
            && let Err(message) = format.parse::<council_domain::OutputFormat>()
        {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::UnknownOutputFormat,
                format!("output.format: {}, falling back to 'summary'", message),
            ));
        }

        issues
    }

    /// Councilors batched beyond `budget.max_concurrent_calls` are denied
    /// their turn, so a larger concurrency only produces denial notices.
    pub fn concurrency_issue(&self, concurrency: usize) -> Option<ConfigIssue> {
        let ceiling = self.budget.max_concurrent_calls;
        (concurrency > ceiling).then(|| {
            ConfigIssue::warning(
                ConfigIssueCode::ConcurrencyAboveCallLimit,
                format!(
                    "concurrency {} exceeds budget.max_concurrent_calls {}; \
                     the extra councilors in each batch will be denied",
                    concurrency, ceiling
                ),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::OutputFormat;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[provider]
base_url = "http://127.0.0.1:8080/v1"
model = "llama-3.1-8b-instruct"

[council]
max_concurrency = 3
economy = true
seed = 42

[[council.participants]]
id = "councilor-visionary"
enabled = true

[budget]
max_concurrent_calls = 3
max_session_tokens = 20000

[storage]
persist = false

[output]
format = "full"
color = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.provider.base_url, "http://127.0.0.1:8080/v1");
        assert_eq!(config.council.max_concurrency, 3);
        assert!(config.council.economy);
        assert_eq!(config.council.seed, Some(42));
        assert_eq!(config.council.participants.len(), 1);
        assert_eq!(config.budget.max_concurrent_calls, 3);
        assert_eq!(config.budget.max_session_tokens, Some(20000));
        assert!(!config.storage.persist);
        assert_eq!(config.output.parse_format(), Some(OutputFormat::Full));
        assert!(!config.output.color);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[council]
history_window = 4
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.council.history_window, 4);
        // Defaults should apply
        assert_eq!(config.council.max_concurrency, 2);
        assert_eq!(config.provider, FileProviderConfig::default());
        assert!(config.output.color);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_missing_speaker() {
        let toml_str = r#"
[[council.participants]]
id = "speaker"
enabled = false
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, ConfigIssueCode::MissingSpeaker);
        assert!(issues[0].is_error());
    }

    #[test]
    fn test_validate_second_speaker_warns() {
        let toml_str = r#"
[[council.participants]]
id = "co-speaker"
name = "Co-Speaker"
role = "speaker"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, ConfigIssueCode::MultipleSpeakers);
        assert!(!issues[0].is_error());
    }

    #[test]
    fn test_validate_concurrency_above_call_limit() {
        let toml_str = r#"
[council]
max_concurrency = 6

[budget]
max_concurrent_calls = 4
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, ConfigIssueCode::ConcurrencyAboveCallLimit);
        assert!(!issues[0].is_error());
        assert!(issues[0].message.contains("concurrency 6"));

        assert!(config.concurrency_issue(4).is_none());
        assert!(config.concurrency_issue(5).is_some());
    }

    #[test]
    fn test_validate_unknown_output_format() {
        let mut config = FileConfig::default();
        config.output.format = Some("synthesis".to_string());
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, ConfigIssueCode::UnknownOutputFormat);
        assert!(issues[0].message.contains("synthesis"));
    }
}
