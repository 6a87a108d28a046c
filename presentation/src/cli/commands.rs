//! CLI command definitions

use clap::{Parser, ValueEnum};
use council_domain::{ModeSettings, OutputFormat, SessionMode};
use std::path::PathBuf;

/// Output format for session results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    /// Full transcript plus the decision artifacts
    Full,
    /// Summary and decision artifacts only
    Summary,
    /// JSON output
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Full => OutputFormat::Full,
            OutputFormatArg::Summary => OutputFormat::Summary,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

fn parse_mode(s: &str) -> Result<SessionMode, String> {
    s.parse()
}

/// CLI arguments for council-chamber
#[derive(Parser, Debug)]
#[command(name = "council-chamber")]
#[command(author, version, about = "AI Council - a roster of AI participants deliberates on your topic")]
#[command(long_about = r#"
Council Chamber convenes a council of AI participants (a Speaker, a Moderator,
councilors and specialists) to deliberate on a topic.

Modes:
  proposal      Debate with challenges and rebuttals, then a weighted vote
  deliberation  Roundtable discussion, synthesized by the Speaker
  inquiry       Questions answered by the council or one addressed councilor
  research      Investigation with gap analysis and follow-up
  swarm         Task decomposition fanned out to workers
  swarm-coding  Twelve design phases plus generated source files
  prediction    Forecast with outcome, confidence and timeline
  advisory      Personal counsel on your question

Configuration files are loaded from (in priority order):
1. COUNCIL_* environment variables
2. --config <path>     Explicit config file
3. ./council.toml      Project-level config
4. ~/.config/council-chamber/config.toml   Global config

Example:
  council-chamber "Should our city ban cars from the old town?"
  council-chamber --mode prediction "Will fusion power reach the grid by 2040?"
  council-chamber --mode inquiry --address Skeptic "What could go wrong with a four-day week?"
  council-chamber --show-session 0b7e... -o full
"#)]
pub struct Cli {
    /// The topic or motion put before the council
    #[arg(required_unless_present_any = [
        "show_config",
        "list_personas",
        "check_provider",
        "show_session",
        "list_precedents",
    ])]
    pub topic: Option<String>,

    /// Session mode
    #[arg(long, value_name = "MODE", value_parser = parse_mode, default_value = "proposal")]
    pub mode: SessionMode,

    /// Background context given to every participant
    #[arg(long, value_name = "TEXT")]
    pub context: Option<String>,

    /// The petitioner's own words, when they differ from the topic
    #[arg(long, value_name = "TEXT")]
    pub prompt: Option<String>,

    /// Proposal mode: simulate the whole debate in a single call
    #[arg(long)]
    pub economy: bool,

    /// Maximum concurrent turns per batch
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Seat only these councilors (by id, can be specified multiple times)
    #[arg(long = "councilor", value_name = "ID")]
    pub councilors: Vec<String>,

    /// Deliberation mode: number of contribution rounds
    #[arg(long, value_name = "N")]
    pub rounds: Option<usize>,

    /// Inquiry mode: address a single councilor by name
    #[arg(long, value_name = "NAME")]
    pub address: Option<String>,

    /// Swarm-coding mode: target programming language
    #[arg(long, value_name = "LANG")]
    pub language: Option<String>,

    /// Research mode: skip the gap-filling round
    #[arg(long)]
    pub no_follow_up: bool,

    /// Seed for the debate reshuffle
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormatArg>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Write diagnostics to this file as well
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration sources and the effective configuration, then exit
    #[arg(long)]
    pub show_config: bool,

    /// List the persona catalog and exit
    #[arg(long)]
    pub list_personas: bool,

    /// Check that the model server answers and lists the default model, then exit
    #[arg(long)]
    pub check_provider: bool,

    /// Print a saved session (status, transcript and results) and exit
    #[arg(long, value_name = "ID", conflicts_with = "topic")]
    pub show_session: Option<String>,

    /// List the motions recorded in the precedent store and exit
    #[arg(long)]
    pub list_precedents: bool,
}

impl Cli {
    /// Settings for the selected mode; `default_economy` comes from config
    pub fn mode_settings(&self, default_economy: bool) -> ModeSettings {
        match self.mode.default_settings() {
            ModeSettings::Proposal { .. } => ModeSettings::Proposal {
                economy: self.economy || default_economy,
            },
            ModeSettings::Deliberation { rounds } => ModeSettings::Deliberation {
                rounds: self.rounds.unwrap_or(rounds).max(1),
            },
            ModeSettings::Inquiry { .. } => ModeSettings::Inquiry {
                addressed_to: self.address.clone(),
            },
            ModeSettings::Research { follow_up } => ModeSettings::Research {
                follow_up: follow_up && !self.no_follow_up,
            },
            ModeSettings::SwarmCoding { .. } => ModeSettings::SwarmCoding {
                language: self.language.clone(),
            },
            other => other,
        }
    }

    /// Tracing filter directive for the `-v`/`-q` flags
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("council-chamber").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["Ban cars downtown"]);
        assert_eq!(cli.topic.as_deref(), Some("Ban cars downtown"));
        assert_eq!(cli.mode, SessionMode::Proposal);
        assert_eq!(cli.mode_settings(false), ModeSettings::Proposal { economy: false });
        assert_eq!(cli.mode_settings(true), ModeSettings::Proposal { economy: true });
        assert!(cli.output.is_none());
        assert_eq!(cli.log_level(), "warn");
    }

    #[test]
    fn test_topic_required_unless_informational() {
        assert!(Cli::try_parse_from(["council-chamber"]).is_err());
        assert!(Cli::try_parse_from(["council-chamber", "--list-personas"]).is_ok());
        assert!(Cli::try_parse_from(["council-chamber", "--show-config"]).is_ok());
        assert!(Cli::try_parse_from(["council-chamber", "--check-provider"]).is_ok());
        assert!(Cli::try_parse_from(["council-chamber", "--list-precedents"]).is_ok());

        let cli = parse(&["--show-session", "s-42", "-o", "full"]);
        assert_eq!(cli.show_session.as_deref(), Some("s-42"));
        assert_eq!(cli.output, Some(OutputFormatArg::Full));
        assert!(
            Cli::try_parse_from(["council-chamber", "--show-session", "s-42", "Topic"]).is_err()
        );
    }

    #[test]
    fn test_mode_specific_flags() {
        let cli = parse(&["--mode", "deliberation", "--rounds", "3", "Topic"]);
        assert_eq!(cli.mode_settings(false), ModeSettings::Deliberation { rounds: 3 });

        let cli = parse(&["--mode", "inquiry", "--address", "Skeptic", "Topic"]);
        assert_eq!(
            cli.mode_settings(false),
            ModeSettings::Inquiry {
                addressed_to: Some("Skeptic".to_string())
            }
        );

        let cli = parse(&["--mode", "swarm_coding", "--language", "rust", "Topic"]);
        assert_eq!(
            cli.mode_settings(false),
            ModeSettings::SwarmCoding {
                language: Some("rust".to_string())
            }
        );

        let cli = parse(&["--mode", "research", "--no-follow-up", "Topic"]);
        assert_eq!(cli.mode_settings(false), ModeSettings::Research { follow_up: false });

        let cli = parse(&["--mode", "legislative", "Topic"]);
        assert_eq!(cli.mode, SessionMode::Proposal);
    }

    #[test]
    fn test_unknown_mode_rejected() {
        assert!(Cli::try_parse_from(["council-chamber", "--mode", "tribunal", "Topic"]).is_err());
    }

    #[test]
    fn test_repeatable_councilors_and_output() {
        let cli = parse(&[
            "--councilor",
            "councilor-visionary",
            "--councilor",
            "specialist-law",
            "-o",
            "json",
            "-vv",
            "Topic",
        ]);
        assert_eq!(cli.councilors, vec!["councilor-visionary", "specialist-law"]);
        assert_eq!(cli.output.map(OutputFormat::from), Some(OutputFormat::Json));
        assert_eq!(cli.log_level(), "debug");
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
