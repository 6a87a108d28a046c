//! Console output formatter for session results

use crate::output::formatter::OutputFormatter;
use colored::{ColoredString, Colorize};
use council_application::{Precedent, RunOutcome, RunSessionOutput};
use council_domain::{
    AuthorKind, GeneratedFile, Message, PredictionData, Roster, VoteChoice, VoteData,
};
use std::collections::HashMap;

/// Formats session results for console display
///
/// Participant names are painted in their configured colors when a roster
/// is supplied; unknown authors fall back to yellow.
#[derive(Debug, Default)]
pub struct ConsoleFormatter {
    colors: HashMap<String, String>,
}

impl ConsoleFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the roster's display colors for participant names
    pub fn with_roster(mut self, roster: &Roster) -> Self {
        for participant in roster.all() {
            self.colors
                .insert(participant.name.clone(), participant.color.clone());
        }
        self
    }

    fn author(&self, message: &Message) -> ColoredString {
        match message.author_kind {
            AuthorKind::System => message.author.dimmed(),
            AuthorKind::Human => message.author.cyan().bold(),
            AuthorKind::Participant => match self.colors.get(&message.author) {
                Some(hex) => paint(&message.author, hex).bold(),
                None => message.author.yellow().bold(),
            },
        }
    }

    fn message(&self, message: &Message) -> String {
        if message.is_system() {
            return format!("\n{}\n", Self::indent(&message.content, "  ").dimmed());
        }
        let title = match &message.role_label {
            Some(label) => format!("── {} · {} ──", self.author(message), label.dimmed()),
            None => format!("── {} ──", self.author(message)),
        };
        format!("\n{}\n{}\n", title, message.content.trim_end())
    }

    fn outcome_line(output: &RunSessionOutput) -> String {
        let status = match &output.outcome {
            RunOutcome::Completed => "Adjourned".green().bold(),
            RunOutcome::Halted => "Halted by the chair".yellow().bold(),
            RunOutcome::Failed(reason) => format!("Failed: {}", reason).red().bold(),
        };
        format!("{} {}\n", "Session:".cyan().bold(), status)
    }

    fn vote(vote: &VoteData) -> String {
        let mut output = Self::section_header("Vote");
        let outcome = if vote.outcome.is_passed() {
            vote.outcome.as_str().green().bold()
        } else {
            vote.outcome.as_str().red().bold()
        };
        output.push_str(&format!(
            "\n{} {}  {} yea / {} nay  {}\n",
            outcome,
            vote.ballot_summary(),
            vote.yeas,
            vote.nays,
            format!(
                "(weighted {:.1} / {:.1})",
                vote.weighted_yeas, vote.weighted_nays
            )
            .dimmed()
        ));
        output.push_str(&format!(
            "{} {} ({}/100), average confidence {:.1}\n",
            "Consensus:".cyan().bold(),
            vote.consensus_label,
            vote.consensus_score,
            vote.avg_confidence
        ));
        for record in &vote.votes {
            let choice = match record.choice {
                VoteChoice::Yea => record.choice.as_str().green(),
                VoteChoice::Nay => record.choice.as_str().red(),
            };
            let confidence = record
                .confidence
                .map(|c| format!(" ({:.0}/10)", c))
                .unwrap_or_default();
            output.push_str(&format!(
                "  {} {}{}: {}\n",
                paint(&record.voter, &record.color).bold(),
                choice,
                confidence,
                record.reason
            ));
        }
        output
    }

    fn prediction(prediction: &PredictionData) -> String {
        let mut output = Self::section_header("Forecast");
        output.push_str(&format!(
            "\n{} {}\n{} {}%\n",
            "Outcome:".cyan().bold(),
            prediction.outcome,
            "Confidence:".cyan().bold(),
            prediction.confidence
        ));
        if !prediction.timeline.is_empty() {
            output.push_str(&format!(
                "{} {}\n",
                "Timeline:".cyan().bold(),
                prediction.timeline
            ));
        }
        if !prediction.reasoning.is_empty() {
            output.push_str(&format!("\n{}\n", prediction.reasoning));
        }
        output
    }

    fn files(files: &[GeneratedFile], with_content: bool) -> String {
        let mut output = Self::section_header("Generated Files");
        for file in files {
            output.push_str(&format!(
                "\n{} {}\n",
                file.path.yellow().bold(),
                format!("({}, by {})", file.language, file.author).dimmed()
            ));
            if with_content {
                output.push_str(&Self::indent(&file.content, "    "));
                output.push('\n');
            }
        }
        output
    }

    fn artifacts(output: &RunSessionOutput, with_file_content: bool) -> String {
        let mut text = String::new();
        if let Some(vote) = &output.vote_data {
            text.push_str(&Self::vote(vote));
        }
        if let Some(prediction) = &output.prediction_data {
            text.push_str(&Self::prediction(prediction));
        }
        if let Some(files) = &output.generated_files
            && !files.is_empty()
        {
            text.push_str(&Self::files(files, with_file_content));
        }
        text
    }

    fn summary_section(output: &RunSessionOutput) -> String {
        if output.summary.trim().is_empty() {
            return String::new();
        }
        let mut text = Self::section_header("Summary");
        if let Some(label) = output.consensus_label {
            text.push_str(&format!("{} {}\n", "Consensus:".cyan().bold(), label));
        }
        text.push_str(&format!("\n{}\n", output.summary.trim_end()));
        text
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// The roster as a table: id, name, role, seat status and persona
    pub fn format_roster(roster: &Roster) -> String {
        let mut output = Self::section_header("Council Roster");
        for participant in roster.all() {
            let seat = if participant.enabled {
                "seated".green()
            } else {
                "-".dimmed()
            };
            let persona = participant.persona.lines().next().unwrap_or_default();
            output.push_str(&format!(
                "  {:<24} {} {:<12} {:<7} {}\n",
                participant.id,
                paint(&format!("{:<14}", participant.name), &participant.color),
                participant.role.as_str(),
                seat,
                persona.dimmed()
            ));
        }
        output
    }

    /// Recorded precedents, oldest first, one line each
    pub fn format_precedents(precedents: &[Precedent]) -> String {
        let mut output = Self::section_header("Precedents");
        if precedents.is_empty() {
            output.push_str(&format!("  {}\n", "No motion has passed yet.".dimmed()));
            return output;
        }
        for precedent in precedents {
            let date = chrono::DateTime::from_timestamp_millis(precedent.timestamp as i64)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "????-??-??".to_string());
            output.push_str(&format!(
                "  {}  {:>3} {:<13} {} {}\n",
                date.dimmed(),
                precedent.consensus_score,
                precedent.consensus_label.as_str(),
                precedent.topic.bold(),
                format!("({} speeches)", precedent.transcript.len()).dimmed()
            ));
        }
        output
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_full(&self, output: &RunSessionOutput) -> String {
        let mut text = String::new();
        text.push_str(&Self::header("Council Session"));
        text.push('\n');
        text.push_str(&Self::outcome_line(output));

        text.push_str(&Self::section_header("Transcript"));
        for message in &output.messages {
            text.push_str(&self.message(message));
        }

        text.push_str(&Self::artifacts(output, true));
        text.push_str(&Self::summary_section(output));
        text.push_str(&Self::footer());
        text
    }

    fn format_summary(&self, output: &RunSessionOutput) -> String {
        let mut text = format!("{}\n\n", "=== Council Decision ===".cyan().bold());
        text.push_str(&Self::outcome_line(output));
        text.push_str(&Self::artifacts(output, false));
        text.push_str(&Self::summary_section(output));
        text
    }

    fn format_json(&self, output: &RunSessionOutput) -> String {
        serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Paint text with a `#rrggbb` color, leaving it plain when the color is malformed
pub fn paint(text: &str, hex: &str) -> ColoredString {
    match parse_hex(hex) {
        Some((r, g, b)) => text.truecolor(r, g, b),
        None => text.normal(),
    }
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}
