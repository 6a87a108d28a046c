//! Progress reporting for council sessions

use crate::output::console::paint;
use colored::Colorize;
use council_application::ProgressNotifier;
use council_domain::{Participant, SessionMode, SessionStatus};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Characters of streamed text shown after a turn's spinner
const TAIL_CHARS: usize = 60;

struct TurnBar {
    bar: ProgressBar,
    role_label: String,
    tail: String,
}

/// Reports progress during a session with a status line and one spinner per turn
pub struct ProgressReporter {
    multi: MultiProgress,
    status_bar: Mutex<Option<ProgressBar>>,
    turns: Mutex<HashMap<String, TurnBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            status_bar: Mutex::new(None),
            turns: Mutex::new(HashMap::new()),
        }
    }

    fn status_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("  {spinner:.yellow} {prefix} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// Keep the last `TAIL_CHARS` characters of streamed text on one line
    fn push_tail(tail: &mut String, chunk: &str) {
        tail.extend(chunk.chars().map(|c| if c.is_whitespace() { ' ' } else { c }));
        let count = tail.chars().count();
        if count <= TAIL_CHARS {
            return;
        }
        let cut = tail
            .char_indices()
            .nth(count - TAIL_CHARS)
            .map(|(index, _)| index)
            .unwrap_or(0);
        tail.drain(..cut);
    }

    fn ensure_status_bar(&self) -> Option<ProgressBar> {
        let mut slot = self.status_bar.lock().ok()?;
        let bar = slot.get_or_insert_with(|| {
            let bar = self.multi.add(ProgressBar::new_spinner());
            bar.set_style(Self::status_style());
            bar.set_prefix("Council");
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        });
        Some(bar.clone())
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_session_start(&self, _session_id: &str, mode: SessionMode) {
        if let Some(bar) = self.ensure_status_bar() {
            bar.set_prefix(format!("Council ({})", mode.as_str()));
            bar.set_message("convening...");
        }
    }

    fn on_status_change(&self, status: SessionStatus) {
        if let Some(bar) = self.ensure_status_bar() {
            bar.set_message(status.to_string());
        }
    }

    fn on_turn_start(&self, participant: &Participant, role_label: &str) {
        let bar = self.multi.add(ProgressBar::new_spinner());
        bar.set_style(Self::spinner_style());
        bar.set_prefix(paint(&participant.name, &participant.color).bold().to_string());
        bar.set_message(role_label.dimmed().to_string());
        bar.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut turns) = self.turns.lock()
            && let Some(previous) = turns.insert(
                participant.id.clone(),
                TurnBar {
                    bar,
                    role_label: role_label.to_string(),
                    tail: String::new(),
                },
            )
        {
            previous.bar.finish_and_clear();
        }
    }

    fn on_turn_chunk(&self, participant: &Participant, chunk: &str) {
        if let Ok(mut turns) = self.turns.lock()
            && let Some(turn) = turns.get_mut(&participant.id)
        {
            Self::push_tail(&mut turn.tail, chunk);
            turn.bar.set_message(format!(
                "{} {}",
                turn.role_label.dimmed(),
                turn.tail.trim_start()
            ));
        }
    }

    fn on_turn_complete(&self, participant: &Participant, role_label: &str, success: bool) {
        let Some(turn) = self
            .turns
            .lock()
            .ok()
            .and_then(|mut turns| turns.remove(&participant.id))
        else {
            return;
        };
        let mark = if success { "v".green() } else { "x".red() };
        turn.bar.finish_with_message(format!("{} {}", mark, role_label.dimmed()));
    }

    fn on_session_end(&self, _summary: &str) {
        if let Ok(mut turns) = self.turns.lock() {
            for (_, turn) in turns.drain() {
                turn.bar.finish_and_clear();
            }
        }
        if let Some(bar) = self.status_bar.lock().ok().and_then(|mut slot| slot.take()) {
            bar.finish_with_message(format!("{}", "adjourned".green()));
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_session_start(&self, session_id: &str, mode: SessionMode) {
        println!(
            "{} {} session {}",
            "->".cyan(),
            mode.as_str().bold(),
            session_id.dimmed()
        );
    }

    fn on_status_change(&self, status: SessionStatus) {
        println!("{} {}", "->".cyan(), status.to_string().bold());
    }

    fn on_turn_start(&self, _participant: &Participant, _role_label: &str) {}

    fn on_turn_complete(&self, participant: &Participant, role_label: &str, success: bool) {
        if success {
            println!("  {} {} ({})", "v".green(), participant.name, role_label);
        } else {
            println!("  {} {} ({}, failed)", "x".red(), participant.name, role_label);
        }
    }

    fn on_session_end(&self, _summary: &str) {
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::ParticipantRole;

    fn participant() -> Participant {
        Participant::new("councilor-skeptic", "Skeptic", ParticipantRole::Councilor, "m")
    }

    #[test]
    fn test_push_tail_keeps_last_characters() {
        let mut tail = String::new();
        ProgressReporter::push_tail(&mut tail, "line one\nline two");
        assert_eq!(tail, "line one line two");

        let long = "é".repeat(TAIL_CHARS + 10);
        ProgressReporter::push_tail(&mut tail, &long);
        assert_eq!(tail.chars().count(), TAIL_CHARS);
        assert!(tail.chars().all(|c| c == 'é'));
    }

    #[test]
    fn test_turn_lifecycle_tracks_bars() {
        let reporter = ProgressReporter::new();
        let skeptic = participant();
        reporter.on_session_start("s-1", SessionMode::Proposal);
        reporter.on_status_change(SessionStatus::Debating);
        reporter.on_turn_start(&skeptic, "Challenge");
        reporter.on_turn_chunk(&skeptic, "I doubt ");
        reporter.on_turn_chunk(&skeptic, "the premise.");
        {
            let turns = reporter.turns.lock().unwrap();
            assert_eq!(turns["councilor-skeptic"].tail, "I doubt the premise.");
        }
        reporter.on_turn_complete(&skeptic, "Challenge", true);
        assert!(reporter.turns.lock().unwrap().is_empty());

        reporter.on_session_end("done");
        assert!(reporter.status_bar.lock().unwrap().is_none());
    }

    #[test]
    fn test_chunk_for_unknown_turn_is_ignored() {
        let reporter = ProgressReporter::new();
        reporter.on_turn_chunk(&participant(), "stray");
        reporter.on_turn_complete(&participant(), "Challenge", false);
        assert!(reporter.turns.lock().unwrap().is_empty());
    }
}
