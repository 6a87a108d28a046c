//! Inline directives and transcript formats written by participants.
//!
//! - `[CHALLENGE: name]` hands the floor to a rival
//! - `[PASS]` yields the turn without speaking
//! - `[TURN: name]` delimits an economy-mode simulated debate
//! - `<task>` and `FILE: path | description` carry swarm work items
//! - `<think>` holds model scratch text

use super::tags::{strip_tag, tag_values};
use serde::{Deserialize, Serialize};

pub const PASS_MARKER: &str = "[PASS]";
const CHALLENGE_PREFIX: &str = "[challenge:";
const TURN_PREFIX: &str = "[turn:";
const FILE_PREFIX: &str = "file:";
const THINK_OPEN: &str = "<think>";

/// Name inside the first `[CHALLENGE: name]` directive
pub fn parse_challenge(text: &str) -> Option<String> {
    let lower = text.to_ascii_lowercase();
    let start = lower.find(CHALLENGE_PREFIX)? + CHALLENGE_PREFIX.len();
    let end = start + lower[start..].find(']')?;
    let name = text[start..end].trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// Whether the whole output is the pass marker
pub fn is_pass(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case(PASS_MARKER)
}

/// Whether streamed output could still turn out to be a pass.
///
/// `<think>` sections are ignored, including one still open, so scratch
/// text ahead of a `[PASS]` keeps the output held back.
pub fn could_be_pass(partial: &str) -> bool {
    let (visible, _) = strip_tag(partial, "think");
    let trimmed = visible.trim();
    is_prefix_ignore_case(PASS_MARKER, trimmed) || is_prefix_ignore_case(THINK_OPEN, trimmed)
}

fn is_prefix_ignore_case(full: &str, partial: &str) -> bool {
    full.get(..partial.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(partial))
}

/// One speech inside an economy-mode transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptTurn {
    pub speaker: String,
    pub content: String,
}

/// Split a simulated debate on `[TURN: name]` lines.
///
/// Text before the first delimiter is dropped; empty speeches are skipped.
/// Returns an empty list when the transcript has no delimiters.
pub fn split_transcript(text: &str) -> Vec<TranscriptTurn> {
    let mut turns: Vec<TranscriptTurn> = Vec::new();
    let mut current: Option<TranscriptTurn> = None;

    for line in text.lines() {
        let trimmed = line.trim_start();
        if let Some((speaker, rest)) = turn_delimiter(trimmed) {
            if let Some(turn) = current.take() {
                turns.push(turn);
            }
            current = Some(TranscriptTurn {
                speaker,
                content: rest.to_string(),
            });
        } else if let Some(turn) = current.as_mut() {
            if !turn.content.is_empty() {
                turn.content.push('\n');
            }
            turn.content.push_str(line);
        }
    }
    if let Some(turn) = current {
        turns.push(turn);
    }

    turns
        .into_iter()
        .filter_map(|mut turn| {
            turn.content = turn.content.trim().to_string();
            (!turn.content.is_empty()).then_some(turn)
        })
        .collect()
}

fn turn_delimiter(line: &str) -> Option<(String, &str)> {
    if !line.get(..TURN_PREFIX.len())?.eq_ignore_ascii_case(TURN_PREFIX) {
        return None;
    }
    let close = line.find(']')?;
    let speaker = line[TURN_PREFIX.len()..close].trim();
    if speaker.is_empty() {
        return None;
    }
    Some((speaker.to_string(), line[close + 1..].trim()))
}

/// Work items from `<task>` tags, empty ones dropped
pub fn parse_tasks(text: &str) -> Vec<String> {
    tag_values(text, "task")
        .into_iter()
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// A file the developers must write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTask {
    pub path: String,
    pub description: String,
}

/// Parse `FILE: <path> | <description>` lines of a file manifest.
///
/// Bullets and backticks around the path are ignored; duplicate paths keep
/// their first description.
pub fn parse_file_manifest(text: &str) -> Vec<FileTask> {
    let mut tasks: Vec<FileTask> = Vec::new();
    for line in text.lines() {
        let line = line.trim().trim_start_matches(['-', '*', ' ']).trim_start();
        let Some(head) = line.get(..FILE_PREFIX.len()) else {
            continue;
        };
        if !head.eq_ignore_ascii_case(FILE_PREFIX) {
            continue;
        }
        let rest = &line[FILE_PREFIX.len()..];
        let (path, description) = match rest.split_once('|') {
            Some((path, description)) => (path, description.trim()),
            None => (rest, ""),
        };
        let path = path.trim().trim_matches(['`', '*']).trim();
        if path.is_empty() || tasks.iter().any(|t| t.path == path) {
            continue;
        }
        tasks.push(FileTask {
            path: path.to_string(),
            description: description.to_string(),
        });
    }
    tasks
}

/// Body of the first fenced code block, or the whole text when unfenced
pub fn first_code_block(text: &str) -> String {
    let Some(open) = text.find("```") else {
        return text.trim().to_string();
    };
    let after_fence = &text[open + 3..];
    let body_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(after_fence.len());
    let body = &after_fence[body_start..];
    match body.find("```") {
        Some(close) => body[..close].trim_end().to_string(),
        None => body.trim_end().to_string(),
    }
}

/// Language label for a generated file, from its extension
pub fn language_for_path(path: &str) -> &'static str {
    let ext = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "rs" => "rust",
        "py" => "python",
        "js" | "mjs" | "cjs" => "javascript",
        "ts" => "typescript",
        "tsx" => "tsx",
        "jsx" => "jsx",
        "go" => "go",
        "java" => "java",
        "kt" => "kotlin",
        "c" | "h" => "c",
        "cpp" | "cc" | "hpp" => "cpp",
        "cs" => "csharp",
        "rb" => "ruby",
        "php" => "php",
        "swift" => "swift",
        "sh" | "bash" => "bash",
        "sql" => "sql",
        "html" | "htm" => "html",
        "css" => "css",
        "json" => "json",
        "toml" => "toml",
        "yaml" | "yml" => "yaml",
        "md" => "markdown",
        _ => "text",
    }
}

/// Separate `<think>` scratch text from the visible answer
pub fn split_thinking(text: &str) -> (String, Option<String>) {
    let (visible, thoughts) = strip_tag(text, "think");
    let thoughts: Vec<String> = thoughts.into_iter().filter(|t| !t.is_empty()).collect();
    let thinking = (!thoughts.is_empty()).then(|| thoughts.join("\n"));
    (visible.trim().to_string(), thinking)
}
