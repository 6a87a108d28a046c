//! Structured extractors for speaker output.
//!
//! Pure functions over text; no I/O.
//!
//! | Function | Phase | Tags |
//! |----------|-------|------|
//! | [`parse_votes`] | Proposal vote | `<voter>` `<vote>` `<confidence>` `<reason>` |
//! | [`parse_prediction`] | Prediction final call | `<outcome>` `<confidence>` `<timeline>` `<reasoning>` |

use super::prediction::{DEFAULT_PREDICTION_CONFIDENCE, PredictionData, UNKNOWN_TIMELINE};
use super::tags::{tag_positions, tag_value};
use super::vote::{VoteChoice, VoteData, VoteRecord};
use crate::participant::entities::NEUTRAL_COLOR;
use crate::participant::roster::Roster;

/// Extract the council's votes from the speaker's tally.
///
/// Each block runs from one `<voter>` tag to the next. Voters are resolved
/// against the roster for weight and color; unknown voters count with
/// weight 1. Blocks without a readable vote are skipped, and `None` is
/// returned when no vote could be read at all.
pub fn parse_votes(text: &str, topic: &str, roster: &Roster) -> Option<VoteData> {
    let starts = tag_positions(text, "voter");
    let mut records = Vec::new();

    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(text.len());
        let block = &text[start..end];

        let Some(choice) = tag_value(block, "vote").and_then(VoteChoice::parse) else {
            continue;
        };
        let name = tag_value(block, "voter").unwrap_or_default();
        let confidence = tag_value(block, "confidence")
            .and_then(leading_number)
            .map(|c| c.clamp(0.0, 10.0));
        let reason = tag_value(block, "reason").unwrap_or_default().to_string();

        let record = match roster.resolve_name(name) {
            Some(participant) => VoteRecord {
                voter: participant.name.clone(),
                choice,
                confidence,
                reason,
                weight: participant.effective_weight(),
                color: participant.color.clone(),
            },
            None => VoteRecord {
                voter: if name.is_empty() { "Unknown".to_string() } else { name.to_string() },
                choice,
                confidence,
                reason,
                weight: 1.0,
                color: NEUTRAL_COLOR.to_string(),
            },
        };
        records.push(record);
    }

    if records.is_empty() {
        None
    } else {
        Some(VoteData::tally(topic, records))
    }
}

/// Extract the forecast from the speaker's final prediction.
///
/// Requires both an `<outcome>` and a `<confidence>` tag. A confidence that
/// is not a number falls back to 50; a missing timeline reads "Unknown".
pub fn parse_prediction(text: &str) -> Option<PredictionData> {
    let outcome = tag_value(text, "outcome").filter(|o| !o.is_empty())?;
    let raw_confidence = tag_value(text, "confidence")?;

    let confidence = leading_number(raw_confidence.trim_end_matches('%'))
        .map(|c| c.round().clamp(0.0, 100.0) as u8)
        .unwrap_or(DEFAULT_PREDICTION_CONFIDENCE);
    let timeline = tag_value(text, "timeline")
        .filter(|t| !t.is_empty())
        .unwrap_or(UNKNOWN_TIMELINE);
    let reasoning = tag_value(text, "reasoning").unwrap_or_default();

    Some(
        PredictionData::new(outcome, confidence)
            .with_timeline(timeline)
            .with_reasoning(reasoning),
    )
}

/// Leading decimal number of a value such as "8", "7.5/10" or "65%"
fn leading_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let end = trimmed
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || (*c == '.' && *i > 0)))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    trimmed[..end].trim_end_matches('.').parse::<f64>().ok()
}
