//! Prediction pipeline: the speaker's final call becomes a structured forecast.

use super::linear::{close, contribution_round, open};
use super::{PipelineError, PipelineResult, SessionRun};
use crate::ports::conversation_logger::ConversationEvent;
use council_domain::{SessionStatus, parse_prediction};
use serde_json::json;
use tracing::{info, warn};

pub(super) async fn run(run: &SessionRun<'_>) -> Result<PipelineResult, PipelineError> {
    let roster = &run.settings.participants;
    let speaker = roster.speaker()?;
    let members = roster.council_members();

    open(run, speaker, "OPENING BRIEF").await?;
    run.enter_phase(SessionStatus::Debating).await?;
    contribution_round(run, &members, "FORECAST").await?;
    let result = close(run, speaker, "FINAL FORECAST").await?;

    match parse_prediction(&result.closing) {
        Some(prediction) => {
            info!(
                session_id = run.session_id,
                confidence = prediction.confidence,
                "Prediction recorded"
            );
            run.logger.log(ConversationEvent::new(
                "prediction",
                json!({
                    "session_id": run.session_id,
                    "outcome": prediction.outcome,
                    "confidence": prediction.confidence,
                    "timeline": prediction.timeline,
                }),
            ));
            run.store.set_prediction_data(run.session_id, prediction)?;
        }
        None => warn!(session_id = run.session_id, "Final forecast has no outcome/confidence tags"),
    }

    Ok(result)
}
