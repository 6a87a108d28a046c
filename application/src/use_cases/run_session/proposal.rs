//! Proposal pipeline: opening, debate, vote, ruling.

use super::{PipelineError, PipelineResult, SessionRun, TurnRequest};
use crate::ports::conversation_logger::ConversationEvent;
use crate::ports::precedent_store::Precedent;
use council_domain::core::time::now_millis;
use council_domain::council::directives::{parse_challenge, split_transcript};
use council_domain::{
    ChallengeOutcome, CouncilPrompt, DebateQueue, Message, Participant, ParticipantRole,
    SessionStatus, VoteData, parse_votes,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;
use std::collections::HashMap;
use tracing::{debug, info, warn};

pub(super) async fn run(run: &SessionRun<'_>, economy: bool) -> Result<PipelineResult, PipelineError> {
    let roster = &run.settings.participants;
    let speaker = roster.speaker()?;
    let mode = run.settings.session_mode();

    run.enter_phase(SessionStatus::Opening).await?;
    run.turn(TurnRequest::visible(
        speaker,
        CouncilPrompt::opening(run.brief, mode),
        "OPENING BRIEF",
    ))
    .await?;

    run.enter_phase(SessionStatus::Debating).await?;
    let councilors = roster.councilors();
    if economy {
        simulated_debate(run, speaker, &councilors).await?;
    } else {
        debate(run, speaker, &councilors).await?;
    }

    run.enter_phase(SessionStatus::Voting).await?;
    let transcript = run.transcript();
    let tally = run
        .turn(TurnRequest::visible(
            speaker,
            CouncilPrompt::vote_call(run.brief, &transcript, &councilors),
            "VOTE TALLY",
        ))
        .await?;
    let vote = parse_votes(&tally.content, &run.brief.topic, roster);
    match &vote {
        Some(vote) => record_vote(run, vote)?,
        None => warn!(session_id = run.session_id, "No valid votes in the tally"),
    }

    run.enter_phase(SessionStatus::Resolving).await?;
    let ruling = run
        .turn(TurnRequest::visible(
            speaker,
            CouncilPrompt::resolution(run.brief, vote.as_ref()),
            "OFFICIAL RULING",
        ))
        .await?;

    if let Some(vote) = &vote
        && vote.outcome.is_passed()
    {
        let precedent = Precedent {
            session_id: run.session_id.to_string(),
            topic: run.brief.topic.clone(),
            outcome: vote.outcome,
            consensus_score: vote.consensus_score,
            consensus_label: vote.consensus_label,
            ruling: ruling.content.clone(),
            transcript: run.transcript().into_iter().map(Into::into).collect(),
            timestamp: now_millis(),
        };
        if let Err(e) = run.precedents.record(&precedent) {
            warn!(session_id = run.session_id, error = %e, "Failed to record precedent");
        }
    }

    Ok(PipelineResult {
        closing: ruling.content,
    })
}

fn record_vote(run: &SessionRun<'_>, vote: &VoteData) -> Result<(), PipelineError> {
    info!(
        session_id = run.session_id,
        yeas = vote.yeas,
        nays = vote.nays,
        score = vote.consensus_score,
        outcome = vote.outcome.as_str(),
        "Vote tallied"
    );
    run.store.set_vote_data(run.session_id, vote.clone())?;
    run.logger.log(ConversationEvent::new(
        "vote_tally",
        json!({
            "session_id": run.session_id,
            "yeas": vote.yeas,
            "nays": vote.nays,
            "weighted_yeas": vote.weighted_yeas,
            "weighted_nays": vote.weighted_nays,
            "consensus_score": vote.consensus_score,
            "consensus_label": vote.consensus_label.as_str(),
            "outcome": vote.outcome.as_str(),
        }),
    ));
    Ok(())
}

/// Sequential debate with challenges, passes and moderator interjections
async fn debate(
    run: &SessionRun<'_>,
    speaker: &Participant,
    councilors: &[&Participant],
) -> Result<(), PipelineError> {
    let roster = &run.settings.participants;
    let moderator = roster.moderator().unwrap_or(speaker);
    let mut queue = DebateQueue::new(councilors.iter().map(|p| p.id.clone()).collect());
    let mut rng = match run.params.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    // challenged participant id -> challenger name
    let mut challenges: HashMap<String, String> = HashMap::new();

    while let Some(next) = queue.next_turn() {
        let Some(participant) = councilors
            .iter()
            .copied()
            .find(|p| p.id == next.participant_id)
        else {
            continue;
        };

        let transcript = run.transcript();
        let challenger = challenges.remove(&participant.id);
        let (prompt, label) = match (&challenger, next.opening) {
            (None, true) => (
                CouncilPrompt::debate_opening(run.brief, &transcript),
                "OPENING STATEMENT",
            ),
            (challenger, _) => (
                CouncilPrompt::debate_rebuttal(run.brief, &transcript, challenger.as_deref()),
                "REBUTTAL",
            ),
        };

        let output = run
            .turn(TurnRequest::visible(participant, prompt, label).may_pass())
            .await?;
        if output.passed {
            debug!(session_id = run.session_id, participant = %participant.id, "Turn passed");
            continue;
        }
        queue.record_spoken(&participant.id);

        let target = parse_challenge(&output.content)
            .and_then(|name| roster.resolve_name(&name))
            .filter(|p| p.role == ParticipantRole::Councilor)
            .map(|p| p.id.clone());

        match queue.apply_challenge(&participant.id, target.as_deref()) {
            ChallengeOutcome::None => {}
            outcome => {
                if let Some(target) = target {
                    info!(
                        session_id = run.session_id,
                        challenger = %participant.id,
                        target = %target,
                        "Challenge issued"
                    );
                    challenges.insert(target, participant.name.clone());
                }
                if outcome == ChallengeOutcome::Interject {
                    info!(session_id = run.session_id, moderator = %moderator.id, "Breaking rebuttal chain");
                    let transcript = run.transcript();
                    run.turn(TurnRequest::visible(
                        moderator,
                        CouncilPrompt::moderator_interjection(run.brief, &transcript),
                        "MODERATOR INTERJECTION",
                    ))
                    .await?;
                    queue.record_interjection(&mut rng);
                }
            }
        }
    }

    debug!(
        session_id = run.session_id,
        turns = queue.turns_taken(),
        "Debate finished"
    );
    Ok(())
}

/// Economy mode: one speaker call simulating the whole debate
async fn simulated_debate(
    run: &SessionRun<'_>,
    speaker: &Participant,
    councilors: &[&Participant],
) -> Result<(), PipelineError> {
    const LABEL: &str = "SIMULATED DEBATE";
    let roster = &run.settings.participants;

    let output = run
        .turn(
            TurnRequest::visible(
                speaker,
                CouncilPrompt::economy_debate(run.brief, councilors),
                LABEL,
            )
            .silent(),
        )
        .await?;
    if output.content.trim().is_empty() {
        return Ok(());
    }

    let turns = split_transcript(&output.content);
    if turns.is_empty() {
        run.store.add_message(
            run.session_id,
            Message::from_participant(speaker, output.content).with_role_label(LABEL),
        )?;
        return Ok(());
    }

    debug!(session_id = run.session_id, speeches = turns.len(), "Splitting simulated debate");
    for turn in turns {
        let message = match roster.resolve_name(&turn.speaker) {
            Some(participant) => Message::from_participant(participant, turn.content),
            None => Message::from_author(turn.speaker, turn.content),
        };
        run.store
            .add_message(run.session_id, message.with_role_label(LABEL))?;
    }
    Ok(())
}
