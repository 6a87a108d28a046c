//! Linear pipelines: a speaker opening, batched council turns, a speaker
//! closing. Deliberation, inquiry, research, swarm and advisory differ only
//! in the rounds between.

use super::turn::TurnOutput;
use super::{PipelineError, PipelineResult, SessionRun, TurnRequest};
use council_domain::council::directives::parse_tasks;
use council_domain::{CouncilPrompt, Participant, SessionStatus};
use tracing::{info, warn};

/// Speaker opening under `Opening`
pub(super) async fn open(
    run: &SessionRun<'_>,
    speaker: &Participant,
    label: &str,
) -> Result<TurnOutput, PipelineError> {
    run.enter_phase(SessionStatus::Opening).await?;
    run.turn(TurnRequest::visible(
        speaker,
        CouncilPrompt::opening(run.brief, run.settings.session_mode()),
        label,
    ))
    .await
}

/// Speaker closing under `Resolving`
pub(super) async fn close(
    run: &SessionRun<'_>,
    speaker: &Participant,
    label: &str,
) -> Result<PipelineResult, PipelineError> {
    run.enter_phase(SessionStatus::Resolving).await?;
    let transcript = run.transcript();
    let output = run
        .turn(TurnRequest::visible(
            speaker,
            CouncilPrompt::closing(run.brief, run.settings.session_mode(), &transcript),
            label,
        ))
        .await?;
    Ok(PipelineResult {
        closing: output.content,
    })
}

/// One batched contribution from each member, all seeing the same transcript
pub(super) async fn contribution_round(
    run: &SessionRun<'_>,
    members: &[&Participant],
    label: &str,
) -> Result<Vec<TurnOutput>, PipelineError> {
    let transcript = run.transcript();
    let prompt = CouncilPrompt::contribution(run.brief, run.settings.session_mode(), &transcript);
    let requests = members
        .iter()
        .map(|p| TurnRequest::visible(*p, prompt.clone(), label))
        .collect();
    run.batch(requests).await
}

pub(super) async fn deliberation(
    run: &SessionRun<'_>,
    rounds: usize,
) -> Result<PipelineResult, PipelineError> {
    let roster = &run.settings.participants;
    let speaker = roster.speaker()?;
    let members = roster.council_members();

    open(run, speaker, "OPENING BRIEF").await?;
    run.enter_phase(SessionStatus::Debating).await?;
    for round in 1..=rounds.max(1) {
        info!(session_id = run.session_id, round, "Deliberation round");
        contribution_round(run, &members, "PERSPECTIVE").await?;
    }
    close(run, speaker, "SYNTHESIS").await
}

pub(super) async fn inquiry(
    run: &SessionRun<'_>,
    addressed_to: Option<&str>,
) -> Result<PipelineResult, PipelineError> {
    let roster = &run.settings.participants;
    let speaker = roster.speaker()?;
    let members = roster.council_members();

    let addressed = addressed_to.and_then(|name| {
        let found = roster
            .resolve_name(name)
            .filter(|p| p.role.is_council_member());
        if found.is_none() {
            warn!(session_id = run.session_id, name, "Addressed councilor not found; asking the whole council");
        }
        found
    });

    open(run, speaker, "INQUIRY").await?;
    run.enter_phase(SessionStatus::Debating).await?;
    match addressed {
        Some(member) => {
            contribution_round(run, &[member], "ANSWER").await?;
        }
        None => {
            contribution_round(run, &members, "ANSWER").await?;
        }
    }
    close(run, speaker, "COMPILED ANSWER").await
}

pub(super) async fn research(
    run: &SessionRun<'_>,
    follow_up: bool,
) -> Result<PipelineResult, PipelineError> {
    let roster = &run.settings.participants;
    let speaker = roster.speaker()?;
    let members = roster.council_members();

    open(run, speaker, "RESEARCH PLAN").await?;
    run.enter_phase(SessionStatus::Debating).await?;
    contribution_round(run, &members, "INVESTIGATION").await?;

    run.enter_phase(SessionStatus::Reconciling).await?;
    let transcript = run.transcript();
    let analysis = run
        .turn(TurnRequest::visible(
            speaker,
            CouncilPrompt::gap_analysis(run.brief, &transcript),
            "GAP ANALYSIS",
        ))
        .await?;

    let gaps = parse_tasks(&analysis.content);
    if follow_up && !gaps.is_empty() && !members.is_empty() {
        info!(session_id = run.session_id, gaps = gaps.len(), "Filling research gaps");
        let requests = gaps
            .iter()
            .enumerate()
            .map(|(i, gap)| {
                TurnRequest::visible(
                    members[i % members.len()],
                    CouncilPrompt::gap_filling(run.brief, gap),
                    "GAP FILLING",
                )
            })
            .collect();
        run.batch(requests).await?;
    }

    close(run, speaker, "RESEARCH DOSSIER").await
}

pub(super) async fn swarm(run: &SessionRun<'_>) -> Result<PipelineResult, PipelineError> {
    let roster = &run.settings.participants;
    let speaker = roster.speaker()?;
    let workers = roster.swarm_workers();

    let plan = open(run, speaker, "TASK DECOMPOSITION").await?;
    let mut tasks = parse_tasks(&plan.content);
    if tasks.is_empty() {
        tasks.push(run.brief.topic.clone());
    }

    run.enter_phase(SessionStatus::Debating).await?;
    if workers.is_empty() {
        warn!(session_id = run.session_id, "No swarm workers enabled");
    } else {
        info!(session_id = run.session_id, tasks = tasks.len(), workers = workers.len(), "Dispatching swarm tasks");
        let requests = tasks
            .iter()
            .enumerate()
            .map(|(i, task)| {
                TurnRequest::visible(
                    workers[i % workers.len()],
                    CouncilPrompt::swarm_task(run.brief, task),
                    "TASK RESULT",
                )
            })
            .collect();
        run.batch(requests).await?;
    }

    close(run, speaker, "AGGREGATION").await
}

pub(super) async fn advisory(run: &SessionRun<'_>) -> Result<PipelineResult, PipelineError> {
    let roster = &run.settings.participants;
    let speaker = roster.speaker()?;
    let members = roster.council_members();

    open(run, speaker, "OPENING BRIEF").await?;
    run.enter_phase(SessionStatus::Debating).await?;
    contribution_round(run, &members, "ADVICE").await?;
    close(run, speaker, "COUNSEL").await
}
