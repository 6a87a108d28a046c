//! Swarm-coding pipeline: twelve speaker phases with a developer fan-out
//! after the file manifest.

use super::turn::TurnOutput;
use super::{PipelineError, PipelineResult, SessionRun, TurnRequest};
use council_domain::council::directives::{
    FileTask, first_code_block, language_for_path, parse_file_manifest,
};
use council_domain::prompt::{FILE_MANIFEST_PHASE, SWARM_CODING_PHASES};
use council_domain::{CouncilPrompt, GeneratedFile, Participant, SessionStatus};
use tracing::{info, warn};

pub(super) async fn run(
    run: &SessionRun<'_>,
    language: Option<&str>,
) -> Result<PipelineResult, PipelineError> {
    let roster = &run.settings.participants;
    let speaker = roster.speaker()?;
    let last = SWARM_CODING_PHASES.len() - 1;
    let mut closing = String::new();

    for (index, phase) in SWARM_CODING_PHASES.iter().enumerate() {
        let status = match index {
            0 => SessionStatus::Opening,
            i if i == last => SessionStatus::Resolving,
            _ => SessionStatus::Debating,
        };
        run.enter_phase(status).await?;

        let transcript = run.transcript();
        let label = phase.name.to_uppercase();
        info!(session_id = run.session_id, phase = phase.name, "Swarm-coding phase");
        let output = run
            .turn(TurnRequest::visible(
                speaker,
                CouncilPrompt::coding_phase(run.brief, phase, language, &transcript),
                label,
            ))
            .await?;

        if index == FILE_MANIFEST_PHASE {
            let files = parse_file_manifest(&output.content);
            if files.is_empty() {
                warn!(session_id = run.session_id, "File manifest lists no files");
            } else {
                write_files(run, speaker, &files, language).await?;
            }
        }
        closing = output.content;
    }

    Ok(PipelineResult { closing })
}

/// Fan the manifest out to developer turns and store what they wrote
async fn write_files(
    run: &SessionRun<'_>,
    speaker: &Participant,
    files: &[FileTask],
    language: Option<&str>,
) -> Result<(), PipelineError> {
    let mut developers = run.settings.participants.swarm_workers();
    if developers.is_empty() {
        developers.push(speaker);
    }
    let design = run
        .transcript()
        .into_iter()
        .map(|(_, content)| content)
        .collect::<Vec<_>>()
        .join("\n\n");

    info!(session_id = run.session_id, files = files.len(), developers = developers.len(), "Writing files");
    let requests = files
        .iter()
        .enumerate()
        .map(|(i, file)| {
            TurnRequest::visible(
                developers[i % developers.len()],
                CouncilPrompt::developer_file(run.brief, file, language, &design),
                format!("DEVELOPER: {}", file.path),
            )
        })
        .collect();
    let outputs: Vec<TurnOutput> = run.batch(requests).await?;

    let generated: Vec<GeneratedFile> = files
        .iter()
        .zip(outputs)
        .enumerate()
        .filter(|(_, (_, output))| !output.failed && !output.content.trim().is_empty())
        .map(|(i, (file, output))| GeneratedFile {
            path: file.path.clone(),
            language: language_for_path(&file.path).to_string(),
            content: first_code_block(&output.content),
            author: developers[i % developers.len()].name.clone(),
        })
        .collect();

    if generated.len() < files.len() {
        warn!(
            session_id = run.session_id,
            written = generated.len(),
            requested = files.len(),
            "Some files were not written"
        );
    }
    if !generated.is_empty() {
        run.store.add_generated_files(run.session_id, generated)?;
    }
    Ok(())
}
