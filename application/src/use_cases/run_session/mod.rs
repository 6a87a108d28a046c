//! Run Session use case
//!
//! Drives one council session from creation to adjournment: registers the
//! session's control signal, records the petitioner's message, runs the
//! pipeline selected by the session mode and always finishes in
//! `Adjourned` with a summary, whether the pipeline completed, was stopped
//! or failed.
//!
//! ```text
//! run_session ─▶ pipeline (proposal / linear / prediction / swarm-coding)
//!                   │
//!                   ├─ enter_phase ── checkpoint ─▶ status (under the pause gate)
//!                   └─ turn / batch ─ checkpoint ─▶ budget ─▶ invoke ─▶ tools ─▶ store
//! ```

mod linear;
mod prediction;
mod proposal;
mod swarm_coding;
mod tools;
mod turn;

#[cfg(test)]
mod test_support;

use crate::config::OrchestratorParams;
use crate::control::{ControlRegistry, ControlSignal, Stopped};
use crate::ports::budget_guard::{BudgetGuard, UnlimitedBudget};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::model_invoker::ModelInvoker;
use crate::ports::precedent_store::{NoPrecedents, PrecedentStore};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::session_store::{SessionStore, StoreError};
use crate::ports::tool_executor::{NoTools, ToolExecutorPort};
use council_domain::core::string::truncate;
use council_domain::{
    Attachment, AuthorKind, ConsensusLabel, CouncilSettings, DomainError, GeneratedFile,
    Message, ModeSettings, PredictionData, Session, SessionBrief, SessionStatus, VoteData,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

pub(crate) use turn::{SessionRun, TurnRequest};

/// Errors that end a pipeline early
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Cancellation requested through `stop_session`; not a failure
    #[error("Session stopped by request")]
    Stopped,

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Session store error: {0}")]
    Store(#[from] StoreError),
}

impl PipelineError {
    pub fn is_stopped(&self) -> bool {
        matches!(self, PipelineError::Stopped)
    }
}

impl From<Stopped> for PipelineError {
    fn from(_: Stopped) -> Self {
        PipelineError::Stopped
    }
}

/// Errors that prevent a session from starting at all
#[derive(Error, Debug)]
pub enum RunSessionError {
    #[error("Session {0} is already running")]
    AlreadyRunning(String),

    #[error("Session {0} is already adjourned")]
    AlreadyAdjourned(String),

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] DomainError),

    #[error("Session store error: {0}")]
    Store(#[from] StoreError),
}

/// Input for the RunSession use case
#[derive(Debug, Clone)]
pub struct RunSessionInput {
    pub session_id: String,
    pub topic: String,
    pub settings: CouncilSettings,
    pub context: Option<String>,
    pub user_prompt: Option<String>,
    pub attachments: Vec<Attachment>,
}

impl RunSessionInput {
    pub fn new(
        session_id: impl Into<String>,
        topic: impl Into<String>,
        settings: CouncilSettings,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            topic: topic.into(),
            settings,
            context: None,
            user_prompt: None,
            attachments: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_user_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.user_prompt = Some(prompt.into());
        self
    }

    pub fn with_attachments(mut self, attachments: Vec<Attachment>) -> Self {
        self.attachments = attachments;
        self
    }
}

/// How the pipeline ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Completed,
    Halted,
    Failed(String),
}

/// Result of a session run
#[derive(Debug, Clone, Serialize)]
pub struct RunSessionOutput {
    pub session_id: String,
    pub status: SessionStatus,
    pub outcome: RunOutcome,
    pub messages: Vec<Message>,
    pub vote_data: Option<VoteData>,
    pub prediction_data: Option<PredictionData>,
    pub generated_files: Option<Vec<GeneratedFile>>,
    pub summary: String,
    pub consensus_label: Option<ConsensusLabel>,
}

impl RunSessionOutput {
    fn assemble(session: &Session, outcome: RunOutcome, summary: String) -> Self {
        Self {
            session_id: session.id.clone(),
            status: session.status(),
            outcome,
            messages: session.messages().to_vec(),
            vote_data: session.vote_data().cloned(),
            prediction_data: session.prediction_data().cloned(),
            generated_files: session.generated_files().map(<[GeneratedFile]>::to_vec),
            consensus_label: session.vote_data().map(|v| v.consensus_label),
            summary,
        }
    }

    /// Rebuild a run's output from a saved snapshot.
    ///
    /// The outcome is read back from the final system notice. A snapshot
    /// that never reached `Adjourned` reads as failed.
    pub fn from_snapshot(session: &Session, summary_chars: usize) -> Self {
        let notice = session
            .messages()
            .last()
            .filter(|m| m.is_system())
            .map(|m| m.content.as_str());
        let outcome = if !session.status().is_terminal() {
            RunOutcome::Failed(format!("interrupted while {}", session.status().as_str()))
        } else if notice == Some(HALTED_SUMMARY) {
            RunOutcome::Halted
        } else if let Some(reason) = notice.and_then(|n| n.strip_prefix(FAILED_PREFIX)) {
            RunOutcome::Failed(reason.to_string())
        } else {
            RunOutcome::Completed
        };
        let closing = session
            .messages()
            .iter()
            .rev()
            .find(|m| m.author_kind == AuthorKind::Participant)
            .map(|m| m.content.as_str())
            .unwrap_or_default();
        let summary = summarize(session, &outcome, closing, summary_chars);
        Self::assemble(session, outcome, summary)
    }
}

/// What a pipeline hands back for the summary
#[derive(Debug, Default)]
pub(crate) struct PipelineResult {
    /// Content of the speaker's closing turn
    pub closing: String,
}

/// Use case for running council sessions
pub struct CouncilOrchestrator {
    invoker: Arc<dyn ModelInvoker>,
    store: Arc<dyn SessionStore>,
    budget: Arc<dyn BudgetGuard>,
    tools: Arc<dyn ToolExecutorPort>,
    precedents: Arc<dyn PrecedentStore>,
    logger: Arc<dyn ConversationLogger>,
    params: OrchestratorParams,
    controls: ControlRegistry,
}

impl CouncilOrchestrator {
    pub fn new(invoker: Arc<dyn ModelInvoker>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            invoker,
            store,
            budget: Arc::new(UnlimitedBudget),
            tools: Arc::new(NoTools::default()),
            precedents: Arc::new(NoPrecedents),
            logger: Arc::new(NoConversationLogger),
            params: OrchestratorParams::default(),
            controls: ControlRegistry::new(),
        }
    }

    pub fn with_budget_guard(mut self, budget: Arc<dyn BudgetGuard>) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_tools(mut self, tools: Arc<dyn ToolExecutorPort>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_precedent_store(mut self, precedents: Arc<dyn PrecedentStore>) -> Self {
        self.precedents = precedents;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_params(mut self, params: OrchestratorParams) -> Self {
        self.params = params;
        self
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Request a stop. Returns false if the session is not running.
    pub fn stop_session(&self, session_id: &str) -> bool {
        match self.controls.get(session_id) {
            Some(signal) => {
                info!(session_id, "Stop requested");
                signal.stop();
                true
            }
            None => false,
        }
    }

    /// Toggle pause, returning the new pause state (`None` if not running).
    ///
    /// The status flips between Debating and Paused only when the session is
    /// in one of those two states; elsewhere the flag alone holds the next
    /// checkpoint.
    pub fn pause_session(&self, session_id: &str) -> Option<bool> {
        let signal = self.controls.get(session_id)?;
        let _gate = signal.gate();
        let paused = signal.toggle_pause();
        info!(session_id, paused, "Pause toggled");

        let current = self.store.get_session(session_id).map(|s| s.status());
        let next = match (current, paused) {
            (Some(SessionStatus::Debating), true) => Some(SessionStatus::Paused),
            (Some(SessionStatus::Paused), false) => Some(SessionStatus::Debating),
            _ => None,
        };
        if let Some(status) = next {
            match self.store.update_status(session_id, status) {
                Ok(change) if change.is_changed() => self.logger.log(ConversationEvent::new(
                    "status_change",
                    json!({ "session_id": session_id, "status": status.as_str() }),
                )),
                Ok(_) => {}
                Err(e) => warn!(session_id, error = %e, "Failed to apply pause status"),
            }
        }
        Some(paused)
    }

    pub fn is_running(&self, session_id: &str) -> bool {
        self.controls.is_running(session_id)
    }

    /// Run a session with default (no-op) progress
    pub async fn run_session(
        &self,
        input: RunSessionInput,
    ) -> Result<RunSessionOutput, RunSessionError> {
        self.run_session_with_progress(input, &NoProgress).await
    }

    /// Run a session with progress callbacks
    pub async fn run_session_with_progress(
        &self,
        input: RunSessionInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<RunSessionOutput, RunSessionError> {
        if input.topic.trim().is_empty() {
            return Err(DomainError::InvalidTopic("topic is empty".to_string()).into());
        }

        let registration = self
            .controls
            .register(&input.session_id)
            .ok_or_else(|| RunSessionError::AlreadyRunning(input.session_id.clone()))?;
        let control = registration.signal();
        let session_id = input.session_id.as_str();
        let mode = input.settings.session_mode();

        match self.store.get_session(session_id) {
            Some(existing) if existing.status().is_terminal() => {
                return Err(RunSessionError::AlreadyAdjourned(input.session_id.clone()));
            }
            Some(_) => {}
            None => self.store.create_session(Session::new(
                session_id,
                input.topic.clone(),
                input.settings.clone(),
            ))?,
        }

        info!(session_id, %mode, "Starting council session");
        progress.on_session_start(session_id, mode);

        let brief = SessionBrief::new(input.topic.clone())
            .with_context(input.context.clone())
            .with_user_prompt(input.user_prompt.clone());
        let run = SessionRun {
            session_id,
            brief: &brief,
            settings: &input.settings,
            control,
            progress,
            invoker: self.invoker.as_ref(),
            store: self.store.as_ref(),
            budget: self.budget.as_ref(),
            tools: self.tools.as_ref(),
            precedents: self.precedents.as_ref(),
            logger: self.logger.as_ref(),
            params: &self.params,
        };

        let petition = input.user_prompt.clone().unwrap_or_else(|| input.topic.clone());
        let result = match self.store.add_message(
            session_id,
            Message::human("Petitioner", petition).with_attachments(input.attachments.clone()),
        ) {
            Ok(_) => dispatch(&run, &input.settings.mode).await,
            Err(e) => Err(e.into()),
        };

        let (outcome, closing) = match result {
            Ok(result) => (RunOutcome::Completed, result.closing),
            Err(e) if e.is_stopped() => {
                info!(session_id, "Session halted by request");
                self.append_final_message(session_id, HALTED_SUMMARY);
                (RunOutcome::Halted, String::new())
            }
            Err(e) => {
                error!(session_id, error = %e, "Session pipeline failed");
                let summary = format!("{}{}", FAILED_PREFIX, e);
                self.append_final_message(session_id, &summary);
                (RunOutcome::Failed(e.to_string()), String::new())
            }
        };

        self.adjourn(session_id, control);

        let session = self
            .store
            .get_session(session_id)
            .ok_or_else(|| StoreError::SessionNotFound(session_id.to_string()))?;
        let summary = summarize(&session, &outcome, &closing, self.params.summary_chars);
        self.logger.log(ConversationEvent::new(
            "session_adjourned",
            json!({
                "session_id": session_id,
                "mode": mode.as_str(),
                "outcome": match &outcome {
                    RunOutcome::Completed => "completed",
                    RunOutcome::Halted => "halted",
                    RunOutcome::Failed(_) => "failed",
                },
                "messages": session.messages().len(),
                "summary": summary,
            }),
        ));
        progress.on_session_end(&summary);
        info!(session_id, "Session adjourned");

        Ok(RunSessionOutput::assemble(&session, outcome, summary))
    }

    fn append_final_message(&self, session_id: &str, content: &str) {
        if let Err(e) = self.store.add_message(session_id, Message::system(content)) {
            warn!(session_id, error = %e, "Failed to append final message");
        }
    }

    fn adjourn(&self, session_id: &str, control: &ControlSignal) {
        let _gate = control.gate();
        match self.store.update_status(session_id, SessionStatus::Adjourned) {
            Ok(change) if change.is_changed() => self.logger.log(ConversationEvent::new(
                "status_change",
                json!({ "session_id": session_id, "status": SessionStatus::Adjourned.as_str() }),
            )),
            Ok(_) => {}
            Err(e) => error!(session_id, error = %e, "Failed to adjourn session"),
        }
    }
}

fn summarize(session: &Session, outcome: &RunOutcome, closing: &str, max_chars: usize) -> String {
    match outcome {
        RunOutcome::Halted => return HALTED_SUMMARY.to_string(),
        RunOutcome::Failed(e) => return format!("{}{}", FAILED_PREFIX, e),
        RunOutcome::Completed => {}
    }
    let excerpt = truncate(closing.trim(), max_chars);

    if let Some(vote) = session.vote_data() {
        return format!(
            "Motion {} — consensus {} ({})\n\n{}",
            vote.outcome, vote.consensus_score, vote.consensus_label, excerpt
        );
    }
    if let Some(prediction) = session.prediction_data() {
        return format!(
            "Prediction: {} ({}% confidence, timeline: {})",
            prediction.outcome, prediction.confidence, prediction.timeline
        );
    }
    if matches!(session.settings.mode, ModeSettings::Proposal { .. }) {
        return format!("Motion undecided — no valid votes were recorded\n\n{}", excerpt);
    }
    excerpt
}

const HALTED_SUMMARY: &str = "Session halted by request.";
const FAILED_PREFIX: &str = "Session failed: ";

/// Run the pipeline for the session's mode
async fn dispatch(
    run: &SessionRun<'_>,
    mode: &ModeSettings,
) -> Result<PipelineResult, PipelineError> {
    match mode {
        ModeSettings::Proposal { economy } => proposal::run(run, *economy).await,
        ModeSettings::Deliberation { rounds } => linear::deliberation(run, *rounds).await,
        ModeSettings::Inquiry { addressed_to } => {
            linear::inquiry(run, addressed_to.as_deref()).await
        }
        ModeSettings::Research { follow_up } => linear::research(run, *follow_up).await,
        ModeSettings::Swarm => linear::swarm(run).await,
        ModeSettings::SwarmCoding { language } => {
            swarm_coding::run(run, language.as_deref()).await
        }
        ModeSettings::Prediction => prediction::run(run).await,
        ModeSettings::Advisory => linear::advisory(run).await,
    }
}

#[cfg(test)]
mod tests;
