//! Single participant turns and phase transitions.

use super::PipelineError;
use super::tools::intercept_tool_calls;
use crate::use_cases::batch::run_batched;
use crate::config::OrchestratorParams;
use crate::control::ControlSignal;
use crate::ports::budget_guard::{BudgetGuard, CallGuard, CallKind, CallMetadata};
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::model_invoker::ModelInvoker;
use crate::ports::precedent_store::PrecedentStore;
use crate::ports::progress::ProgressNotifier;
use crate::ports::session_store::SessionStore;
use crate::ports::tool_executor::ToolExecutorPort;
use council_domain::council::directives::{could_be_pass, is_pass, split_thinking};
use council_domain::{
    AuthorKind, CouncilPrompt, CouncilSettings, Message, MessagePatch, Participant,
    PromptMessage, SessionBrief, SessionStatus,
};
use serde_json::json;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// How a turn's output reaches the transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Visibility {
    /// Streamed into a message as it arrives
    Visible,
    /// Like `Visible`, but held back while the output could still be `[PASS]`
    MayPass,
    /// Buffered only; the caller decides what to record
    Silent,
}

pub(crate) struct TurnRequest<'p> {
    pub participant: &'p Participant,
    pub prompt: String,
    pub role_label: String,
    pub kind: CallKind,
    pub visibility: Visibility,
}

impl<'p> TurnRequest<'p> {
    pub fn visible(
        participant: &'p Participant,
        prompt: String,
        role_label: impl Into<String>,
    ) -> Self {
        Self {
            participant,
            prompt,
            role_label: role_label.into(),
            kind: CallKind::Single,
            visibility: Visibility::Visible,
        }
    }

    pub fn may_pass(mut self) -> Self {
        self.visibility = Visibility::MayPass;
        self
    }

    pub fn silent(mut self) -> Self {
        self.visibility = Visibility::Silent;
        self
    }

    pub fn batched(mut self) -> Self {
        self.kind = CallKind::Batched;
        self
    }
}

/// What a turn produced
#[derive(Debug, Clone, Default)]
pub(crate) struct TurnOutput {
    /// Final content (thinking removed, tool output appended). Empty when
    /// the call was denied or failed.
    pub content: String,
    pub message_id: Option<String>,
    pub passed: bool,
    pub failed: bool,
}

/// Everything a pipeline needs while one session runs
pub(crate) struct SessionRun<'a> {
    pub session_id: &'a str,
    pub brief: &'a SessionBrief,
    pub settings: &'a CouncilSettings,
    pub control: &'a ControlSignal,
    pub progress: &'a dyn ProgressNotifier,
    pub invoker: &'a dyn ModelInvoker,
    pub store: &'a dyn SessionStore,
    pub budget: &'a dyn BudgetGuard,
    pub tools: &'a dyn ToolExecutorPort,
    pub precedents: &'a dyn PrecedentStore,
    pub logger: &'a dyn ConversationLogger,
    pub params: &'a OrchestratorParams,
}

/// Streaming state of the turn's message
struct Streamed {
    buffer: String,
    message_id: Option<String>,
}

fn lock(state: &Mutex<Streamed>) -> MutexGuard<'_, Streamed> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl SessionRun<'_> {
    /// Move the session into a pipeline phase.
    ///
    /// Waits at a checkpoint first and applies the status under the pause
    /// gate, so a pause toggled in between is never overwritten.
    pub async fn enter_phase(&self, status: SessionStatus) -> Result<(), PipelineError> {
        loop {
            self.control.checkpoint().await?;
            let change = {
                let _gate = self.control.gate();
                if self.control.is_paused() {
                    None
                } else {
                    Some(self.store.update_status(self.session_id, status)?)
                }
            };
            let Some(change) = change else {
                continue;
            };
            if change.is_changed() {
                info!(session_id = self.session_id, status = status.as_str(), "Entering phase");
                self.progress.on_status_change(status);
                self.logger.log(ConversationEvent::new(
                    "status_change",
                    json!({ "session_id": self.session_id, "status": status.as_str() }),
                ));
            }
            return Ok(());
        }
    }

    /// (author, content) of every participant message so far
    pub fn transcript(&self) -> Vec<(String, String)> {
        self.store
            .get_session(self.session_id)
            .map(|session| {
                session
                    .messages()
                    .iter()
                    .filter(|m| m.author_kind == AuthorKind::Participant && !m.content.is_empty())
                    .map(|m| (m.author.clone(), m.content.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Recent session messages as chat history, ending with `prompt`
    fn history(&self, participant: &Participant, prompt: &str) -> Vec<PromptMessage> {
        let mut history: Vec<PromptMessage> = self
            .store
            .get_session(self.session_id)
            .map(|session| {
                let messages = session.messages();
                let start = messages.len().saturating_sub(self.params.history_window);
                messages[start..]
                    .iter()
                    .filter(|m| !m.content.trim().is_empty())
                    .map(|m| {
                        if m.participant_id.as_deref() == Some(participant.id.as_str()) {
                            PromptMessage::assistant(m.content.clone())
                        } else {
                            PromptMessage::user(format!("[{}]: {}", m.author, m.content))
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();
        history.push(PromptMessage::user(prompt));
        history
    }

    /// Run one turn per request through the batcher, in request order
    pub async fn batch<'p>(
        &self,
        requests: Vec<TurnRequest<'p>>,
    ) -> Result<Vec<TurnOutput>, PipelineError> {
        let outputs = run_batched(
            requests,
            self.settings.max_concurrency,
            self.params.batch_delay,
            self.control,
            |_, request| self.turn(request.batched()),
        )
        .await?;
        outputs.into_iter().collect()
    }

    /// Run one participant turn.
    ///
    /// Only cancellation and store failures escape; a denied or failed call
    /// is recorded in the transcript and yields empty content.
    pub async fn turn(&self, request: TurnRequest<'_>) -> Result<TurnOutput, PipelineError> {
        self.control.checkpoint().await?;

        let TurnRequest {
            participant,
            prompt,
            role_label,
            kind,
            visibility,
        } = request;
        let role_label = role_label.as_str();
        let session_id = self.session_id;

        let history = self.history(participant, &prompt);
        let system_prompt =
            CouncilPrompt::system(participant, self.settings.session_mode(), self.tools.tool_spec());
        let prompt_chars =
            system_prompt.len() + history.iter().map(|m| m.content.len()).sum::<usize>();
        let estimated_tokens = self.params.estimate_tokens(prompt_chars);

        let metadata = CallMetadata {
            participant_id: participant.id.clone(),
            participant_name: participant.name.clone(),
            role_label: role_label.to_string(),
        };
        let admission = self
            .budget
            .check_allowed(session_id, kind, &metadata, estimated_tokens);
        if !admission.allowed {
            let reason = admission
                .reason
                .unwrap_or_else(|| "budget exhausted".to_string());
            warn!(session_id, participant = %participant.id, %reason, "Call denied by budget guard");
            self.store.add_message(
                session_id,
                Message::system(format!("{} was not called: {}", participant.name, reason))
                    .with_role_label(role_label),
            )?;
            return Ok(TurnOutput::default());
        }

        let _call = CallGuard::record(self.budget, session_id);
        self.progress.on_turn_start(participant, role_label);
        debug!(session_id, participant = %participant.id, role_label, kind = kind.as_str(), "Invoking participant");

        let state = Mutex::new(Streamed {
            buffer: String::new(),
            message_id: None,
        });
        let on_chunk = |chunk: &str| {
            let mut streamed = lock(&state);
            streamed.buffer.push_str(chunk);
            if visibility == Visibility::Silent
                || (visibility == Visibility::MayPass && could_be_pass(&streamed.buffer))
            {
                return;
            }
            self.progress.on_turn_chunk(participant, chunk);
            let result = match streamed.message_id.clone() {
                Some(id) => self.store.update_message(
                    session_id,
                    &id,
                    MessagePatch::content(streamed.buffer.clone()),
                ),
                None => self
                    .store
                    .add_message(
                        session_id,
                        Message::from_participant(participant, streamed.buffer.clone())
                            .with_role_label(role_label),
                    )
                    .map(|id| streamed.message_id = Some(id)),
            };
            if let Err(e) = result {
                warn!(session_id, participant = %participant.id, error = %e, "Failed to stream message");
            }
        };

        let response = self
            .invoker
            .invoke(participant, &history, &system_prompt, &on_chunk)
            .await;
        let streamed_id = lock(&state).message_id.take();

        let output = match response {
            Ok(text) => {
                let (answer, thinking) = split_thinking(&text);
                if visibility == Visibility::MayPass && streamed_id.is_none() && is_pass(&answer) {
                    debug!(session_id, participant = %participant.id, "Participant passed");
                    self.progress.on_turn_complete(participant, role_label, true);
                    return Ok(TurnOutput {
                        passed: true,
                        ..TurnOutput::default()
                    });
                }

                let content = intercept_tool_calls(self.tools, session_id, &answer).await;
                let message_id = match (visibility, streamed_id) {
                    (Visibility::Silent, _) => None,
                    (_, Some(id)) => {
                        self.store.update_message(
                            session_id,
                            &id,
                            MessagePatch::content(content.clone()).with_thinking(thinking),
                        )?;
                        Some(id)
                    }
                    (_, None) => {
                        let mut message = Message::from_participant(participant, content.clone())
                            .with_role_label(role_label);
                        message.thinking = thinking;
                        Some(self.store.add_message(session_id, message)?)
                    }
                };
                self.budget
                    .update_token_count(session_id, ((prompt_chars + text.len()) / 4) as u64);
                TurnOutput {
                    content,
                    message_id,
                    passed: false,
                    failed: false,
                }
            }
            Err(e) => {
                warn!(session_id, participant = %participant.id, error = %e, "Participant turn failed");
                let annotation = format!("[Error: {}]", e);
                let message_id = match streamed_id {
                    Some(id) => {
                        let partial = lock(&state).buffer.clone();
                        self.store.update_message(
                            session_id,
                            &id,
                            MessagePatch::content(format!("{}\n\n{}", partial, annotation)),
                        )?;
                        id
                    }
                    None => self.store.add_message(
                        session_id,
                        Message::from_participant(participant, annotation)
                            .with_role_label(role_label),
                    )?,
                };
                TurnOutput {
                    content: String::new(),
                    message_id: Some(message_id),
                    passed: false,
                    failed: true,
                }
            }
        };

        self.progress
            .on_turn_complete(participant, role_label, !output.failed);
        self.logger.log(ConversationEvent::new(
            "turn_complete",
            json!({
                "session_id": session_id,
                "participant": participant.id,
                "role_label": role_label,
                "success": !output.failed,
                "chars": output.content.len(),
            }),
        ));
        Ok(output)
    }
}
