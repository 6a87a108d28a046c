//! Hand-written port doubles for orchestrator tests.

use crate::ports::budget_guard::{Admission, BudgetGuard, CallKind, CallMetadata};
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::model_invoker::{ChunkSink, InvokerError, ModelInvoker};
use crate::ports::precedent_store::{Precedent, PrecedentError, PrecedentStore};
use crate::ports::session_store::{SessionStore, StoreError};
use crate::ports::tool_executor::ToolExecutorPort;
use async_trait::async_trait;
use council_domain::{
    AuthorKind, DomainError, GeneratedFile, Message, MessagePatch, Participant, ParticipantRole,
    PredictionData, PromptMessage, Roster, Session, SessionStatus, StatusChange, ToolCall,
    ToolDefinition, ToolError, ToolSpec, VoteData,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

// ==================== Roster ====================

pub fn participant(id: &str, name: &str, role: ParticipantRole) -> Participant {
    Participant::new(id, name, role, "test-model")
}

/// Speaker, Moderator and councilors Alice, Bob and Carol
pub fn test_roster() -> Roster {
    Roster::new(vec![
        participant("speaker", "Speaker", ParticipantRole::Speaker),
        participant("moderator", "Moderator", ParticipantRole::Moderator),
        participant("alice", "Alice", ParticipantRole::Councilor),
        participant("bob", "Bob", ParticipantRole::Councilor),
        participant("carol", "Carol", ParticipantRole::Councilor),
    ])
}

// ==================== Scripted Invoker ====================

/// `(participant, prompt, nth call of that participant)` -> reply or error text
type Responder = dyn Fn(&Participant, &str, usize) -> Result<String, String> + Send + Sync;
type Hook = Box<dyn Fn(&Participant) + Send + Sync>;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub participant_id: String,
    pub prompt: String,
}

pub struct ScriptedInvoker {
    responder: Box<Responder>,
    calls: Mutex<Vec<RecordedCall>>,
    hook: Mutex<Option<Hook>>,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedInvoker {
    pub fn new(
        responder: impl Fn(&Participant, &str, usize) -> Result<String, String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
            hook: Mutex::new(None),
            gate: None,
        }
    }

    /// Every call waits for a permit from `gate` before replying
    pub fn with_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Run `hook` at the start of every call
    pub fn set_hook(&self, hook: impl Fn(&Participant) + Send + Sync + 'static) {
        *self.hook.lock().unwrap() = Some(Box::new(hook));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, participant_id: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.participant_id == participant_id)
            .collect()
    }
}

#[async_trait]
impl ModelInvoker for ScriptedInvoker {
    async fn invoke(
        &self,
        participant: &Participant,
        history: &[PromptMessage],
        _system_prompt: &str,
        on_chunk: ChunkSink<'_>,
    ) -> Result<String, InvokerError> {
        let prompt = history.last().map(|m| m.content.clone()).unwrap_or_default();
        let nth = {
            let mut calls = self.calls.lock().unwrap();
            let nth = calls
                .iter()
                .filter(|c| c.participant_id == participant.id)
                .count();
            calls.push(RecordedCall {
                participant_id: participant.id.clone(),
                prompt: prompt.clone(),
            });
            nth
        };
        {
            let hook = self.hook.lock().unwrap();
            if let Some(hook) = hook.as_ref() {
                hook(participant);
            }
        }
        if let Some(gate) = &self.gate {
            let _permit = gate.acquire().await.unwrap();
        }

        let reply = (self.responder)(participant, &prompt, nth).map_err(InvokerError::RequestFailed)?;
        let chars: Vec<char> = reply.chars().collect();
        for chunk in chars.chunks(7) {
            on_chunk(&chunk.iter().collect::<String>());
        }
        Ok(reply)
    }
}

// ==================== Memory Store ====================

#[derive(Default)]
pub struct MemoryStore {
    sessions: Mutex<HashMap<String, Session>>,
    status_history: Mutex<Vec<SessionStatus>>,
    reject_petitions: bool,
}

impl MemoryStore {
    /// Store whose `add_message` refuses every human-authored message
    pub fn rejecting_petitions() -> Self {
        Self {
            reject_petitions: true,
            ..Self::default()
        }
    }

    /// Every status change actually applied, in order
    pub fn status_history(&self) -> Vec<SessionStatus> {
        self.status_history.lock().unwrap().clone()
    }

    fn with_session<T>(
        &self,
        session_id: &str,
        f: impl FnOnce(&mut Session) -> Result<T, council_domain::DomainError>,
    ) -> Result<T, StoreError> {
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| StoreError::SessionNotFound(session_id.to_string()))?;
        Ok(f(session)?)
    }
}

impl SessionStore for MemoryStore {
    fn create_session(&self, session: Session) -> Result<(), StoreError> {
        let mut sessions = self.sessions.lock().unwrap();
        if sessions.contains_key(&session.id) {
            return Err(StoreError::AlreadyExists(session.id));
        }
        sessions.insert(session.id.clone(), session);
        Ok(())
    }

    fn get_session(&self, session_id: &str) -> Option<Session> {
        self.sessions.lock().unwrap().get(session_id).cloned()
    }

    fn add_message(&self, session_id: &str, message: Message) -> Result<String, StoreError> {
        if self.reject_petitions && message.author_kind == AuthorKind::Human {
            return Err(StoreError::Domain(DomainError::InvalidTopic(
                "petition rejected".to_string(),
            )));
        }
        self.with_session(session_id, |s| s.push_message(message))
    }

    fn update_message(
        &self,
        session_id: &str,
        message_id: &str,
        patch: MessagePatch,
    ) -> Result<(), StoreError> {
        self.with_session(session_id, |s| s.patch_message(message_id, patch))
    }

    fn update_status(
        &self,
        session_id: &str,
        status: SessionStatus,
    ) -> Result<StatusChange, StoreError> {
        let change = self.with_session(session_id, |s| s.apply_status(status))?;
        if change.is_changed() {
            self.status_history.lock().unwrap().push(status);
        }
        Ok(change)
    }

    fn set_vote_data(&self, session_id: &str, data: VoteData) -> Result<(), StoreError> {
        self.with_session(session_id, |s| s.record_vote_data(data))
    }

    fn set_prediction_data(
        &self,
        session_id: &str,
        data: PredictionData,
    ) -> Result<(), StoreError> {
        self.with_session(session_id, |s| s.record_prediction_data(data))
    }

    fn add_generated_files(
        &self,
        session_id: &str,
        files: Vec<GeneratedFile>,
    ) -> Result<(), StoreError> {
        self.with_session(session_id, |s| s.record_generated_files(files))
    }
}

// ==================== Recording Budget ====================

#[derive(Default)]
pub struct RecordingBudget {
    deny: Vec<String>,
    pub checks: AtomicUsize,
    pub recorded: AtomicUsize,
    pub completed: AtomicUsize,
    pub tokens: AtomicUsize,
    kinds: Mutex<Vec<CallKind>>,
}

impl RecordingBudget {
    pub fn denying(participant_ids: &[&str]) -> Self {
        Self {
            deny: participant_ids.iter().map(|id| id.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn kinds(&self) -> Vec<CallKind> {
        self.kinds.lock().unwrap().clone()
    }
}

impl BudgetGuard for RecordingBudget {
    fn check_allowed(
        &self,
        _session_id: &str,
        kind: CallKind,
        metadata: &CallMetadata,
        estimated_tokens: u64,
    ) -> Admission {
        self.checks.fetch_add(1, Ordering::SeqCst);
        assert!(estimated_tokens > 0);
        if self.deny.contains(&metadata.participant_id) {
            return Admission::deny("call depth limit reached");
        }
        self.kinds.lock().unwrap().push(kind);
        Admission::allow()
    }

    fn record_call(&self, _session_id: &str) {
        self.recorded.fetch_add(1, Ordering::SeqCst);
    }

    fn complete_call(&self, _session_id: &str) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }

    fn update_token_count(&self, _session_id: &str, tokens: u64) {
        self.tokens.fetch_add(tokens as usize, Ordering::SeqCst);
    }
}

// ==================== Other Ports ====================

#[derive(Default)]
pub struct RecordingPrecedents {
    pub recorded: Mutex<Vec<Precedent>>,
}

impl PrecedentStore for RecordingPrecedents {
    fn record(&self, precedent: &Precedent) -> Result<(), PrecedentError> {
        self.recorded.lock().unwrap().push(precedent.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingLogger {
    pub events: Mutex<Vec<&'static str>>,
}

impl RecordingLogger {
    pub fn event_types(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().clone()
    }
}

impl ConversationLogger for RecordingLogger {
    fn log(&self, event: ConversationEvent) {
        self.events.lock().unwrap().push(event.event_type);
    }
}

/// Offers a single `echo` tool that upper-cases its `text` argument
pub struct EchoTools {
    spec: ToolSpec,
}

impl Default for EchoTools {
    fn default() -> Self {
        Self {
            spec: ToolSpec::new().register(ToolDefinition::new("echo", "Echo text back")),
        }
    }
}

#[async_trait]
impl ToolExecutorPort for EchoTools {
    fn tool_spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn execute(&self, call: &ToolCall) -> Result<String, ToolError> {
        match call.tool_name.as_str() {
            "echo" => Ok(call.text("text").unwrap_or_default().to_uppercase()),
            other => Err(ToolError::unknown_tool(other)),
        }
    }
}
