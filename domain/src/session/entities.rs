//! Session domain entities

use super::mode::{CouncilSettings, SessionMode};
use super::status::{SessionStatus, StatusChange};
use crate::core::error::DomainError;
use crate::core::time::now_millis;
use crate::council::prediction::PredictionData;
use crate::council::vote::VoteData;
use crate::participant::entities::Participant;
use serde::{Deserialize, Serialize};

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorKind {
    Human,
    Participant,
    System,
}

/// A file attached to a human message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub mime_type: String,
    /// Inline content (text, or base64 for binary data)
    pub data: String,
}

/// A message in the council transcript (Entity)
///
/// Content may be patched in place while its turn streams; once the turn
/// completes the message is never modified or removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub author: String,
    pub author_kind: AuthorKind,
    /// Participant id for model-authored messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant_id: Option<String>,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking: Option<String>,
    /// Pipeline phase tag (e.g. "OPENING BRIEF")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_label: Option<String>,
    pub timestamp: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl Message {
    fn new(author: impl Into<String>, author_kind: AuthorKind, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            author: author.into(),
            author_kind,
            participant_id: None,
            content: content.into(),
            thinking: None,
            role_label: None,
            timestamp: now_millis(),
            attachments: Vec::new(),
        }
    }

    pub fn human(author: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(author, AuthorKind::Human, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new("System", AuthorKind::System, content)
    }

    pub fn from_participant(participant: &Participant, content: impl Into<String>) -> Self {
        let mut message = Self::new(participant.name.clone(), AuthorKind::Participant, content);
        message.participant_id = Some(participant.id.clone());
        message
    }

    /// Model-authored message attributed by name only (no roster match)
    pub fn from_author(author: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(author, AuthorKind::Participant, content)
    }

    pub fn with_role_label(mut self, label: impl Into<String>) -> Self {
        self.role_label = Some(label.into());
        self
    }

    pub fn with_attachments(mut self, attachments: Vec<Attachment>) -> Self {
        self.attachments = attachments;
        self
    }

    pub fn is_system(&self) -> bool {
        self.author_kind == AuthorKind::System
    }
}

/// In-place update of a streaming message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagePatch {
    pub content: Option<String>,
    pub thinking: Option<String>,
}

impl MessagePatch {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            thinking: None,
        }
    }

    pub fn with_thinking(mut self, thinking: Option<String>) -> Self {
        self.thinking = thinking;
        self
    }
}

/// A file produced by a swarm-coding session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    pub path: String,
    pub language: String,
    pub content: String,
    /// Name of the developer participant that wrote it
    pub author: String,
}

/// One run of a council deliberation (Aggregate root)
///
/// All invariants of the transcript live here so every store
/// implementation enforces them identically:
/// - messages are append-only and keep their identity
/// - status follows [`SessionStatus::transition`]
/// - nothing is appended after adjournment, except nothing at all
/// - vote and prediction data are recorded at most once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub topic: String,
    pub mode: SessionMode,
    status: SessionStatus,
    messages: Vec<Message>,
    pub settings: CouncilSettings,
    vote_data: Option<VoteData>,
    prediction_data: Option<PredictionData>,
    generated_files: Option<Vec<GeneratedFile>>,
    pub created_at: u64,
    pub updated_at: u64,
}

impl Session {
    pub fn new(id: impl Into<String>, topic: impl Into<String>, settings: CouncilSettings) -> Self {
        let now = now_millis();
        Self {
            id: id.into(),
            topic: topic.into(),
            mode: settings.session_mode(),
            status: SessionStatus::Idle,
            messages: Vec::new(),
            settings,
            vote_data: None,
            prediction_data: None,
            generated_files: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn message(&self, id: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn vote_data(&self) -> Option<&VoteData> {
        self.vote_data.as_ref()
    }

    pub fn prediction_data(&self) -> Option<&PredictionData> {
        self.prediction_data.as_ref()
    }

    pub fn generated_files(&self) -> Option<&[GeneratedFile]> {
        self.generated_files.as_deref()
    }

    fn touch(&mut self) {
        self.updated_at = now_millis().max(self.updated_at);
    }

    fn ensure_open(&self) -> Result<(), DomainError> {
        if self.status.is_terminal() {
            Err(DomainError::SessionAdjourned)
        } else {
            Ok(())
        }
    }

    /// Append a message, returning its id
    pub fn push_message(&mut self, message: Message) -> Result<String, DomainError> {
        self.ensure_open()?;
        let id = message.id.clone();
        self.messages.push(message);
        self.touch();
        Ok(id)
    }

    /// Patch a message's content/thinking in place
    pub fn patch_message(&mut self, id: &str, patch: MessagePatch) -> Result<(), DomainError> {
        self.ensure_open()?;
        let message = self
            .messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| DomainError::MessageNotFound(id.to_string()))?;
        if let Some(content) = patch.content {
            message.content = content;
        }
        if let Some(thinking) = patch.thinking {
            message.thinking = Some(thinking);
        }
        self.touch();
        Ok(())
    }

    /// Apply a status; setting the current status again only refreshes the timestamp
    pub fn apply_status(&mut self, status: SessionStatus) -> Result<StatusChange, DomainError> {
        let change = self.status.transition(status)?;
        self.status = status;
        self.touch();
        Ok(change)
    }

    pub fn record_vote_data(&mut self, data: VoteData) -> Result<(), DomainError> {
        self.ensure_open()?;
        if self.vote_data.is_some() {
            return Err(DomainError::AlreadyRecorded("Vote data"));
        }
        self.vote_data = Some(data);
        self.touch();
        Ok(())
    }

    pub fn record_prediction_data(&mut self, data: PredictionData) -> Result<(), DomainError> {
        self.ensure_open()?;
        if self.prediction_data.is_some() {
            return Err(DomainError::AlreadyRecorded("Prediction data"));
        }
        self.prediction_data = Some(data);
        self.touch();
        Ok(())
    }

    pub fn record_generated_files(&mut self, files: Vec<GeneratedFile>) -> Result<(), DomainError> {
        self.ensure_open()?;
        self.generated_files
            .get_or_insert_with(Vec::new)
            .extend(files);
        self.touch();
        Ok(())
    }
}
