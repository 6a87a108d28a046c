//! Domain layer for council-chamber
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Council
//!
//! A council is a roster of AI participants (speaker, moderator, councilors,
//! specialists, swarm agents) that deliberate on a topic:
//!
//! - **Session**: one run from creation to adjournment, with an append-only transcript
//! - **Mode**: the pipeline kind (proposal, deliberation, inquiry, research, swarm,
//!   swarm-coding, prediction, advisory)
//! - **Vote**: the weighted ballot of a proposal session, with a consensus score
//! - **Prediction**: the final forecast of a prediction session

pub mod config;
pub mod core;
pub mod council;
pub mod participant;
pub mod prompt;
pub mod session;
pub mod tool;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use core::error::DomainError;
pub use council::{
    ChallengeOutcome, ConsensusLabel, DebateQueue, DebateTurn, PredictionData, VoteChoice,
    VoteData, VoteOutcome, VoteRecord, parse_prediction, parse_votes,
};
pub use participant::{
    catalog::{default_roster, persona_ids},
    entities::{NEUTRAL_COLOR, Participant, ParticipantRole},
    roster::Roster,
};
pub use prompt::{CouncilPrompt, PromptMessage, PromptRole, SessionBrief};
pub use session::{
    entities::{Attachment, AuthorKind, GeneratedFile, Message, MessagePatch, Session},
    mode::{CouncilSettings, ModeSettings, SessionMode},
    status::{SessionStatus, StatusChange},
};
pub use tool::{
    ArgKind, ToolCall, ToolDefinition, ToolError, ToolErrorCode, ToolParameter, ToolSpec,
    parse_tool_blocks,
};
