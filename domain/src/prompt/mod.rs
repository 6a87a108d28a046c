//! Prompt domain
//!
//! Templates for every phase of every session mode, plus the chat message
//! type handed to model invokers.

mod message;
mod template;

pub use message::{PromptMessage, PromptRole};
pub use template::{
    CouncilPrompt, FILE_MANIFEST_PHASE, SWARM_CODING_PHASES, SessionBrief, SwarmCodingPhase,
};
