//! Application layer for council-chamber
//!
//! This crate contains the orchestrator use case, its pipelines, the port
//! definitions for every external collaborator, and the cooperative
//! stop/pause signal. It depends only on the domain layer.

pub mod config;
pub mod control;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::OrchestratorParams;
pub use control::{ControlRegistry, ControlSignal, Stopped};
pub use ports::{
    budget_guard::{Admission, BudgetGuard, CallGuard, CallKind, CallMetadata, UnlimitedBudget},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    model_invoker::{ChunkSink, InvokerError, ModelInvoker},
    precedent_store::{NoPrecedents, Precedent, PrecedentError, PrecedentSpeech, PrecedentStore},
    progress::{NoProgress, ProgressNotifier},
    session_store::{SessionStore, StoreError},
    tool_executor::{NoTools, ToolExecutorPort},
};
pub use use_cases::batch::run_batched;
pub use use_cases::run_session::{
    CouncilOrchestrator, PipelineError, RunOutcome, RunSessionError, RunSessionInput,
    RunSessionOutput,
};
