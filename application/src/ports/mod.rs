//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod budget_guard;
pub mod conversation_logger;
pub mod model_invoker;
pub mod precedent_store;
pub mod progress;
pub mod session_store;
pub mod tool_executor;
