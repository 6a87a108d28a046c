//! Infrastructure layer for council-chamber
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod budget;
pub mod config;
pub mod logging;
pub mod precedent;
pub mod providers;
pub mod store;
pub mod tools;

mod jsonl;

// Re-export commonly used types
pub use budget::{SessionBudgetGuard, SessionUsage};
pub use config::{ConfigLoadError, ConfigLoader, FileConfig};
pub use logging::JsonlConversationLogger;
pub use precedent::JsonlPrecedentStore;
pub use providers::{OpenAiCompatConfig, OpenAiCompatInvoker, ProviderHealth};
pub use store::{JsonFilePersistence, MemorySessionStore, NoPersistence, SessionPersistence};
pub use tools::{LocalToolExecutor, default_tool_spec};
