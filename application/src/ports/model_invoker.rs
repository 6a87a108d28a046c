//! Model invoker port
//!
//! Defines the interface for calling a participant's model.

use async_trait::async_trait;
use council_domain::{Participant, PromptMessage};
use thiserror::Error;

/// Errors that can occur while invoking a model
#[derive(Error, Debug)]
pub enum InvokerError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// Callback receiving each streamed text fragment
pub type ChunkSink<'a> = &'a (dyn Fn(&str) + Send + Sync);

/// Gateway to the model behind a participant
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    /// Invoke the participant's model.
    ///
    /// `on_chunk` is called once per incremental fragment. The returned
    /// string is always the complete response, even when streaming broke
    /// off partway and the adapter had to recover.
    async fn invoke(
        &self,
        participant: &Participant,
        history: &[PromptMessage],
        system_prompt: &str,
        on_chunk: ChunkSink<'_>,
    ) -> Result<String, InvokerError>;
}
