//! Model invoker adapters.

mod openai_compat;
mod sse;

pub use openai_compat::{OpenAiCompatConfig, OpenAiCompatInvoker, ProviderHealth};
