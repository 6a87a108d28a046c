//! Application-level configuration.
//!
//! - [`OrchestratorParams`]: batch pacing, history window, token estimates, debate seed

pub mod orchestrator_params;

pub use orchestrator_params::OrchestratorParams;
