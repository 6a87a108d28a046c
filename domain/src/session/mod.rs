//! Council session domain.
//!
//! - [`entities::Session`]: the aggregate root holding the transcript
//! - [`entities::Message`]: one transcript entry
//! - [`status::SessionStatus`]: the session state machine
//! - [`mode::SessionMode`] / [`mode::ModeSettings`]: pipeline kind and its settings

pub mod entities;
pub mod mode;
pub mod status;
