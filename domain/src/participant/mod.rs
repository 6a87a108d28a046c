//! Council participants ("bots").
//!
//! - [`entities::Participant`]: one configured AI persona
//! - [`entities::ParticipantRole`]: speaker, moderator, councilor, specialist, swarm agent
//! - [`roster::Roster`]: role-aware view over the enabled participants
//! - [`catalog`]: built-in persona catalog used as the default roster

pub mod catalog;
pub mod entities;
pub mod roster;
