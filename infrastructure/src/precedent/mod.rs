//! Precedent storage: passed motions kept across sessions.

mod jsonl;

pub use jsonl::JsonlPrecedentStore;
