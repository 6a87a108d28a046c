//! Session storage adapters.

mod memory;
mod persistence;

pub use memory::MemorySessionStore;
pub use persistence::{JsonFilePersistence, NoPersistence, PersistenceError, SessionPersistence};
