//! Where session snapshots go when the memory store saves them.

use council_domain::Session;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub trait SessionPersistence: Send + Sync {
    fn save(&self, session: &Session) -> Result<(), PersistenceError>;
}

/// Keeps sessions in memory only
pub struct NoPersistence;

impl SessionPersistence for NoPersistence {
    fn save(&self, _session: &Session) -> Result<(), PersistenceError> {
        Ok(())
    }
}

/// One pretty-printed `<id>.json` file per session
pub struct JsonFilePersistence {
    dir: PathBuf,
}

impl JsonFilePersistence {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, session_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", session_id))
    }

    pub fn load(&self, session_id: &str) -> Result<Session, PersistenceError> {
        let content = std::fs::read_to_string(self.path_for(session_id))?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl SessionPersistence for JsonFilePersistence {
    fn save(&self, session: &Session) -> Result<(), PersistenceError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(&session.id);
        // Write then rename so a crash never leaves a half-written snapshot
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(session)?)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{CouncilSettings, Message, ModeSettings, Roster};

    #[test]
    fn test_save_and_load_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let persistence = JsonFilePersistence::new(dir.path().join("sessions"));

        let mut session = Session::new(
            "s-1",
            "Should the city adopt congestion pricing?",
            CouncilSettings::new(Roster::default(), ModeSettings::Prediction),
        );
        session.push_message(Message::system("Session opened")).unwrap();
        persistence.save(&session).unwrap();

        assert!(persistence.path_for("s-1").exists());
        assert!(!persistence.path_for("s-1").with_extension("json.tmp").exists());
        assert_eq!(persistence.load("s-1").unwrap(), session);
    }

    #[test]
    fn test_load_missing_session() {
        let dir = tempfile::tempdir().unwrap();
        let persistence = JsonFilePersistence::new(dir.path());
        assert!(matches!(persistence.load("nope"), Err(PersistenceError::Io(_))));
    }
}
