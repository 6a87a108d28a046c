//! JSONL-backed [`PrecedentStore`].

use crate::jsonl::JsonlFile;
use council_application::ports::precedent_store::{Precedent, PrecedentError, PrecedentStore};
use std::path::Path;
use tracing::{debug, warn};

/// Appends one line per passed motion
pub struct JsonlPrecedentStore {
    file: JsonlFile,
}

impl JsonlPrecedentStore {
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        Ok(Self {
            file: JsonlFile::open(path)?,
        })
    }

    /// Every precedent recorded so far; unreadable lines are skipped
    pub fn entries(&self) -> std::io::Result<Vec<Precedent>> {
        let content = std::fs::read_to_string(self.file.path())?;
        Ok(content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match serde_json::from_str(line) {
                Ok(precedent) => Some(precedent),
                Err(e) => {
                    warn!(error = %e, "Skipping malformed precedent line");
                    None
                }
            })
            .collect())
    }
}

impl PrecedentStore for JsonlPrecedentStore {
    fn record(&self, precedent: &Precedent) -> Result<(), PrecedentError> {
        self.file
            .append(precedent)
            .map_err(|e| PrecedentError(e.to_string()))?;
        debug!(session_id = %precedent.session_id, "Precedent recorded");
        Ok(())
    }
}
