//! Storage configuration from TOML (`[storage]` section)
//!
//! ```toml
//! [storage]
//! persist = true
//! sessions_dir = "~/.local/share/council-chamber/sessions"
//! debounce_ms = 500
//! precedent_file = "~/.local/share/council-chamber/precedents.jsonl"
//! conversation_log = "./council.conversation.jsonl"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const APP_DIR: &str = "council-chamber";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// Write session snapshots to disk
    pub persist: bool,
    pub sessions_dir: Option<PathBuf>,
    /// Quiet period before a dirty session is saved
    pub debounce_ms: u64,
    pub precedent_file: Option<PathBuf>,
    /// JSONL transcript log; disabled when unset
    pub conversation_log: Option<PathBuf>,
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        Self {
            persist: true,
            sessions_dir: None,
            debounce_ms: 500,
            precedent_file: None,
            conversation_log: None,
        }
    }
}

impl FileStorageConfig {
    /// Configured sessions directory, or `<data dir>/council-chamber/sessions`
    pub fn sessions_dir(&self) -> Option<PathBuf> {
        self.sessions_dir
            .as_deref()
            .map(expand_home)
            .or_else(|| dirs::data_dir().map(|d| d.join(APP_DIR).join("sessions")))
    }

    /// Configured precedent file, or `<data dir>/council-chamber/precedents.jsonl`
    pub fn precedent_file(&self) -> Option<PathBuf> {
        self.precedent_file
            .as_deref()
            .map(expand_home)
            .or_else(|| dirs::data_dir().map(|d| d.join(APP_DIR).join("precedents.jsonl")))
    }

    pub fn conversation_log(&self) -> Option<PathBuf> {
        self.conversation_log.as_deref().map(expand_home)
    }
}

fn expand_home(path: &std::path::Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}
