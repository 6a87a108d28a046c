//! JSONL file writer for session events.
//!
//! Each [`ConversationEvent`] becomes one JSON line: the payload's fields
//! plus `type` and `timestamp`. Write failures are reported through
//! `tracing` and never reach the session.

use crate::jsonl::{JsonlFile, timestamp};
use council_application::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::warn;

pub struct JsonlConversationLogger {
    file: JsonlFile,
}

impl JsonlConversationLogger {
    /// Open (or create) the log at `path`.
    ///
    /// Returns `None` and warns when the file cannot be opened, so a bad
    /// log path only disables transcript logging.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        match JsonlFile::open(path) {
            Ok(file) => Some(Self { file }),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not open conversation log");
                None
            }
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

fn record(event: ConversationEvent) -> Value {
    let mut map = match event.payload {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("data".to_string(), other);
            map
        }
    };
    map.insert("type".to_string(), Value::String(event.event_type.to_string()));
    map.insert("timestamp".to_string(), Value::String(timestamp()));
    Value::Object(map)
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let event_type = event.event_type;
        if let Err(e) = self.file.append(&record(event)) {
            warn!(event_type, error = %e, "Failed to write conversation event");
        }
    }
}
