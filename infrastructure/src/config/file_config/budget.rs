//! Budget configuration from TOML (`[budget]` section)

use serde::{Deserialize, Serialize};

/// Per-session admission limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBudgetConfig {
    /// Calls allowed in flight at once for one session
    pub max_concurrent_calls: usize,
    /// Cumulative token ceiling per session (unlimited when unset)
    pub max_session_tokens: Option<u64>,
}

impl Default for FileBudgetConfig {
    fn default() -> Self {
        Self {
            max_concurrent_calls: 4,
            max_session_tokens: None,
        }
    }
}
