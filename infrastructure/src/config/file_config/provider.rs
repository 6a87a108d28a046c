//! Provider configuration from TOML (`[provider]` section)
//!
//! ```toml
//! [provider]
//! base_url = "http://localhost:1234/v1"
//! api_key_env = "OPENAI_API_KEY"
//! model = "jan-v3-4b-base-instruct"
//! max_tokens = 500
//! temperature = 0.7
//! timeout_secs = 60
//! ```

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://localhost:1234/v1";
pub const DEFAULT_MODEL: &str = "jan-v3-4b-base-instruct";

/// OpenAI-compatible endpoint settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Base URL up to (not including) `/chat/completions`
    pub base_url: String,
    /// Environment variable holding the API key; no auth header when unset
    pub api_key_env: Option<String>,
    /// Model used by participants that do not name their own
    pub model: String,
    pub max_tokens: u64,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key_env: None,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 500,
            temperature: 0.7,
            timeout_secs: 60,
        }
    }
}

impl FileProviderConfig {
    /// Resolve the API key from the configured environment variable
    pub fn api_key(&self) -> Option<String> {
        self.api_key_env
            .as_deref()
            .and_then(|name| std::env::var(name).ok())
            .filter(|key| !key.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_defaults() {
        let config = FileProviderConfig::default();
        assert_eq!(config.base_url, "http://localhost:1234/v1");
        assert_eq!(config.model, "jan-v3-4b-base-instruct");
        assert_eq!(config.max_tokens, 500);
        assert_eq!(config.timeout_secs, 60);
        assert!(config.api_key().is_none());
    }

    #[test]
    fn test_provider_partial_override() {
        let toml_str = r#"
[provider]
model = "qwen2.5-7b-instruct"
temperature = 0.2
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.provider.model, "qwen2.5-7b-instruct");
        assert_eq!(config.provider.temperature, 0.2);
        assert_eq!(config.provider.base_url, DEFAULT_BASE_URL);
    }
}
