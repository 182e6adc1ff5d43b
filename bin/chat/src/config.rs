//! Centralized chat configuration.
//!
//! Strongly-typed configuration loaded via the `config` crate from
//! environment variables, using `__` as the nesting separator:
//!
//! - `COMPLETION__API_KEY` (required)
//! - `COMPLETION__BASE_URL`, `COMPLETION__MODEL` (optional overrides)
//! - `STORE__BASE_URL` (optional; enables the persistence bridge)
//! - `STORE__USER_ID` (optional; resumes an existing backend user)
//!
//! The API credential stays inside this process boundary: it is handed
//! to the completion backend and never reaches the presentation layer.

use bestself_completion::openai::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use serde::Deserialize;

/// Chat application configuration.
#[derive(Debug, Deserialize)]
pub struct ChatConfig {
    /// Completion service configuration.
    pub completion: CompletionConfig,

    /// Persistence backend configuration; absent means local-only.
    #[serde(default)]
    pub store: Option<StoreConfig>,
}

/// Completion service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionConfig {
    /// Bearer credential for the completion API.
    pub api_key: String,

    /// Base URL for the completion API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier sent with every request.
    #[serde(default = "default_model")]
    pub model: String,
}

/// Persistence backend configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Base URL for the history backend.
    pub base_url: String,

    /// Existing backend user to resume, if any.
    #[serde(default)]
    pub user_id: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl ChatConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_defaults_apply() {
        let config: CompletionConfig =
            serde_json::from_str(r#"{"api_key":"sk-test"}"#).expect("deserialize");

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn store_config_is_optional() {
        let config: ChatConfig =
            serde_json::from_str(r#"{"completion":{"api_key":"sk-test"}}"#).expect("deserialize");

        assert!(config.store.is_none());
    }

    #[test]
    fn store_config_with_resume_id() {
        let config: ChatConfig = serde_json::from_str(
            r#"{"completion":{"api_key":"sk-test"},"store":{"base_url":"http://localhost:4000","user_id":"64f1"}}"#,
        )
        .expect("deserialize");

        let store = config.store.expect("store configured");
        assert_eq!(store.base_url, "http://localhost:4000");
        assert_eq!(store.user_id.as_deref(), Some("64f1"));
    }
}
