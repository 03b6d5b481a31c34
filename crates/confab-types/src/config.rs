//! Client configuration types for Confab.
//!
//! `ClientConfig` represents `config.toml` in the data directory: where the
//! two remote services live and which model to request.

use serde::{Deserialize, Serialize};

pub const DEFAULT_SESSION_SERVER_URL: &str = "http://localhost:8080";
pub const DEFAULT_COMPLETION_BASE_URL: &str = "https://api.deepseek.com";
pub const DEFAULT_MODEL: &str = "deepseek-chat";
pub const DEFAULT_SNAPSHOT_NAME: &str = "chat-session";

/// Top-level client configuration. All fields have defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the session persistence service.
    #[serde(default = "default_session_server_url")]
    pub session_server_url: String,

    /// Base URL of the completion service (`/chat/completions` is appended).
    #[serde(default = "default_completion_base_url")]
    pub completion_base_url: String,

    /// Model identifier sent with every completion request.
    #[serde(default = "default_model")]
    pub model: String,

    /// File stem of the local store snapshot.
    #[serde(default = "default_snapshot_name")]
    pub snapshot_name: String,
}

fn default_session_server_url() -> String {
    DEFAULT_SESSION_SERVER_URL.to_string()
}

fn default_completion_base_url() -> String {
    DEFAULT_COMPLETION_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_snapshot_name() -> String {
    DEFAULT_SNAPSHOT_NAME.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            session_server_url: default_session_server_url(),
            completion_base_url: default_completion_base_url(),
            model: default_model(),
            snapshot_name: default_snapshot_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default_values() {
        let config = ClientConfig::default();
        assert_eq!(config.session_server_url, "http://localhost:8080");
        assert_eq!(config.model, "deepseek-chat");
        assert_eq!(config.snapshot_name, "chat-session");
    }

    #[test]
    fn test_client_config_deserialize_with_defaults() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_client_config_deserialize_partial() {
        let toml_str = r#"
session_server_url = "http://sessions.internal:9000"
model = "gpt-4o-mini"
"#;
        let config: ClientConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.session_server_url, "http://sessions.internal:9000");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.completion_base_url, DEFAULT_COMPLETION_BASE_URL);
    }
}
