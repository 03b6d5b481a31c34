//! Client configuration loader for Confab.
//!
//! Reads `config.toml` from the data directory (`~/.confab/` in production)
//! and deserializes it into [`ClientConfig`]. Falls back to sensible defaults
//! when the file is missing or malformed, then applies environment overrides.

use std::path::Path;

use secrecy::SecretString;

use confab_types::config::ClientConfig;

pub const SESSION_URL_ENV: &str = "CONFAB_SESSION_URL";
pub const OPEN_URL_ENV: &str = "CONFAB_OPEN_URL";
pub const MODEL_ENV: &str = "CONFAB_MODEL";
pub const API_KEY_ENV: &str = "CONFAB_API_KEY";

/// Load client configuration from `{data_dir}/config.toml` plus the environment.
///
/// - If the file does not exist, starts from [`ClientConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and starts from the default.
/// - `CONFAB_SESSION_URL`, `CONFAB_OPEN_URL` and `CONFAB_MODEL` override the file.
pub async fn load_config(data_dir: &Path) -> ClientConfig {
    let config = load_file_config(data_dir).await;
    apply_env_overrides(config, |key| std::env::var(key).ok())
}

async fn load_file_config(data_dir: &Path) -> ClientConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ClientConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ClientConfig::default();
        }
    };

    match toml::from_str::<ClientConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ClientConfig::default()
        }
    }
}

/// Override config fields from an environment lookup. Empty values are ignored.
pub fn apply_env_overrides<F>(mut config: ClientConfig, lookup: F) -> ClientConfig
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = get(SESSION_URL_ENV) {
        config.session_server_url = url;
    }
    if let Some(url) = get(OPEN_URL_ENV) {
        config.completion_base_url = url;
    }
    if let Some(model) = get(MODEL_ENV) {
        config.model = model;
    }
    config
}

/// Read the completion service credential from `CONFAB_API_KEY`.
///
/// Returns `None` when unset; the completion service will then reject
/// requests with an authentication error.
pub fn load_api_key() -> Option<SecretString> {
    std::env::var(API_KEY_ENV)
        .ok()
        .filter(|key| !key.is_empty())
        .map(SecretString::from)
}
