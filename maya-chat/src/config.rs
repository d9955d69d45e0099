use crate::client::ChatRoute;
use crate::store::DEFAULT_HISTORY_KEY;
use config::{Config as Cfg, Environment, File};
use serde::Deserialize;
use service_core::error::AppError;
use std::path::PathBuf;
use std::time::Duration;

/// Settings for the `maya` terminal client.
///
/// Read from an optional `maya-chat.{toml,yaml,json}` file, then from
/// `MAYA__*` environment variables (`MAYA__SERVER_URL`, `MAYA__ROUTE`, ...).
#[derive(Debug, Deserialize, Clone)]
pub struct ChatSettings {
    #[serde(default = "default_server_url")]
    pub server_url: String,
    /// `app_builder` or `gemini`.
    #[serde(default)]
    pub route: ChatRoute,
    #[serde(default = "default_history_dir")]
    pub history_dir: PathBuf,
    #[serde(default = "default_history_key")]
    pub history_key: String,
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_server_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_history_dir() -> PathBuf {
    PathBuf::from(".maya")
}

fn default_history_key() -> String {
    DEFAULT_HISTORY_KEY.to_string()
}

fn default_max_message_chars() -> usize {
    500
}

fn default_request_timeout_secs() -> u64 {
    180
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            route: ChatRoute::default(),
            history_dir: default_history_dir(),
            history_key: default_history_key(),
            max_message_chars: default_max_message_chars(),
            request_timeout_secs: default_request_timeout_secs(),
            log_level: default_log_level(),
        }
    }
}

impl ChatSettings {
    pub fn load() -> Result<Self, AppError> {
        let config = Cfg::builder()
            .add_source(File::with_name("maya-chat").required(false))
            .add_source(Environment::with_prefix("MAYA").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
