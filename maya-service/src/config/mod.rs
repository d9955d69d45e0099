use secrecy::SecretString;
use service_core::config::{self as core_config, get_env, get_optional_env};
use service_core::error::AppError;
use std::time::Duration;

/// v0 Platform API base URL.
const DEFAULT_V0_BASE_URL: &str = "https://api.v0.dev/v1";

/// Gemini API base URL.
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Upstream calls are never retried, but they are bounded.
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 120;

/// Matches the prompt box limit of the chat page.
const DEFAULT_MAX_MESSAGE_CHARS: u64 = 500;

const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct MayaConfig {
    pub common: core_config::Config,
    pub v0: V0Settings,
    pub gemini: GeminiSettings,
    pub limits: LimitSettings,
}

#[derive(Debug, Clone)]
pub struct V0Settings {
    /// `V0_API_KEY`. When absent only the app-generation endpoint degrades.
    pub api_key: Option<SecretString>,
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    /// `GOOGLE_GENERATIVE_AI_API_KEY`. When absent only the text endpoint degrades.
    pub api_key: Option<SecretString>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct LimitSettings {
    pub max_message_chars: u64,
    pub max_upload_bytes: usize,
}

impl MayaConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        let is_prod = core_config::is_prod();

        let v0_api_key = get_optional_env("V0_API_KEY").map(SecretString::new);
        let gemini_api_key =
            get_optional_env("GOOGLE_GENERATIVE_AI_API_KEY").map(SecretString::new);

        Ok(MayaConfig {
            common,
            v0: V0Settings {
                api_key: v0_api_key,
                base_url: get_env("V0_API_BASE_URL", Some(DEFAULT_V0_BASE_URL), is_prod)?,
                timeout: Duration::from_secs(parse_env_u64(
                    "V0_TIMEOUT_SECS",
                    DEFAULT_UPSTREAM_TIMEOUT_SECS,
                    is_prod,
                )?),
            },
            gemini: GeminiSettings {
                api_key: gemini_api_key,
                model: get_env("GEMINI_MODEL", Some(DEFAULT_GEMINI_MODEL), is_prod)?,
                base_url: get_env(
                    "GEMINI_API_BASE_URL",
                    Some(DEFAULT_GEMINI_BASE_URL),
                    is_prod,
                )?,
                timeout: Duration::from_secs(parse_env_u64(
                    "GEMINI_TIMEOUT_SECS",
                    DEFAULT_UPSTREAM_TIMEOUT_SECS,
                    is_prod,
                )?),
            },
            limits: LimitSettings {
                max_message_chars: parse_env_u64(
                    "MAX_MESSAGE_CHARS",
                    DEFAULT_MAX_MESSAGE_CHARS,
                    is_prod,
                )?,
                max_upload_bytes: parse_env_u64(
                    "MAX_UPLOAD_BYTES",
                    DEFAULT_MAX_UPLOAD_BYTES,
                    is_prod,
                )? as usize,
            },
        })
    }

    /// Configuration with no credentials and default limits, pointing at the
    /// public provider endpoints.
    pub fn unconfigured() -> Self {
        MayaConfig {
            common: core_config::Config::default(),
            v0: V0Settings {
                api_key: None,
                base_url: DEFAULT_V0_BASE_URL.to_string(),
                timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
            },
            gemini: GeminiSettings {
                api_key: None,
                model: DEFAULT_GEMINI_MODEL.to_string(),
                base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
                timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
            },
            limits: LimitSettings {
                max_message_chars: DEFAULT_MAX_MESSAGE_CHARS,
                max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES as usize,
            },
        }
    }
}

fn parse_env_u64(key: &str, default: u64, is_prod: bool) -> Result<u64, AppError> {
    get_env(key, Some(&default.to_string()), is_prod)?
        .parse()
        .map_err(|e| AppError::ConfigError(anyhow::anyhow!("{} must be an integer: {}", key, e)))
}
