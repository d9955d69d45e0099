//! Upstream generation providers.
//!
//! Each provider makes exactly one HTTP call per operation. There is no retry
//! or backoff here; failures are returned to the relay as they happen.

pub mod gemini;
pub mod mock;
pub mod v0;

use crate::models::AttachmentPayload;
use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited")]
    RateLimited,

    #[error("Content filtered")]
    ContentFiltered,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// HTTP status reported by the upstream, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Api { status, .. } => Some(*status),
            ProviderError::RateLimited => Some(429),
            _ => None,
        }
    }
}

/// Input shared by all providers for a single generation call.
#[derive(Debug, Clone, Copy)]
pub struct GenerationInput<'a> {
    pub message: &'a str,
    pub attachment: Option<&'a AttachmentPayload>,
}

/// Result of an app-generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedApp {
    /// Upstream chat id, used to continue the conversation.
    pub id: String,
    /// URL of the live demo, when the upstream produced one.
    pub demo_url: Option<String>,
}

/// Providers that generate an application and keep a chat per app (e.g., v0).
#[async_trait]
pub trait AppGenerator: Send + Sync {
    /// Start a new upstream chat.
    async fn create_chat(&self, input: GenerationInput<'_>) -> Result<GeneratedApp, ProviderError>;

    /// Continue the upstream chat identified by `chat_id`.
    async fn send_message(
        &self,
        chat_id: &str,
        input: GenerationInput<'_>,
    ) -> Result<GeneratedApp, ProviderError>;
}

/// Providers that answer a prompt with text (e.g., Gemini).
#[async_trait]
pub trait TextProvider: Send + Sync {
    async fn generate(&self, input: GenerationInput<'_>) -> Result<String, ProviderError>;
}

/// Turn a non-success upstream response into a `ProviderError`.
pub(crate) async fn error_for_status(
    provider: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status.as_u16() == 429 {
        return Err(ProviderError::RateLimited);
    }

    let error_text = response.text().await.unwrap_or_default();
    Err(ProviderError::Api {
        status: status.as_u16(),
        message: format!("{} API error: {}", provider, error_text),
    })
}

/// Build the HTTP client used by a provider.
pub(crate) fn http_client(timeout: std::time::Duration) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::Network(format!("Failed to create HTTP client: {}", e)))
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        // Request URLs may carry credentials; keep them out of error text.
        let err = err.without_url();
        if err.is_decode() {
            ProviderError::InvalidResponse(err.to_string())
        } else {
            ProviderError::Network(err.to_string())
        }
    }
}
