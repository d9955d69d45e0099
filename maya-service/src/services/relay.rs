//! The relay: validate one submission, forward it to the chosen upstream in a
//! single call, and normalize the answer.

use super::metrics::{
    record_relay, record_upstream_latency, OUTCOME_INVALID_INPUT, OUTCOME_NOT_CONFIGURED,
    OUTCOME_SUCCESS, OUTCOME_UPSTREAM_ERROR,
};
use super::providers::gemini::{GeminiConfig, GeminiTextProvider};
use super::providers::v0::{V0Config, V0Provider};
use super::providers::{AppGenerator, GenerationInput, ProviderError, TextProvider};
use crate::config::MayaConfig;
use crate::models::{RelayOutcome, RelayRequest, RelayTarget};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

pub const MISSING_V0_KEY: &str =
    "Missing V0_API_KEY. Set it in your environment (.env) to enable app generation.";
pub const MISSING_GEMINI_KEY: &str =
    "Missing GOOGLE_GENERATIVE_AI_API_KEY. Add it to your environment (.env).";
pub const MESSAGE_OR_FILE_REQUIRED: &str = "Message or file is required";
pub const MESSAGE_REQUIRED: &str = "Message is required";
pub const EMPTY_GEMINI_RESPONSE: &str = "Empty response from Gemini API";

#[derive(Debug, Error)]
pub enum RelayError {
    /// The upstream credential is absent. Raised before any network I/O.
    #[error("{0}")]
    Configuration(&'static str),

    /// Nothing to send. User-correctable.
    #[error("{0}")]
    InvalidInput(&'static str),

    #[error("Upstream error: {message}")]
    Upstream {
        status: Option<u16>,
        message: String,
    },
}

impl From<ProviderError> for RelayError {
    fn from(err: ProviderError) -> Self {
        RelayError::Upstream {
            status: err.status(),
            message: err.to_string(),
        }
    }
}

/// Forwards submissions to the configured providers.
///
/// A provider is `None` when its credential is missing; only relays to that
/// target fail, the other keeps working.
#[derive(Clone)]
pub struct RelayService {
    app_generator: Option<Arc<dyn AppGenerator>>,
    text_provider: Option<Arc<dyn TextProvider>>,
}

impl RelayService {
    pub fn new(
        app_generator: Option<Arc<dyn AppGenerator>>,
        text_provider: Option<Arc<dyn TextProvider>>,
    ) -> Self {
        Self {
            app_generator,
            text_provider,
        }
    }

    /// Build the real providers for every credential present in `config`.
    pub fn from_config(config: &MayaConfig) -> Result<Self, ProviderError> {
        let app_generator = match &config.v0.api_key {
            Some(api_key) => {
                let provider = V0Provider::new(V0Config {
                    api_key: api_key.clone(),
                    base_url: config.v0.base_url.clone(),
                    timeout: config.v0.timeout,
                })?;
                tracing::info!(base_url = %config.v0.base_url, "Initialized v0 provider");
                Some(Arc::new(provider) as Arc<dyn AppGenerator>)
            }
            None => {
                tracing::warn!("V0_API_KEY is not set; app generation requests will be rejected");
                None
            }
        };

        let text_provider = match &config.gemini.api_key {
            Some(api_key) => {
                let provider = GeminiTextProvider::new(GeminiConfig {
                    api_key: api_key.clone(),
                    model: config.gemini.model.clone(),
                    base_url: config.gemini.base_url.clone(),
                    timeout: config.gemini.timeout,
                })?;
                tracing::info!(model = %config.gemini.model, "Initialized Gemini text provider");
                Some(Arc::new(provider) as Arc<dyn TextProvider>)
            }
            None => {
                tracing::warn!(
                    "GOOGLE_GENERATIVE_AI_API_KEY is not set; text requests will be rejected"
                );
                None
            }
        };

        Ok(Self::new(app_generator, text_provider))
    }

    pub fn has_credentials(&self, target: RelayTarget) -> bool {
        match target {
            RelayTarget::AppBuilder => self.app_generator.is_some(),
            RelayTarget::Text => self.text_provider.is_some(),
        }
    }

    /// Relay one submission to `target`.
    ///
    /// Issues at most one upstream call. Credentials are checked first, then
    /// input; neither failure touches the network.
    #[tracing::instrument(
        skip(self, request),
        fields(
            target = %target,
            message_len = request.message.len(),
            has_attachment = request.attachment().is_some(),
            continuing = request.continuation_id.is_some(),
        )
    )]
    pub async fn relay(
        &self,
        target: RelayTarget,
        request: &RelayRequest,
    ) -> Result<RelayOutcome, RelayError> {
        let result = match target {
            RelayTarget::AppBuilder => self.relay_app(request).await,
            RelayTarget::Text => self.relay_text(request).await,
        };

        let outcome = match &result {
            Ok(_) => OUTCOME_SUCCESS,
            Err(RelayError::Configuration(_)) => OUTCOME_NOT_CONFIGURED,
            Err(RelayError::InvalidInput(_)) => OUTCOME_INVALID_INPUT,
            Err(RelayError::Upstream { status, message }) => {
                tracing::error!(status = ?status, error = %message, "Upstream relay call failed");
                OUTCOME_UPSTREAM_ERROR
            }
        };
        record_relay(target, outcome);

        result
    }

    async fn relay_app(&self, request: &RelayRequest) -> Result<RelayOutcome, RelayError> {
        let provider = self
            .app_generator
            .as_ref()
            .ok_or(RelayError::Configuration(MISSING_V0_KEY))?;

        let message = request.message.trim();
        let attachment = request.attachment();
        if message.is_empty() && attachment.is_none() {
            return Err(RelayError::InvalidInput(MESSAGE_OR_FILE_REQUIRED));
        }

        let input = GenerationInput {
            message,
            attachment,
        };

        let started = Instant::now();
        let continuation = request
            .continuation_id
            .as_deref()
            .filter(|id| !id.trim().is_empty());
        let app = match continuation {
            Some(chat_id) => provider.send_message(chat_id, input).await,
            None => provider.create_chat(input).await,
        };
        record_upstream_latency(RelayTarget::AppBuilder, started.elapsed());
        let app = app?;

        tracing::info!(chat_id = %app.id, has_demo = app.demo_url.is_some(), "App chat relayed");

        Ok(RelayOutcome::Preview {
            id: app.id,
            preview_url: app.demo_url,
        })
    }

    async fn relay_text(&self, request: &RelayRequest) -> Result<RelayOutcome, RelayError> {
        let provider = self
            .text_provider
            .as_ref()
            .ok_or(RelayError::Configuration(MISSING_GEMINI_KEY))?;

        let message = request.message.trim();
        if message.is_empty() {
            return Err(RelayError::InvalidInput(MESSAGE_REQUIRED));
        }

        let input = GenerationInput {
            message,
            attachment: request.attachment(),
        };

        let started = Instant::now();
        let text = provider.generate(input).await;
        record_upstream_latency(RelayTarget::Text, started.elapsed());
        let text = text?;

        if text.trim().is_empty() {
            return Err(RelayError::Upstream {
                status: None,
                message: EMPTY_GEMINI_RESPONSE.to_string(),
            });
        }

        Ok(RelayOutcome::Text { text })
    }
}
