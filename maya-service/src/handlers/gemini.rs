//! Endpoint B: plain text generation through Gemini.

use super::form::RelayForm;
use super::relay_error_to_app_error;
use crate::dtos::GeminiResponse;
use crate::models::{RelayOutcome, RelayTarget};
use crate::services::relay::MISSING_GEMINI_KEY;
use crate::startup::AppState;
use axum::extract::{Multipart, State};
use axum::Json;
use service_core::error::AppError;

const UPSTREAM_FAILURE: &str = "Failed to process Gemini request";

/// `POST /api/gemini`
pub async fn generate_text(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<GeminiResponse>, AppError> {
    if !state.relay.has_credentials(RelayTarget::Text) {
        return Err(AppError::ConfigError(anyhow::anyhow!(MISSING_GEMINI_KEY)));
    }

    let form = RelayForm::from_multipart(multipart, state.config.limits.max_message_chars).await?;
    let mut request = form.into_relay_request();
    // Gemini turns carry no upstream session.
    request.continuation_id = None;

    let outcome = state
        .relay
        .relay(RelayTarget::Text, &request)
        .await
        .map_err(|e| relay_error_to_app_error(e, UPSTREAM_FAILURE))?;

    match outcome {
        RelayOutcome::Text { text } => Ok(Json(GeminiResponse { content: text })),
        RelayOutcome::Preview { .. } => Err(AppError::UpstreamError(UPSTREAM_FAILURE.to_string())),
    }
}
