//! Endpoint A: app generation through v0.

use super::form::RelayForm;
use super::relay_error_to_app_error;
use crate::dtos::{ChatResponse, ChatStatusResponse};
use crate::models::{RelayOutcome, RelayTarget};
use crate::services::relay::MISSING_V0_KEY;
use crate::startup::AppState;
use axum::extract::{Multipart, State};
use axum::Json;
use service_core::error::AppError;

const UPSTREAM_FAILURE: &str = "Failed to process request";

/// `POST /api/chat`: create a v0 chat, or continue one when `chatId` is set.
pub async fn create_or_continue_chat(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ChatResponse>, AppError> {
    // Credentials are checked before the body is read.
    if !state.relay.has_credentials(RelayTarget::AppBuilder) {
        return Err(AppError::ConfigError(anyhow::anyhow!(MISSING_V0_KEY)));
    }

    let form = RelayForm::from_multipart(multipart, state.config.limits.max_message_chars).await?;
    let request = form.into_relay_request();

    let outcome = state
        .relay
        .relay(RelayTarget::AppBuilder, &request)
        .await
        .map_err(|e| relay_error_to_app_error(e, UPSTREAM_FAILURE))?;

    match outcome {
        RelayOutcome::Preview { id, preview_url } => Ok(Json(ChatResponse {
            id,
            demo: preview_url,
        })),
        RelayOutcome::Text { .. } => Err(AppError::UpstreamError(UPSTREAM_FAILURE.to_string())),
    }
}

/// `GET /api/chat`: reports whether the v0 key is configured.
pub async fn chat_status(State(state): State<AppState>) -> Json<ChatStatusResponse> {
    Json(ChatStatusResponse {
        ok: true,
        has_key: state.relay.has_credentials(RelayTarget::AppBuilder),
    })
}
