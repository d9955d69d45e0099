pub mod chat;
pub mod form;
pub mod gemini;
pub mod health;

use crate::services::RelayError;
use service_core::error::AppError;

/// Map a relay failure to the HTTP error for an endpoint.
///
/// Upstream detail has already been logged by the relay; callers only see
/// `upstream_message`.
pub(crate) fn relay_error_to_app_error(err: RelayError, upstream_message: &str) -> AppError {
    match err {
        RelayError::Configuration(msg) => AppError::ConfigError(anyhow::anyhow!(msg)),
        RelayError::InvalidInput(msg) => AppError::BadRequest(anyhow::anyhow!(msg)),
        RelayError::Upstream { .. } => AppError::UpstreamError(upstream_message.to_string()),
    }
}
