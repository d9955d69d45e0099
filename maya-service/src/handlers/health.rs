use crate::models::RelayTarget;
use crate::startup::AppState;
use axum::{extract::State, http::header, response::IntoResponse, Json};
use serde_json::json;

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "maya-service",
        "version": env!("CARGO_PKG_VERSION"),
        "providers": {
            "v0": state.relay.has_credentials(RelayTarget::AppBuilder),
            "gemini": state.relay.has_credentials(RelayTarget::Text),
        }
    }))
}

/// Prometheus metrics endpoint.
pub async fn metrics_endpoint() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        service_core::observability::render_metrics(),
    )
}
