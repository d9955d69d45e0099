//! Application startup and lifecycle management.

use crate::config::MayaConfig;
use crate::handlers::{
    chat::{chat_status, create_or_continue_chat},
    gemini::generate_text,
    health::{health_check, metrics_endpoint},
};
use crate::services::RelayService;
use axum::{extract::DefaultBodyLimit, middleware::from_fn, routing::get, Router};
use service_core::error::AppError;
use service_core::middleware::{metrics::metrics_middleware, tracing::request_id_middleware};
use service_core::observability::REQUEST_ID_HEADER;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<MayaConfig>,
    pub relay: RelayService,
}

impl AppState {
    pub fn new(config: MayaConfig, relay: RelayService) -> Self {
        Self {
            config: Arc::new(config),
            relay,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    // Multipart bodies carry the attachment, so the limit follows the upload cap.
    let body_limit = state.config.limits.max_upload_bytes;

    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/chat", get(chat_status).post(create_or_continue_chat))
        .route("/api/gemini", axum::routing::post(generate_text))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with providers created from `config`.
    pub async fn build(config: MayaConfig) -> Result<Self, AppError> {
        let relay = RelayService::from_config(&config)
            .map_err(|e| AppError::InternalError(anyhow::anyhow!(e)))?;
        Self::build_with_relay(config, relay).await
    }

    /// Build the application around an existing relay (tests inject mocks here).
    pub async fn build_with_relay(config: MayaConfig, relay: RelayService) -> Result<Self, AppError> {
        // Port 0 = random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Maya service: HTTP on port {}", port);

        Ok(Self {
            port,
            listener,
            state: AppState::new(config, relay),
        })
    }

    /// Get the HTTP port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.run_with_shutdown(std::future::pending()).await
    }

    /// Run until `shutdown` resolves, finishing in-flight requests first.
    pub async fn run_with_shutdown<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = build_router(self.state);

        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                std::io::Error::other(format!("HTTP server error: {}", e))
            })
    }
}
