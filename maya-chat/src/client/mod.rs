//! Client side of the relay: what the controller needs from the network.

pub mod http;

pub use http::HttpRelayClient;

use crate::models::Attachment;
use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Which relay endpoint a chat talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRoute {
    /// `POST /api/chat`: app generation with a live preview.
    AppBuilder,
    /// `POST /api/gemini`: plain text answers.
    #[default]
    Gemini,
}

impl ChatRoute {
    pub fn path(&self) -> &'static str {
        match self {
            ChatRoute::AppBuilder => "/api/chat",
            ChatRoute::Gemini => "/api/gemini",
        }
    }

    pub fn provider_name(&self) -> &'static str {
        match self {
            ChatRoute::AppBuilder => "v0",
            ChatRoute::Gemini => "Gemini",
        }
    }
}

/// One outbound relay call.
#[derive(Debug, Clone, Default)]
pub struct RelayCall {
    pub message: String,
    pub attachment: Option<Attachment>,
    pub continuation_id: Option<String>,
}

/// What the relay answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayReply {
    Text(String),
    Preview {
        id: String,
        preview_url: Option<String>,
    },
}

#[derive(Debug, Error)]
pub enum ClientError {
    /// The relay answered with a non-success status.
    #[error("Failed to create chat ({status}): {detail}")]
    Status { status: u16, detail: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait RelayClient: Send + Sync {
    /// Send one submission. Exactly one request per call, no retries.
    async fn relay(&self, call: RelayCall) -> Result<RelayReply, ClientError>;
}
