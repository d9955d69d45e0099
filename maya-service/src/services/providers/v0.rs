//! v0 Platform API provider.
//!
//! Creates app-generation chats and continues them. Only the chat id and the
//! demo URL of the response are read.

use super::{error_for_status, http_client, AppGenerator, GenerationInput, GeneratedApp, ProviderError};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// v0 provider configuration.
#[derive(Debug, Clone)]
pub struct V0Config {
    pub api_key: SecretString,
    pub base_url: String,
    pub timeout: Duration,
}

pub struct V0Provider {
    config: V0Config,
    client: Client,
}

impl V0Provider {
    pub fn new(config: V0Config) -> Result<Self, ProviderError> {
        let client = http_client(config.timeout)?;
        Ok(Self { config, client })
    }

    fn chats_url(&self) -> String {
        format!("{}/chats", self.config.base_url.trim_end_matches('/'))
    }

    fn messages_url(&self, chat_id: &str) -> String {
        format!("{}/{}/messages", self.chats_url(), chat_id)
    }

    async fn post(&self, url: &str, input: GenerationInput<'_>) -> Result<GeneratedApp, ProviderError> {
        let request = ChatMessageRequest::from_input(input);

        tracing::debug!(
            url = %url,
            message_len = input.message.len(),
            has_attachment = input.attachment.is_some(),
            "Sending request to v0 API"
        );

        let response = self
            .client
            .post(url)
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        let response = error_for_status("v0", response).await?;

        let chat: ChatDetail = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        if chat.id.is_empty() {
            return Err(ProviderError::InvalidResponse(
                "v0 response has no chat id".to_string(),
            ));
        }

        let demo_url = chat
            .demo
            .or_else(|| chat.latest_version.and_then(|v| v.demo_url))
            .filter(|url| !url.is_empty());

        Ok(GeneratedApp {
            id: chat.id,
            demo_url,
        })
    }
}

#[async_trait]
impl AppGenerator for V0Provider {
    async fn create_chat(&self, input: GenerationInput<'_>) -> Result<GeneratedApp, ProviderError> {
        let url = self.chats_url();
        self.post(&url, input).await
    }

    async fn send_message(
        &self,
        chat_id: &str,
        input: GenerationInput<'_>,
    ) -> Result<GeneratedApp, ProviderError> {
        let url = self.messages_url(chat_id);
        self.post(&url, input).await
    }
}

// ============================================================================
// v0 API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatMessageRequest<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<AttachmentRef>,
}

impl<'a> ChatMessageRequest<'a> {
    fn from_input(input: GenerationInput<'a>) -> Self {
        Self {
            message: input.message,
            attachments: input
                .attachment
                .map(|a| AttachmentRef {
                    url: a.to_data_url(),
                })
                .into_iter()
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct AttachmentRef {
    url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatDetail {
    #[serde(default)]
    id: String,
    #[serde(default)]
    demo: Option<String>,
    #[serde(default)]
    latest_version: Option<LatestVersion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LatestVersion {
    #[serde(default)]
    demo_url: Option<String>,
}
