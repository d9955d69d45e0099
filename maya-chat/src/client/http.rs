//! HTTP relay client speaking the maya-service form API.

use super::{ChatRoute, ClientError, RelayCall, RelayClient, RelayReply};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use service_core::observability::TracedClientExt;
use std::time::Duration;

pub struct HttpRelayClient {
    client: reqwest::Client,
    base_url: String,
    route: ChatRoute,
}

impl HttpRelayClient {
    pub fn new(base_url: &str, route: ChatRoute, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            route,
        })
    }

    fn build_form(&self, call: RelayCall) -> Result<Form, ClientError> {
        let mut form = Form::new().text("message", call.message);

        if let (ChatRoute::AppBuilder, Some(chat_id)) = (self.route, call.continuation_id) {
            form = form.text("chatId", chat_id);
        }

        if let Some(attachment) = call.attachment.filter(|a| !a.is_empty()) {
            let part = Part::bytes(attachment.bytes)
                .file_name(attachment.file_name)
                .mime_str(&attachment.media_type)
                .map_err(|e| ClientError::InvalidResponse(format!("Invalid media type: {}", e)))?;
            form = form.part("file", part);
        }

        Ok(form)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TextBody {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PreviewBody {
    id: String,
    #[serde(default)]
    demo: Option<String>,
}

#[async_trait]
impl RelayClient for HttpRelayClient {
    async fn relay(&self, call: RelayCall) -> Result<RelayReply, ClientError> {
        let url = format!("{}{}", self.base_url, self.route.path());
        let form = self.build_form(call)?;

        let request = self.client.traced_post(&url).multipart(form);
        tracing::debug!(url = %url, request_id = %request.request_id(), "Sending relay request");

        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorBody>(&raw)
                .ok()
                .and_then(|b| b.error)
                .unwrap_or(raw);
            return Err(ClientError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        match self.route {
            ChatRoute::Gemini => {
                let body: TextBody = response
                    .json()
                    .await
                    .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
                Ok(RelayReply::Text(body.content.unwrap_or_default()))
            }
            ChatRoute::AppBuilder => {
                let body: PreviewBody = response
                    .json()
                    .await
                    .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
                Ok(RelayReply::Preview {
                    id: body.id,
                    preview_url: body.demo.filter(|d| !d.is_empty()),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Attachment;
    use serde_json::json;
    use wiremock::matchers::{header_exists, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn body_text(request: &Request) -> String {
        String::from_utf8_lossy(&request.body).into_owned()
    }

    #[tokio::test]
    async fn gemini_route_posts_message_and_reads_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/gemini"))
            .and(header_exists("x-request-id"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "content": "hi!" })))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            HttpRelayClient::new(&server.uri(), ChatRoute::Gemini, Duration::from_secs(5)).unwrap();
        let reply = client
            .relay(RelayCall {
                message: "hello".into(),
                // Gemini chats never send a continuation id.
                continuation_id: Some("chat_1".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(reply, RelayReply::Text("hi!".into()));

        let requests = server.received_requests().await.unwrap();
        let body = body_text(&requests[0]);
        assert!(body.contains("name=\"message\""));
        assert!(body.contains("hello"));
        assert!(!body.contains("chatId"));
    }

    #[tokio::test]
    async fn app_builder_route_sends_chat_id_and_file() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chat_1",
                "demo": "https://demo.example/chat_1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            HttpRelayClient::new(&server.uri(), ChatRoute::AppBuilder, Duration::from_secs(5))
                .unwrap();
        let reply = client
            .relay(RelayCall {
                message: "add a footer".into(),
                attachment: Some(Attachment::new(vec![1, 2, 3], "image/png", "mock.png")),
                continuation_id: Some("chat_1".into()),
            })
            .await
            .unwrap();

        assert_eq!(
            reply,
            RelayReply::Preview {
                id: "chat_1".into(),
                preview_url: Some("https://demo.example/chat_1".into()),
            }
        );

        let requests = server.received_requests().await.unwrap();
        let body = body_text(&requests[0]);
        assert!(body.contains("name=\"chatId\""));
        assert!(body.contains("filename=\"mock.png\""));
    }

    #[tokio::test]
    async fn error_status_carries_error_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(json!({ "error": "Failed to process Gemini request" })),
            )
            .mount(&server)
            .await;

        let client =
            HttpRelayClient::new(&server.uri(), ChatRoute::Gemini, Duration::from_secs(5)).unwrap();
        let err = client
            .relay(RelayCall {
                message: "hello".into(),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Failed to create chat (500): Failed to process Gemini request"
        );
    }

    #[tokio::test]
    async fn non_json_error_body_is_used_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let client =
            HttpRelayClient::new(&server.uri(), ChatRoute::Gemini, Duration::from_secs(5)).unwrap();
        let err = client
            .relay(RelayCall {
                message: "hello".into(),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Status { status: 502, ref detail } if detail == "upstream down"));
    }
}
