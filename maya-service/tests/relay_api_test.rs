//! End-to-end tests for the relay endpoints with the upstream providers faked
//! by wiremock.

mod common;

use common::{message_form, test_config, TestApp, Upstreams};
use reqwest::StatusCode;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn spawn_with(server: &MockServer, v0_key: Option<&'static str>, gemini_key: Option<&'static str>) -> TestApp {
    TestApp::spawn(test_config(&Upstreams {
        v0_base_url: server.uri(),
        v0_key,
        gemini_base_url: server.uri(),
        gemini_key,
    }))
    .await
}

#[tokio::test]
async fn build_todo_app_creates_new_chat() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chats"))
        .and(header("authorization", "Bearer v0-key"))
        .and(body_partial_json(json!({ "message": "Build a todo app" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chat_abc",
            "demo": "https://demo.v0.dev/chat_abc"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = spawn_with(&server, Some("v0-key"), None).await;
    let response = app.post_form("/api/chat", message_form("Build a todo app")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "id": "chat_abc", "demo": "https://demo.v0.dev/chat_abc" }));
}

#[tokio::test]
async fn chat_id_continues_the_same_upstream_chat() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chats/chat_abc/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chat_abc",
            "demo": "https://demo.v0.dev/chat_abc/v2"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chats"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let app = spawn_with(&server, Some("v0-key"), None).await;
    let form = message_form("Add a due date field").text("chatId", "chat_abc");
    let response = app.post_form("/api/chat", form).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["id"], "chat_abc");
    assert_eq!(body["demo"], "https://demo.v0.dev/chat_abc/v2");
}

#[tokio::test]
async fn file_only_submission_is_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chats"))
        .and(body_partial_json(json!({
            "attachments": [{ "url": "data:image/png;base64,iVBO" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "chat_img" })))
        .expect(1)
        .mount(&server)
        .await;

    let app = spawn_with(&server, Some("v0-key"), None).await;
    let part = reqwest::multipart::Part::bytes(vec![0x89, 0x50, 0x4e])
        .file_name("sketch.png")
        .mime_str("image/png")
        .unwrap();
    let form = reqwest::multipart::Form::new()
        .text("message", "")
        .part("file", part);
    let response = app.post_form("/api/chat", form).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["id"], "chat_img");
    assert!(body["demo"].is_null());
}

#[tokio::test]
async fn missing_v0_key_returns_500_without_upstream_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let app = spawn_with(&server, None, Some("g-key")).await;
    let response = app.post_form("/api/chat", message_form("Build a todo app")).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("V0_API_KEY"));
}

#[tokio::test]
async fn empty_submission_is_rejected_with_400() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let app = spawn_with(&server, Some("v0-key"), None).await;
    let response = app.post_form("/api/chat", message_form("   ")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Message or file is required");
}

#[tokio::test]
async fn overlong_message_is_rejected() {
    let server = MockServer::start().await;
    let app = spawn_with(&server, Some("v0-key"), None).await;

    let response = app
        .post_form("/api/chat", message_form(&"a".repeat(501)))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_upload_returns_413() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = test_config(&Upstreams {
        v0_base_url: server.uri(),
        v0_key: Some("v0-key"),
        gemini_base_url: server.uri(),
        gemini_key: None,
    });
    config.limits.max_upload_bytes = 1024;
    let app = TestApp::spawn(config).await;

    let file = reqwest::multipart::Part::bytes(vec![7u8; 8 * 1024])
        .file_name("mock.png")
        .mime_str("image/png")
        .unwrap();
    let form = message_form("Build this").part("file", file);
    let response = app.post_form("/api/chat", form).await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn upstream_failure_returns_generic_500() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chats"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .expect(1)
        .mount(&server)
        .await;

    let app = spawn_with(&server, Some("v0-key"), None).await;
    let response = app.post_form("/api/chat", message_form("hello")).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Failed to process request");
}

#[tokio::test]
async fn chat_status_reports_key_presence() {
    let server = MockServer::start().await;

    let app = spawn_with(&server, Some("v0-key"), None).await;
    let body: Value = app
        .client
        .get(app.url("/api/chat"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!({ "ok": true, "hasKey": true }));

    let app = spawn_with(&server, None, None).await;
    let body: Value = app
        .client
        .get(app.url("/api/chat"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!({ "ok": true, "hasKey": false }));
}

#[tokio::test]
async fn gemini_returns_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-flash:generateContent"))
        .and(header("x-goog-api-key", "g-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "Here is a plan." }] } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = spawn_with(&server, None, Some("g-key")).await;
    let response = app.post_form("/api/gemini", message_form("Plan a todo app")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "content": "Here is a plan." }));
}

#[tokio::test]
async fn gemini_missing_key_returns_500() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let app = spawn_with(&server, Some("v0-key"), None).await;
    let response = app.post_form("/api/gemini", message_form("hello")).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("GOOGLE_GENERATIVE_AI_API_KEY"));
}

#[tokio::test]
async fn gemini_requires_message() {
    let server = MockServer::start().await;
    let app = spawn_with(&server, None, Some("g-key")).await;

    let response = app.post_form("/api/gemini", message_form("")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Message is required");
}

#[tokio::test]
async fn gemini_upstream_failure_returns_500() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let app = spawn_with(&server, None, Some("g-key")).await;
    let response = app.post_form("/api/gemini", message_form("hello")).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Failed to process Gemini request");
}
