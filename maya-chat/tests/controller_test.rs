//! End-to-end tests of the chat controller against a stand-in relay.

use maya_chat::client::{ChatRoute, HttpRelayClient};
use maya_chat::controller::{InteractionController, Submission, SubmitOutcome};
use maya_chat::models::{Role, Session, Turn};
use maya_chat::store::{BlobStore, FileBlobStore, SessionStore, DEFAULT_HISTORY_KEY};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn controller_for(
    server: &MockServer,
    route: ChatRoute,
    dir: &TempDir,
) -> InteractionController<HttpRelayClient> {
    let client = HttpRelayClient::new(&server.uri(), route, Duration::from_secs(5)).unwrap();
    let mut store = SessionStore::new(Arc::new(FileBlobStore::new(dir.path())), DEFAULT_HISTORY_KEY);
    store.load();
    InteractionController::new(client, store, 500)
}

#[tokio::test]
async fn build_a_todo_app_creates_session_and_persists() {
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

    let dir = TempDir::new().unwrap();
    let controller = controller_for(&server, ChatRoute::AppBuilder, &dir);

    let outcome = controller
        .submit(Submission::text("Build a todo app with React"))
        .await;

    assert_eq!(
        outcome,
        SubmitOutcome::Replied(Turn::assistant("https://demo.example/chat_1"))
    );
    assert_eq!(
        controller.session().await,
        Some(Session::new("chat_1", Some("https://demo.example/chat_1".into())))
    );

    let raw = FileBlobStore::new(dir.path())
        .read(DEFAULT_HISTORY_KEY)
        .unwrap()
        .unwrap();
    let persisted: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        persisted,
        json!([
            { "type": "user", "content": "Build a todo app with React" },
            { "type": "assistant", "content": "https://demo.example/chat_1" }
        ])
    );
}

#[tokio::test]
async fn history_and_session_survive_restart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chat_7",
            "demo": "https://demo.example/chat_7"
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    {
        let controller = controller_for(&server, ChatRoute::AppBuilder, &dir);
        controller.submit(Submission::text("Make a landing page")).await;
    }

    let restarted = controller_for(&server, ChatRoute::AppBuilder, &dir);
    assert_eq!(restarted.history().await.len(), 2);
    assert_eq!(
        restarted.session().await.map(|s| s.id),
        Some("chat_7".to_string())
    );

    restarted.submit(Submission::text("make it blue")).await;

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    let continuation = String::from_utf8_lossy(&requests[1].body).into_owned();
    assert!(continuation.contains("name=\"chatId\""));
    assert!(continuation.contains("chat_7"));
}

#[tokio::test]
async fn relay_error_becomes_error_turn() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/gemini"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({ "error": "Missing GOOGLE_GENERATIVE_AI_API_KEY" })),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let controller = controller_for(&server, ChatRoute::Gemini, &dir);

    let outcome = controller.submit(Submission::text("hello")).await;

    let SubmitOutcome::Failed(turn) = outcome else {
        panic!("expected a failed outcome");
    };
    assert_eq!(turn.role(), Role::Assistant);
    assert_eq!(
        turn.content(),
        "Sorry, request failed. Failed to create chat (500): Missing GOOGLE_GENERATIVE_AI_API_KEY"
    );
    assert!(!controller.is_sending());
    assert_eq!(controller.history().await.len(), 2);
}

#[tokio::test]
async fn unreachable_relay_becomes_error_turn() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let dir = TempDir::new().unwrap();
    let client = HttpRelayClient::new(&uri, ChatRoute::Gemini, Duration::from_secs(2)).unwrap();
    let store = SessionStore::new(Arc::new(FileBlobStore::new(dir.path())), DEFAULT_HISTORY_KEY);
    let controller = InteractionController::new(client, store, 500);

    let outcome = controller.submit(Submission::text("hello")).await;

    assert!(matches!(outcome, SubmitOutcome::Failed(_)));
    assert!(outcome
        .turn()
        .map(|t| t.content().starts_with("Sorry, request failed."))
        .unwrap_or(false));
}

#[tokio::test]
async fn clear_removes_persisted_history() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/gemini"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "content": "hi" })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let controller = controller_for(&server, ChatRoute::Gemini, &dir);
    controller.submit(Submission::text("hello")).await;
    controller.reset().await;

    let restarted = controller_for(&server, ChatRoute::Gemini, &dir);
    assert!(restarted.history().await.is_empty());
    assert!(restarted.session().await.is_none());
}
