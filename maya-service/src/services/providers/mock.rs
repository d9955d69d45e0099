//! Mock provider implementations for testing.

use super::{AppGenerator, GenerationInput, GeneratedApp, ProviderError, TextProvider};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A call observed by a mock provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub chat_id: Option<String>,
    pub message: String,
    pub attachment_len: Option<usize>,
}

impl RecordedCall {
    fn new(chat_id: Option<&str>, input: GenerationInput<'_>) -> Self {
        Self {
            chat_id: chat_id.map(str::to_string),
            message: input.message.to_string(),
            attachment_len: input.attachment.map(|a| a.bytes.len()),
        }
    }
}

#[derive(Default)]
struct CallLog {
    count: AtomicUsize,
    calls: Mutex<Vec<RecordedCall>>,
}

impl CallLog {
    fn record(&self, call: RecordedCall) {
        self.count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

/// Mock app generator. New chats get ids `mock-chat-1`, `mock-chat-2`, ...
pub struct MockAppGenerator {
    fail_with_status: Option<u16>,
    log: CallLog,
}

impl MockAppGenerator {
    pub fn new() -> Self {
        Self {
            fail_with_status: None,
            log: CallLog::default(),
        }
    }

    /// A generator whose every call fails with the given upstream status.
    pub fn failing(status: u16) -> Self {
        Self {
            fail_with_status: Some(status),
            log: CallLog::default(),
        }
    }

    pub fn call_count(&self) -> usize {
        self.log.count.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.log.calls()
    }

    fn respond(&self, chat_id: Option<&str>) -> Result<GeneratedApp, ProviderError> {
        if let Some(status) = self.fail_with_status {
            return Err(ProviderError::Api {
                status,
                message: "mock upstream failure".to_string(),
            });
        }

        let id = chat_id
            .map(str::to_string)
            .unwrap_or_else(|| format!("mock-chat-{}", self.call_count()));

        Ok(GeneratedApp {
            demo_url: Some(format!("https://demo.example/{}", id)),
            id,
        })
    }
}

impl Default for MockAppGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AppGenerator for MockAppGenerator {
    async fn create_chat(&self, input: GenerationInput<'_>) -> Result<GeneratedApp, ProviderError> {
        self.log.record(RecordedCall::new(None, input));
        self.respond(None)
    }

    async fn send_message(
        &self,
        chat_id: &str,
        input: GenerationInput<'_>,
    ) -> Result<GeneratedApp, ProviderError> {
        self.log.record(RecordedCall::new(Some(chat_id), input));
        self.respond(Some(chat_id))
    }
}

/// Mock text provider. Echoes the prompt unless a fixed reply is set.
pub struct MockTextProvider {
    reply: Option<String>,
    fail_with_status: Option<u16>,
    log: CallLog,
}

impl MockTextProvider {
    pub fn new() -> Self {
        Self {
            reply: None,
            fail_with_status: None,
            log: CallLog::default(),
        }
    }

    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            ..Self::new()
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            fail_with_status: Some(status),
            ..Self::new()
        }
    }

    pub fn call_count(&self) -> usize {
        self.log.count.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.log.calls()
    }
}

impl Default for MockTextProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(&self, input: GenerationInput<'_>) -> Result<String, ProviderError> {
        self.log.record(RecordedCall::new(None, input));

        if let Some(status) = self.fail_with_status {
            return Err(ProviderError::Api {
                status,
                message: "mock upstream failure".to_string(),
            });
        }

        Ok(self
            .reply
            .clone()
            .unwrap_or_else(|| format!("Mock response for: {}", input.message)))
    }
}
