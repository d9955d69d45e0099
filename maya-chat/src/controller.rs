//! Submission lifecycle: Idle -> Sending -> Idle.
//!
//! The controller owns the session store and the relay client. At most one
//! submission is in flight; a second one arriving meanwhile is rejected.

use crate::client::{RelayCall, RelayClient, RelayReply};
use crate::models::{Attachment, Session, Turn};
use crate::store::SessionStore;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::Mutex;

pub const NO_TEXT_RESPONSE: &str = "No response from Gemini.";
const FAILURE_PREFIX: &str = "Sorry, request failed.";

#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub message: String,
    pub attachment: Option<Attachment>,
}

impl Submission {
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Sending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Blank message and no attachment.
    Empty,
    /// Another submission is still in flight.
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Ignored(IgnoreReason),
    /// The assistant turn appended for a successful relay.
    Replied(Turn),
    /// The error turn appended for a failed relay.
    Failed(Turn),
    /// The chat was reset while the relay was in flight; the reply was dropped.
    Discarded,
}

impl SubmitOutcome {
    pub fn turn(&self) -> Option<&Turn> {
        match self {
            SubmitOutcome::Replied(turn) | SubmitOutcome::Failed(turn) => Some(turn),
            SubmitOutcome::Ignored(_) | SubmitOutcome::Discarded => None,
        }
    }
}

/// Clears the in-flight flag when the submission ends, however it ends.
struct FlightGuard<'a>(&'a AtomicBool);

impl<'a> FlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlightGuard(flag))
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct InteractionController<C: RelayClient> {
    client: C,
    store: Mutex<SessionStore>,
    in_flight: AtomicBool,
    /// Bumped by every reset. Replies started under an older value are dropped.
    epoch: AtomicU64,
    max_message_chars: usize,
}

impl<C: RelayClient> InteractionController<C> {
    pub fn new(client: C, store: SessionStore, max_message_chars: usize) -> Self {
        Self {
            client,
            store: Mutex::new(store),
            in_flight: AtomicBool::new(false),
            epoch: AtomicU64::new(0),
            max_message_chars,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.is_sending() {
            Phase::Sending
        } else {
            Phase::Idle
        }
    }

    pub fn is_sending(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub async fn session(&self) -> Option<Session> {
        self.store.lock().await.session().cloned()
    }

    pub async fn history(&self) -> Vec<Turn> {
        self.store.lock().await.all().to_vec()
    }

    /// Clear history and session. A submission still in flight completes, but
    /// its reply is discarded.
    pub async fn reset(&self) {
        let mut store = self.store.lock().await;
        self.epoch.fetch_add(1, Ordering::AcqRel);
        store.clear();
        tracing::info!("Chat history cleared");
    }

    #[tracing::instrument(skip(self, submission), fields(has_attachment = submission.attachment.is_some()))]
    pub async fn submit(&self, submission: Submission) -> SubmitOutcome {
        let message = submission.message.trim();
        let attachment = submission.attachment.filter(|a| !a.is_empty());

        if message.is_empty() && attachment.is_none() {
            return SubmitOutcome::Ignored(IgnoreReason::Empty);
        }

        let Some(_guard) = FlightGuard::acquire(&self.in_flight) else {
            tracing::debug!("Submission rejected, another one is in flight");
            return SubmitOutcome::Ignored(IgnoreReason::Busy);
        };

        let message: String = message.chars().take(self.max_message_chars).collect();
        let user_content = match (&attachment, message.is_empty()) {
            (Some(file), true) => format!("[attachment: {}]", file.file_name),
            _ => message.clone(),
        };

        let (continuation_id, started_epoch) = {
            let mut store = self.store.lock().await;
            let started_epoch = self.epoch.load(Ordering::Acquire);
            store.append(Turn::user(user_content));
            let continuation_id = match store.session() {
                Some(session) => session.continuation_id().map(str::to_string),
                None => {
                    store.set_session(Session::placeholder());
                    None
                }
            };
            (continuation_id, started_epoch)
        };

        // The store lock is not held across the network call.
        let result = self
            .client
            .relay(RelayCall {
                message,
                attachment,
                continuation_id,
            })
            .await;

        let mut store = self.store.lock().await;
        if self.epoch.load(Ordering::Acquire) != started_epoch {
            tracing::info!("Chat was reset during the request; dropping reply");
            return SubmitOutcome::Discarded;
        }

        match result {
            Ok(RelayReply::Text(text)) => {
                let content = if text.trim().is_empty() {
                    NO_TEXT_RESPONSE.to_string()
                } else {
                    text
                };
                let turn = Turn::assistant(content);
                store.append(turn.clone());
                SubmitOutcome::Replied(turn)
            }
            Ok(RelayReply::Preview { id, preview_url }) => {
                let content = preview_url
                    .clone()
                    .unwrap_or_else(|| format!("Chat {} updated, no preview available.", id));
                tracing::info!(chat_id = %id, preview_url = ?preview_url, "Session updated");
                store.set_session(Session::new(id, preview_url));
                let turn = Turn::assistant(content);
                store.append(turn.clone());
                SubmitOutcome::Replied(turn)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Relay request failed");
                let turn = Turn::assistant(format!("{} {}", FAILURE_PREFIX, e));
                store.append(turn.clone());
                SubmitOutcome::Failed(turn)
            }
        }
    }
}
