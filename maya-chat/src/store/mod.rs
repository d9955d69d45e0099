//! Persisted chat history.
//!
//! The store owns the ordered turn list and the active session handle and
//! mirrors both into a [`BlobStore`]. Persistence is best-effort: a failed
//! write is logged and the in-memory state stays authoritative.

pub mod blob;
pub mod error;

pub use blob::{BlobStore, FileBlobStore, MemoryBlobStore};
pub use error::{PersistenceError, PersistenceResult};

use crate::models::{Session, Turn};
use std::sync::Arc;

/// Blob key of the turn list.
pub const DEFAULT_HISTORY_KEY: &str = "chatHistory";

pub struct SessionStore {
    blob: Arc<dyn BlobStore>,
    key: String,
    turns: Vec<Turn>,
    session: Option<Session>,
}

impl SessionStore {
    /// An empty store writing under `key`. Call [`SessionStore::load`] to
    /// restore earlier state.
    pub fn new(blob: Arc<dyn BlobStore>, key: impl Into<String>) -> Self {
        Self {
            blob,
            key: key.into(),
            turns: Vec::new(),
            session: None,
        }
    }

    fn session_key(&self) -> String {
        format!("{}_session", self.key)
    }

    /// Restore turns and session from the blob store.
    ///
    /// Absent or malformed blobs yield empty state; this never fails.
    /// Returns the number of turns restored.
    pub fn load(&mut self) -> usize {
        self.turns = self.read_json(&self.key.clone()).unwrap_or_default();
        self.session = self.read_json(&self.session_key());

        tracing::debug!(
            key = %self.key,
            turns = self.turns.len(),
            has_session = self.session.is_some(),
            "Loaded chat history"
        );
        self.turns.len()
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.blob.read(key) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Ignoring malformed persisted blob");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to read persisted blob");
                None
            }
        }
    }

    /// Write turns and session to the blob store.
    ///
    /// An empty history is not written, so a fresh store never creates a blob.
    pub fn save(&self) -> PersistenceResult<()> {
        if self.turns.is_empty() {
            return Ok(());
        }

        let history = serde_json::to_string(&self.turns)?;
        self.blob.write(&self.key, &history)?;

        match &self.session {
            Some(session) => {
                let session = serde_json::to_string(session)?;
                self.blob.write(&self.session_key(), &session)
            }
            None => self.blob.remove(&self.session_key()),
        }
    }

    /// Append a turn and persist. A persistence failure is logged, not returned.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
        self.save_best_effort();
    }

    /// All turns, oldest first.
    pub fn all(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Replace the active session handle and persist.
    pub fn set_session(&mut self, session: Session) {
        self.session = Some(session);
        self.save_best_effort();
    }

    /// Drop every turn and the session, and remove the persisted blobs.
    pub fn clear(&mut self) {
        self.turns.clear();
        self.session = None;

        for key in [self.key.clone(), self.session_key()] {
            if let Err(e) = self.blob.remove(&key) {
                tracing::warn!(key = %key, error = %e, "Failed to remove persisted blob");
            }
        }
    }

    fn save_best_effort(&self) {
        if let Err(e) = self.save() {
            tracing::warn!(
                key = %self.key,
                error = %e,
                "Failed to persist chat history; continuing in memory"
            );
        }
    }
}
