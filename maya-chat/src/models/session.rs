use serde::{Deserialize, Serialize};

const PLACEHOLDER_ID: &str = "local";

/// Continuation handle issued by the upstream provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
}

impl Session {
    pub fn new(id: impl Into<String>, preview_url: Option<String>) -> Self {
        Self {
            id: id.into(),
            preview_url,
        }
    }

    /// Local stand-in used until the upstream assigns a real id.
    pub fn placeholder() -> Self {
        Self::new(PLACEHOLDER_ID, None)
    }

    pub fn is_placeholder(&self) -> bool {
        self.id == PLACEHOLDER_ID || self.id.is_empty()
    }

    /// Id to send upstream to continue this session, if it has one.
    pub fn continuation_id(&self) -> Option<&str> {
        (!self.is_placeholder()).then_some(self.id.as_str())
    }
}
