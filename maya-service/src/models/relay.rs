use super::AttachmentPayload;
use std::fmt;

/// Which upstream a relay call goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayTarget {
    /// Hosted app generation (v0). Produces a chat id and a demo preview.
    AppBuilder,
    /// Hosted generative text (Gemini). Produces plain text.
    Text,
}

impl RelayTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelayTarget::AppBuilder => "app_builder",
            RelayTarget::Text => "text",
        }
    }
}

impl fmt::Display for RelayTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One user submission to relay upstream.
#[derive(Debug, Clone, Default)]
pub struct RelayRequest {
    pub message: String,
    pub attachment: Option<AttachmentPayload>,
    /// Upstream session to continue. `None` starts a new one.
    pub continuation_id: Option<String>,
}

impl RelayRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_attachment(mut self, attachment: AttachmentPayload) -> Self {
        self.attachment = Some(attachment);
        self
    }

    pub fn continuing(mut self, continuation_id: impl Into<String>) -> Self {
        self.continuation_id = Some(continuation_id.into());
        self
    }

    /// Attachment, if one was sent with any content.
    pub fn attachment(&self) -> Option<&AttachmentPayload> {
        self.attachment.as_ref().filter(|a| !a.is_empty())
    }
}

/// Normalized upstream result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    Preview {
        id: String,
        preview_url: Option<String>,
    },
    Text {
        text: String,
    },
}
