//! Binary attachment forwarded with a single relay call.

use base64::{engine::general_purpose::STANDARD, Engine as _};

const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";

/// A file uploaded alongside a prompt. Lives only for the duration of one
/// relay call and is never persisted.
#[derive(Debug, Clone)]
pub struct AttachmentPayload {
    pub bytes: Vec<u8>,
    pub media_type: String,
    pub file_name: Option<String>,
}

impl AttachmentPayload {
    pub fn new(bytes: Vec<u8>, media_type: Option<String>, file_name: Option<String>) -> Self {
        Self {
            bytes,
            media_type: media_type
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_MEDIA_TYPE.to_string()),
            file_name,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Standard base64 of the raw bytes.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// `data:` URL form, for providers that take attachments by URL.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.to_base64())
    }
}
