use serde::{Deserialize, Serialize};

/// Response of `POST /api/chat`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatResponse {
    /// Upstream chat id; send it back as `chatId` to continue.
    pub id: String,
    /// Demo preview URL, `null` when the upstream produced none.
    pub demo: Option<String>,
}

/// Response of `GET /api/chat`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatStatusResponse {
    pub ok: bool,
    pub has_key: bool,
}

/// Response of `POST /api/gemini`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeminiResponse {
    pub content: String,
}
