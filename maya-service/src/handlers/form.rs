//! Multipart form shared by the relay endpoints.

use crate::models::{AttachmentPayload, RelayRequest};
use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use service_core::error::AppError;
use validator::Validate;

/// Fields accepted by the relay endpoints: `message`, `chatId`, `file`.
#[derive(Debug, Default, Validate)]
pub struct RelayForm {
    pub message: String,

    #[validate(length(min = 1, max = 256))]
    pub chat_id: Option<String>,

    #[validate(length(max = 255))]
    pub file_name: Option<String>,

    pub file: Option<AttachmentPayload>,
}

impl RelayForm {
    /// Read and validate the form. Unknown fields are skipped.
    pub async fn from_multipart(
        mut multipart: Multipart,
        max_message_chars: u64,
    ) -> Result<Self, AppError> {
        let mut form = RelayForm::default();

        while let Some(field) = multipart.next_field().await.map_err(form_error)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "message" => form.message = field.text().await.map_err(form_error)?,
                "chatId" => {
                    let chat_id = field.text().await.map_err(form_error)?;
                    let chat_id = chat_id.trim();
                    if !chat_id.is_empty() {
                        form.chat_id = Some(chat_id.to_string());
                    }
                }
                "file" => {
                    let file_name = field.file_name().map(str::to_string);
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await.map_err(form_error)?;
                    if !bytes.is_empty() {
                        form.file_name = file_name.clone();
                        form.file = Some(AttachmentPayload::new(
                            bytes.to_vec(),
                            content_type,
                            file_name,
                        ));
                    }
                }
                other => tracing::debug!(field = %other, "Ignoring unknown form field"),
            }
        }

        form.validate()?;

        let message_chars = form.message.trim().chars().count() as u64;
        if message_chars > max_message_chars {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Message exceeds {} characters",
                max_message_chars
            )));
        }

        Ok(form)
    }

    pub fn into_relay_request(self) -> RelayRequest {
        RelayRequest {
            message: self.message,
            attachment: self.file,
            continuation_id: self.chat_id,
        }
    }
}

fn form_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Uploaded file is too large".to_string())
    } else {
        AppError::BadRequest(anyhow::anyhow!("Invalid form data: {}", err.body_text()))
    }
}
