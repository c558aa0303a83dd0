use axum::{extract::Multipart, Json};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::extraction::{extract_text, DocumentFormat};

/// Shorter extractions are treated as scanned or empty documents.
const MIN_MEANINGFUL_CHARS: usize = 10;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub text: String,
    pub format: DocumentFormat,
    pub characters: usize,
}

/// POST /api/v1/upload
/// Multipart form with a single `file` field.
pub async fn handle_upload(mut multipart: Multipart) -> Result<Json<UploadResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart upload: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let format = DocumentFormat::detect(field.content_type(), field.file_name())?;
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read uploaded file: {e}")))?;

        info!("Extracting text from '{file_name}' ({} bytes, {format})", bytes.len());
        let text = extract_text(bytes, format).await?;

        let characters = text.chars().count();
        if characters < MIN_MEANINGFUL_CHARS {
            return Err(AppError::UnprocessableEntity(
                "Unable to extract meaningful content".to_string(),
            ));
        }

        return Ok(Json(UploadResponse {
            text,
            format,
            characters,
        }));
    }

    Err(AppError::Validation(
        "Missing 'file' field in upload.".to_string(),
    ))
}
