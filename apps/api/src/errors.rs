use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::evaluation::group_evaluator::GroupError;
use crate::extraction::ExtractionError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every evaluation is all-or-nothing: any of these ends the request without a result.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Max retries reached for rule group '{group}' ({attempts} attempts)")]
    GroupExhausted { group: &'static str, attempts: u32 },

    #[error("Merge integrity error: {0}")]
    MergeIntegrity(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<GroupError> for AppError {
    fn from(e: GroupError) -> Self {
        match e {
            GroupError::Exhausted {
                group,
                attempts,
                last_error,
            } => {
                error!("Rule group '{group}' exhausted {attempts} attempts; last error: {last_error}");
                AppError::GroupExhausted { group, attempts }
            }
            other => AppError::Internal(other.into()),
        }
    }
}

impl From<ExtractionError> for AppError {
    fn from(e: ExtractionError) -> Self {
        match e {
            ExtractionError::UnsupportedFormat(format) => AppError::UnsupportedFormat(format!(
                "'{format}' documents are not supported; upload a PDF or plain-text file"
            )),
            other => AppError::Extraction(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, category, message) = match &self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "input",
                msg.clone(),
            ),
            AppError::UnsupportedFormat(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_FORMAT",
                "input",
                msg.clone(),
            ),
            AppError::Extraction(msg) => {
                tracing::warn!("Extraction error: {msg}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "EXTRACTION_ERROR",
                    "input",
                    "Failed to parse or read resume.".to_string(),
                )
            }
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                "input",
                msg.clone(),
            ),
            AppError::GroupExhausted { group, attempts } => {
                error!("Evaluation failed: group '{group}' exhausted {attempts} attempts");
                (
                    StatusCode::BAD_GATEWAY,
                    "GROUP_EXHAUSTED",
                    "upstream",
                    format!(
                        "Failed to evaluate resume: the '{group}' rules could not be graded \
                        after {attempts} attempts."
                    ),
                )
            }
            AppError::MergeIntegrity(msg) => {
                error!("Merge integrity error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "MERGE_INTEGRITY",
                    "integration",
                    "Failed to evaluate resume: the grading service returned an incomplete rule set."
                        .to_string(),
                )
            }
            AppError::Internal(e) => {
                error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "internal",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "category": category,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
