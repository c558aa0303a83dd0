// Resume text extraction.
// Turns uploaded bytes into plain text ready for evaluation. PDF decoding is CPU-bound
// and runs inside tokio::task::spawn_blocking.

pub mod handlers;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to decode {format} document: {reason}")]
    Decode {
        format: DocumentFormat,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    #[serde(rename = "text")]
    PlainText,
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentFormat::Pdf => write!(f, "PDF"),
            DocumentFormat::PlainText => write!(f, "plain-text"),
        }
    }
}

impl DocumentFormat {
    /// Resolves the format from the declared content type, falling back to the file
    /// extension when the type is missing or generic.
    pub fn detect(
        content_type: Option<&str>,
        file_name: Option<&str>,
    ) -> Result<Self, ExtractionError> {
        let mime = content_type
            .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase())
            .filter(|ct| !ct.is_empty() && ct != "application/octet-stream");
        let extension = file_name
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase());

        match (mime.as_deref(), extension.as_deref()) {
            (Some("application/pdf"), _) | (None, Some("pdf")) => Ok(DocumentFormat::Pdf),
            (Some("text/plain") | Some("text/markdown"), _) | (None, Some("txt" | "md")) => {
                Ok(DocumentFormat::PlainText)
            }
            (Some(DOCX_MIME), _) | (None, Some("docx")) => {
                Err(ExtractionError::UnsupportedFormat("docx".to_string()))
            }
            (Some(other), _) => Err(ExtractionError::UnsupportedFormat(other.to_string())),
            (None, Some(other)) => Err(ExtractionError::UnsupportedFormat(other.to_string())),
            (None, None) => Err(ExtractionError::UnsupportedFormat("unknown".to_string())),
        }
    }
}

/// Decodes `bytes` as `format` and returns normalized text.
pub async fn extract_text(bytes: Bytes, format: DocumentFormat) -> Result<String, ExtractionError> {
    let raw = match format {
        DocumentFormat::Pdf => {
            // pdf-extract may panic on malformed input; the join error covers that.
            tokio::task::spawn_blocking(move || {
                pdf_extract::extract_text_from_mem(&bytes).map_err(|e| e.to_string())
            })
            .await
            .map_err(|e| ExtractionError::Decode {
                format,
                reason: format!("decoder task failed: {e}"),
            })?
            .map_err(|reason| ExtractionError::Decode { format, reason })?
        }
        DocumentFormat::PlainText => {
            String::from_utf8(bytes.to_vec()).map_err(|e| ExtractionError::Decode {
                format,
                reason: e.to_string(),
            })?
        }
    };

    let text = normalize_text(&raw);
    debug!("Extracted {} chars from {format} upload", text.chars().count());
    Ok(text)
}

/// Unifies line endings, strips a BOM and trailing spaces, and collapses runs of
/// blank lines to one.
pub fn normalize_text(raw: &str) -> String {
    let unified = raw.trim_start_matches('\u{feff}').replace("\r\n", "\n").replace('\r', "\n");

    let mut out = String::with_capacity(unified.len());
    let mut blank_run = 0;
    for line in unified.lines().map(str::trim_end) {
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }

    out.trim().to_string()
}
