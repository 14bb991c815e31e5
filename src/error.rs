use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Failure while turning a saved upload into raw text
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("failed to read PDF: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("OCR engine failed: {0}")]
    Ocr(String),
    #[error("I/O error during extraction: {0}")]
    Io(#[from] std::io::Error),
    #[error("extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Failure reported by the translation capability
#[derive(Debug, Error)]
#[error("translation failed: {0:#}")]
pub struct TranslationError(pub anyhow::Error);

impl From<anyhow::Error> for TranslationError {
    fn from(err: anyhow::Error) -> Self {
        Self(err)
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unsupported source_lang. Use 'ne', 'nep', 'si', or 'sin'.")]
    InvalidLanguage(String),
    #[error("No file uploaded")]
    MissingFile,
    #[error("Empty filename")]
    EmptyFilename,
    #[error("Invalid multipart request")]
    InvalidMultipart(#[source] MultipartError),
    #[error("File too large")]
    FileTooLarge,
    #[error("No text detected")]
    NoTextDetected,
    #[error("Failed to store upload")]
    Upload(#[source] std::io::Error),
    #[error("Text extraction failed")]
    Extraction(#[from] ExtractionError),
    #[error("Translation failed")]
    Translation(#[from] TranslationError),
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        // The body limit surfaces while fields are being read
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::FileTooLarge
        } else {
            AppError::InvalidMultipart(err)
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidMultipart(e) => e.status(),
            AppError::FileTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::InvalidLanguage(_)
            | AppError::MissingFile
            | AppError::EmptyFilename
            | AppError::NoTextDetected => StatusCode::BAD_REQUEST,
            AppError::Upload(_) | AppError::Extraction(_) | AppError::Translation(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable machine-readable code for server-side failures
    pub fn code(&self) -> Option<&'static str> {
        match self {
            AppError::Upload(_) => Some("upload_failed"),
            AppError::Extraction(_) => Some("extraction_failed"),
            AppError::Translation(_) => Some("translation_failed"),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self.code() {
            Some(code) => {
                // Internal detail stays in the log
                match &self {
                    AppError::Upload(e) => error!("{}: {}", code, e),
                    AppError::Extraction(e) => error!("{}: {}", code, e),
                    AppError::Translation(e) => error!("{}: {}", code, e),
                    _ => {}
                }
                json!({ "error": self.to_string(), "code": code })
            }
            None => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}
