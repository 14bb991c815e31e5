use async_trait::async_trait;
use std::path::Path;

use crate::error::ExtractionError;

/// How a saved upload is turned into text, decided by its filename
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Image,
}

impl DocumentKind {
    pub fn from_filename(filename: &str) -> Self {
        if filename.to_lowercase().ends_with(".pdf") {
            DocumentKind::Pdf
        } else {
            DocumentKind::Image
        }
    }
}

/// PDF text capability
#[async_trait]
pub trait PdfTextReader: Send + Sync {
    /// Text of every page in page order. Pages without text yield an empty
    /// string rather than an error.
    async fn page_texts(&self, path: &Path) -> Result<Vec<String>, ExtractionError>;
}

/// OCR capability
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Recognize the text of the image at `path`
    ///
    /// # Arguments
    /// * `path` - Image file on disk
    /// * `language_hint` - OCR language model name, e.g. `nep`
    async fn recognize(&self, path: &Path, language_hint: &str) -> Result<String, ExtractionError>;
}
