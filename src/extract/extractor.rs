use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use super::interface::{DocumentKind, OcrEngine, PdfTextReader};
use crate::error::ExtractionError;
use crate::language::LanguageFamily;

/// Routes a saved upload to PDF extraction or OCR
#[derive(Clone)]
pub struct Extractor {
    pdf: Arc<dyn PdfTextReader>,
    ocr: Arc<dyn OcrEngine>,
}

impl Extractor {
    pub fn new(pdf: Arc<dyn PdfTextReader>, ocr: Arc<dyn OcrEngine>) -> Self {
        Self { pdf, ocr }
    }

    /// Produce the raw (uncleaned) text of the file at `path`
    pub async fn extract(
        &self,
        path: &Path,
        kind: DocumentKind,
        family: LanguageFamily,
    ) -> Result<String, ExtractionError> {
        match kind {
            DocumentKind::Pdf => {
                let pages = self.pdf.page_texts(path).await?;
                let mut text = String::new();
                for page in pages.iter().filter(|page| !page.is_empty()) {
                    text.push_str(page);
                    text.push('\n');
                }
                debug!("Extracted {} chars from {} PDF pages", text.len(), pages.len());
                Ok(text)
            }
            DocumentKind::Image => {
                let hint = family.ocr_hint();
                let text = self.ocr.recognize(path, hint).await?;
                debug!("OCR ({}) recognized {} chars", hint, text.len());
                Ok(text)
            }
        }
    }
}
