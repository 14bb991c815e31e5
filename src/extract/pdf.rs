use async_trait::async_trait;
use lopdf::Document;
use std::path::Path;
use tracing::debug;

use super::interface::PdfTextReader;
use crate::error::ExtractionError;

/// Page-by-page PDF text extraction backed by `lopdf`
pub struct LopdfReader;

impl LopdfReader {
    pub fn read_pages(path: &Path) -> Result<Vec<String>, ExtractionError> {
        let document = Document::load(path)?;
        let pages = document.get_pages();
        debug!("PDF {} has {} pages", path.display(), pages.len());

        let mut texts = Vec::with_capacity(pages.len());
        for page_number in pages.keys() {
            texts.push(document.extract_text(&[*page_number])?);
        }
        Ok(texts)
    }
}

#[async_trait]
impl PdfTextReader for LopdfReader {
    async fn page_texts(&self, path: &Path) -> Result<Vec<String>, ExtractionError> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || Self::read_pages(&path)).await?
    }
}
