/// Translate interface - the model itself runs behind an HTTP service

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Opaque sequence-to-sequence translation capability
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` and return the first candidate
    ///
    /// # Arguments
    /// * `text` - Cleaned, segmented source text (never empty)
    /// * `max_length` - Length bound handed to the model
    async fn translate(&self, text: &str, max_length: usize) -> Result<String, anyhow::Error>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationCandidate {
    pub translation_text: String,
}

/// Response shapes returned by translation pipelines
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TranslateResponse {
    Candidates(Vec<TranslationCandidate>),
    Single(TranslationCandidate),
    Error { error: String },
}

impl TranslateResponse {
    pub fn into_first(self) -> Result<String, anyhow::Error> {
        match self {
            TranslateResponse::Candidates(candidates) => candidates
                .into_iter()
                .next()
                .map(|c| c.translation_text)
                .ok_or_else(|| anyhow::anyhow!("translation service returned no candidates")),
            TranslateResponse::Single(candidate) => Ok(candidate.translation_text),
            TranslateResponse::Error { error } => {
                Err(anyhow::anyhow!("translation service error: {}", error))
            }
        }
    }
}
