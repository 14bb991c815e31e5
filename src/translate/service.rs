use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info};

use super::interface::Translator;
use crate::error::TranslationError;

/// Probe sent once at startup so an unusable backend fails the process early
const WARMUP_TEXT: &str = "नमस्ते";

/// Bounded, serialized access to the shared translation capability
#[derive(Clone)]
pub struct TranslationService {
    translator: Arc<dyn Translator>,
    max_length: usize,
    gate: Arc<Semaphore>,
}

impl TranslationService {
    pub fn new(translator: Arc<dyn Translator>, max_length: usize, max_concurrent: usize) -> Self {
        Self {
            translator,
            max_length,
            gate: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    /// Translate already segmented text. Empty input never reaches the backend.
    pub async fn translate(&self, text: &str) -> Result<String, TranslationError> {
        if text.is_empty() {
            return Ok(String::new());
        }

        let _permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| TranslationError(anyhow::anyhow!(e)))?;
        debug!("Translating {} chars (max_length={})", text.len(), self.max_length);
        let translated = self.translator.translate(text, self.max_length).await?;
        Ok(translated)
    }

    pub async fn warm_up(&self) -> Result<(), TranslationError> {
        let probe = self.translate(WARMUP_TEXT).await?;
        info!("Translation backend ready (probe: {:?})", probe);
        Ok(())
    }
}
