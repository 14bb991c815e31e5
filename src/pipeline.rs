use serde::Serialize;
use std::fmt;
use tracing::{debug, info, instrument, warn};

use crate::error::AppError;
use crate::extract::Extractor;
use crate::language::SourceLanguage;
use crate::segment::SegmenterRegistry;
use crate::translate::TranslationService;
use crate::upload::{SavedUpload, UploadForm, UploadStore};
use crate::utils::clean_text;

/// Progress of one extraction request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RequestStage {
    Received,
    Validated,
    Saved,
    Extracted,
    Cleaned,
    Segmented,
    Translated,
    Responded,
}

impl fmt::Display for RequestStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The only externally visible output of a successful request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslationResult {
    pub source_lang: SourceLanguage,
    pub extracted_text: String,
    pub translated_text: String,
}

/// Extract → clean → segment → translate, with the upload removed before
/// any outcome is handed back.
#[derive(Clone)]
pub struct Pipeline {
    uploads: UploadStore,
    extractor: Extractor,
    segmenters: SegmenterRegistry,
    translation: TranslationService,
}

impl Pipeline {
    pub fn new(
        uploads: UploadStore,
        extractor: Extractor,
        segmenters: SegmenterRegistry,
        translation: TranslationService,
    ) -> Self {
        Self {
            uploads,
            extractor,
            segmenters,
            translation,
        }
    }

    pub fn uploads(&self) -> &UploadStore {
        &self.uploads
    }

    #[instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4().simple()))]
    pub async fn handle(&self, form: UploadForm) -> Result<TranslationResult, AppError> {
        let mut stage = RequestStage::Received;

        // Nothing touches the disk until validation passes
        let (language, file) = form.validate().map_err(|e| {
            warn!("Rejected request at {}: {}", stage, e);
            e
        })?;
        advance(&mut stage, RequestStage::Validated);

        let upload = self.uploads.save(&file).await.map_err(AppError::Upload)?;
        drop(file);
        advance(&mut stage, RequestStage::Saved);

        let outcome = self.process(&upload, language, &mut stage).await;
        upload.remove().await;

        match &outcome {
            Ok(_) => {
                advance(&mut stage, RequestStage::Responded);
                info!("Request for {} completed", language);
            }
            Err(e) => warn!("Request for {} failed after {}: {}", language, stage, e),
        }
        outcome
    }

    async fn process(
        &self,
        upload: &SavedUpload,
        language: SourceLanguage,
        stage: &mut RequestStage,
    ) -> Result<TranslationResult, AppError> {
        let family = language.family();

        let raw = self
            .extractor
            .extract(upload.path(), upload.kind(), family)
            .await?;
        advance(stage, RequestStage::Extracted);

        let extracted_text = clean_text(&raw);
        advance(stage, RequestStage::Cleaned);
        if extracted_text.is_empty() {
            return Err(AppError::NoTextDetected);
        }

        let segmented = self.segmenters.segment(family, &extracted_text);
        advance(stage, RequestStage::Segmented);

        let translated_text = self.translation.translate(&segmented).await?;
        advance(stage, RequestStage::Translated);

        Ok(TranslationResult {
            source_lang: language,
            extracted_text,
            translated_text,
        })
    }
}

fn advance(stage: &mut RequestStage, next: RequestStage) {
    debug!("{} -> {}", stage, next);
    *stage = next;
}
