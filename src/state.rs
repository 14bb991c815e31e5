use std::sync::Arc;
use anyhow::Context;
use tracing::{info, warn};

use crate::config::Config;
use crate::extract::{Extractor, LopdfReader, TesseractCli};
use crate::language::LanguageFamily;
use crate::pipeline::Pipeline;
use crate::segment::SegmenterRegistry;
use crate::translate::{TranslationService, TranslatorFactory};
use crate::upload::UploadStore;

/// Handles built once at startup and shared read-only by every request
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    /// Build the capabilities from configuration.
    ///
    /// Fails when the upload directory cannot be created, the OCR binary is
    /// required but missing, or the translation backend does not answer the
    /// warm-up probe.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let uploads = UploadStore::new(&config.server.upload_dir);
        uploads
            .ensure_dir()
            .with_context(|| format!("failed to create upload dir {}", config.server.upload_dir))?;

        let tesseract = TesseractCli::new(&config.ocr);
        match tesseract.version().await {
            Ok(version) => {
                info!("Using OCR engine: {}", version);
                check_ocr_languages(&tesseract).await;
            }
            Err(e) if config.ocr.require_binary => return Err(e),
            Err(e) => warn!("OCR engine unavailable, image uploads will fail: {:#}", e),
        }
        let extractor = Extractor::new(Arc::new(LopdfReader), Arc::new(tesseract));

        let translator = TranslatorFactory::create_translator(&config.translation)?;
        let translation = TranslationService::new(
            translator,
            config.translation.max_length,
            config.translation.max_concurrent,
        );
        if config.translation.warmup {
            translation
                .warm_up()
                .await
                .context("translation backend failed the startup probe")?;
        }

        let pipeline = Pipeline::new(uploads, extractor, SegmenterRegistry::default(), translation);
        Ok(Self::from_parts(config, pipeline))
    }

    pub fn from_parts(config: Config, pipeline: Pipeline) -> Self {
        Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
        }
    }
}

async fn check_ocr_languages(tesseract: &TesseractCli) {
    match tesseract.list_languages().await {
        Ok(installed) => {
            for family in [LanguageFamily::Nepali, LanguageFamily::Sinhala] {
                let hint = family.ocr_hint();
                if !installed.iter().any(|lang| lang == hint) {
                    warn!("OCR language data '{}' is not installed", hint);
                }
            }
        }
        Err(e) => warn!("Could not list OCR languages: {:#}", e),
    }
}
