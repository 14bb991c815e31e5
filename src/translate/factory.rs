use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use super::huggingface::HuggingFaceTranslator;
use super::interface::Translator;
use super::pipeline_service::PipelineServiceTranslator;
use crate::config::TranslationConfig;

/// Factory for translation backends
pub struct TranslatorFactory;

impl TranslatorFactory {
    /// Create the backend named by `translation.provider`
    pub fn create_translator(config: &TranslationConfig) -> Result<Arc<dyn Translator>> {
        info!("Initializing translator: {} ({})", config.provider, config.model);
        let timeout = Duration::from_secs(config.timeout_secs);

        match config.provider.as_str() {
            "huggingface" | "hf_inference" => Ok(Arc::new(HuggingFaceTranslator::new(
                &config.base_url,
                &config.model,
                config.api_token.clone(),
                timeout,
            )?)),
            "pipeline_service" => Ok(Arc::new(PipelineServiceTranslator::new(
                &config.base_url,
                &config.model,
                timeout,
            )?)),
            other => Err(anyhow::anyhow!("Unsupported translation provider: {}", other)),
        }
    }
}
