use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use super::interface::{PassThroughSegmenter, Segmenter};
use super::nepali::NepaliSegmenter;
use super::sinhala::SinhalaSegmenter;
use crate::language::LanguageFamily;

/// Segmentation strategies keyed by language family
#[derive(Clone)]
pub struct SegmenterRegistry {
    strategies: HashMap<LanguageFamily, Arc<dyn Segmenter>>,
    fallback: Arc<dyn Segmenter>,
}

impl SegmenterRegistry {
    /// Registry without any language-specific strategy
    pub fn empty() -> Self {
        Self {
            strategies: HashMap::new(),
            fallback: Arc::new(PassThroughSegmenter),
        }
    }

    pub fn register(mut self, family: LanguageFamily, segmenter: Arc<dyn Segmenter>) -> Self {
        self.strategies.insert(family, segmenter);
        self
    }

    pub fn segment(&self, family: LanguageFamily, text: &str) -> String {
        match self.strategies.get(&family) {
            Some(strategy) => strategy.segment(text),
            None => {
                debug!("No segmenter registered for {:?}, passing text through", family);
                self.fallback.segment(text)
            }
        }
    }
}

impl Default for SegmenterRegistry {
    fn default() -> Self {
        Self::empty()
            .register(LanguageFamily::Nepali, Arc::new(NepaliSegmenter))
            .register(LanguageFamily::Sinhala, Arc::new(SinhalaSegmenter))
    }
}
