use super::interface::Segmenter;
use crate::utils::collapse_whitespace;

/// Whitespace normalization only; no Sinhala-specific splitting yet
pub struct SinhalaSegmenter;

impl Segmenter for SinhalaSegmenter {
    fn segment(&self, text: &str) -> String {
        collapse_whitespace(text)
    }
}
