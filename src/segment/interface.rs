/// A language-specific fix-up applied to cleaned text before translation.
///
/// Implementations are pure: the same input always yields the same output.
pub trait Segmenter: Send + Sync {
    fn segment(&self, text: &str) -> String;
}

/// Fallback for languages without a dedicated heuristic
pub struct PassThroughSegmenter;

impl Segmenter for PassThroughSegmenter {
    fn segment(&self, text: &str) -> String {
        crate::utils::collapse_whitespace(text)
    }
}
