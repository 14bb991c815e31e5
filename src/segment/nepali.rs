use super::interface::Segmenter;
use crate::utils::collapse_whitespace;

const DANDA: char = '।';

/// Heuristic spacing for Devanagari text produced by OCR.
///
/// Separates sentences after a danda and splits every pair of adjacent
/// consonants (क..ह). Legitimate consonant clusters get split too.
pub struct NepaliSegmenter;

fn is_consonant(ch: char) -> bool {
    ('\u{0915}'..='\u{0939}').contains(&ch)
}

impl Segmenter for NepaliSegmenter {
    fn segment(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() + text.len() / 4);
        let mut chars = text.chars().peekable();

        while let Some(ch) = chars.next() {
            out.push(ch);
            let Some(&next) = chars.peek() else {
                break;
            };
            if ch == DANDA && !next.is_whitespace() {
                out.push(' ');
            } else if is_consonant(ch) && is_consonant(next) {
                out.push(' ');
            }
        }

        collapse_whitespace(&out)
    }
}
