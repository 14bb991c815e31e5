/// Normalize extracted text before segmentation.
///
/// ASCII control characters (0x00-0x1F, 0x7F) are removed, except the ASCII
/// whitespace controls which count as whitespace. Every whitespace run
/// collapses to one space and the result is trimmed.
pub fn clean_text(text: &str) -> String {
    let filtered: String = text
        .chars()
        .filter_map(|ch| match ch {
            '\t' | '\n' | '\u{0B}' | '\u{0C}' | '\r' => Some(' '),
            '\u{00}'..='\u{1F}' | '\u{7F}' => None,
            _ => Some(ch),
        })
        .collect();

    collapse_whitespace(&filtered)
}

/// Collapse whitespace runs (Unicode aware) into single spaces and trim
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
