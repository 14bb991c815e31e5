pub mod text_cleaner;

pub use text_cleaner::{clean_text, collapse_whitespace};
