use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// Language used when the request omits `source_lang`
pub const DEFAULT_SOURCE_LANG: &str = "ne";

/// Logical language behind the accepted codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageFamily {
    Nepali,
    Sinhala,
}

impl LanguageFamily {
    /// Tesseract traineddata name for this family
    pub fn ocr_hint(&self) -> &'static str {
        match self {
            LanguageFamily::Nepali => "nep",
            LanguageFamily::Sinhala => "sin",
        }
    }
}

/// One of the four accepted `source_lang` codes, kept verbatim so it can be
/// echoed back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceLanguage {
    #[default]
    Ne,
    Nep,
    Si,
    Sin,
}

impl SourceLanguage {
    pub fn code(&self) -> &'static str {
        match self {
            SourceLanguage::Ne => "ne",
            SourceLanguage::Nep => "nep",
            SourceLanguage::Si => "si",
            SourceLanguage::Sin => "sin",
        }
    }

    pub fn family(&self) -> LanguageFamily {
        match self {
            SourceLanguage::Ne | SourceLanguage::Nep => LanguageFamily::Nepali,
            SourceLanguage::Si | SourceLanguage::Sin => LanguageFamily::Sinhala,
        }
    }
}

impl FromStr for SourceLanguage {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "ne" => Ok(SourceLanguage::Ne),
            "nep" => Ok(SourceLanguage::Nep),
            "si" => Ok(SourceLanguage::Si),
            "sin" => Ok(SourceLanguage::Sin),
            _ => Err(AppError::InvalidLanguage(value.to_string())),
        }
    }
}

impl fmt::Display for SourceLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for SourceLanguage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}
