//! Text normalization and the typed handoff between pipeline stages.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Lowercase, decompose (NFD) and drop combining marks.
///
/// Hyphens, ASCII punctuation, digits and whitespace pass through untouched.
/// Lowercasing runs first so that any decomposition it introduces is
/// stripped in the same pass, which keeps the function idempotent.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Text exactly as acquired from a PDF.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawText(String);

impl RawText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn normalize(&self) -> NormalizedText {
        NormalizedText(normalize(&self.0))
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Text that has been through [`normalize`]; the only input field extraction accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&RawText> for NormalizedText {
    fn from(raw: &RawText) -> Self {
        raw.normalize()
    }
}
