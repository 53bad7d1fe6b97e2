//! Core, format-agnostic types for paramod.

use serde::{Deserialize, Serialize};

/// One unit of localizable text as exported by the translation service.
///
/// Records are read in array order and never mutated; the converter turns each
/// one into exactly one output row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TranslationRecord {
    /// Identifier of the string, unique within its source file.
    pub key: String,
    /// Source-language text.
    pub original: String,
    /// Target-language text. Empty while the string is not yet translated.
    pub translation: String,
}

impl TranslationRecord {
    pub fn new(
        key: impl Into<String>,
        original: impl Into<String>,
        translation: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            original: original.into(),
            translation: translation.into(),
        }
    }

    /// Returns `true` when no translation has been entered yet.
    pub fn is_untranslated(&self) -> bool {
        self.translation.is_empty()
    }
}
