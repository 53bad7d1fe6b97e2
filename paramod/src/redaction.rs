//! Key-based redaction: which records keep their original text.
//!
//! Province names, country tags and country adjectives stay in the source
//! language, so the default pattern matches those key shapes.

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{error::Error, types::TranslationRecord};

/// Keys of province names (`PROV123`), country tags (`FRA`) and adjectives (`FRA_ADJ`).
pub const DEFAULT_EXCLUDE_PATTERN: &str = r"(^PROV[0-9]+$)|(^[A-Z]{3}$)|(^[A-Z]{3}_ADJ$)";

lazy_static! {
    static ref DEFAULT_EXCLUDE_REGEX: Regex =
        Regex::new(DEFAULT_EXCLUDE_PATTERN).expect("default exclusion pattern is valid");
}

/// Why a record emits its original text instead of its translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// The key is in the explicit exclusion list.
    ExcludedKey,
    /// The key matches the exclusion pattern.
    ExcludedPattern,
    /// The translation is empty.
    Untranslated,
}

/// A regular expression plus an explicit list of keys whose original text is kept.
#[derive(Debug, Clone)]
pub struct RedactionPolicy {
    pattern: Regex,
    keys: BTreeSet<String>,
}

impl Default for RedactionPolicy {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_EXCLUDE_REGEX.clone(),
            keys: BTreeSet::new(),
        }
    }
}

impl RedactionPolicy {
    /// Builds a policy from a pattern string and an explicit key list.
    pub fn new<I, S>(pattern: &str, keys: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            keys: keys.into_iter().map(Into::into).collect(),
        })
    }

    /// Adds keys to the explicit exclusion list.
    pub fn with_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys.extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Returns `true` when the key is excluded by the list or the pattern.
    pub fn is_excluded(&self, key: &str) -> bool {
        self.keys.contains(key) || self.matches_pattern(key)
    }

    /// The pattern must match at the start of the key; it need not reach the end.
    fn matches_pattern(&self, key: &str) -> bool {
        self.pattern.find(key).is_some_and(|m| m.start() == 0)
    }

    /// Evaluates the fallback rules in order: key list, key pattern, empty translation.
    ///
    /// `None` means the translation is emitted.
    pub fn fallback(&self, record: &TranslationRecord) -> Option<Fallback> {
        if self.keys.contains(&record.key) {
            Some(Fallback::ExcludedKey)
        } else if self.matches_pattern(&record.key) {
            Some(Fallback::ExcludedPattern)
        } else if record.is_untranslated() {
            Some(Fallback::Untranslated)
        } else {
            None
        }
    }

    /// The text a record contributes to its output row.
    pub fn select<'a>(&self, record: &'a TranslationRecord) -> &'a str {
        match self.fallback(record) {
            Some(_) => &record.original,
            None => &record.translation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(key: &str, original: &str, translation: &str) -> TranslationRecord {
        TranslationRecord::new(key, original, translation)
    }

    #[test]
    fn test_default_pattern_matches_province_and_country_keys() {
        let policy = RedactionPolicy::default();
        for key in ["PROV1", "PROV12", "PROV3001", "FRA", "ENG", "FRA_ADJ"] {
            assert!(policy.is_excluded(key), "{key} should be excluded");
        }
        for key in ["PROV", "PROVX1", "FR", "FRAN", "fra", "FRA_ADJ2", "TXT_WELCOME"] {
            assert!(!policy.is_excluded(key), "{key} should not be excluded");
        }
    }

    #[test]
    fn test_pattern_match_keeps_original() {
        let policy = RedactionPolicy::default();
        let r = record("PROV12", "Paris", "Paris-FR");
        assert_eq!(policy.fallback(&r), Some(Fallback::ExcludedPattern));
        assert_eq!(policy.select(&r), "Paris");
    }

    #[test]
    fn test_translated_record_uses_translation() {
        let policy = RedactionPolicy::default();
        let r = record("TXT_WELCOME", "Hello", "Bonjour");
        assert_eq!(policy.fallback(&r), None);
        assert_eq!(policy.select(&r), "Bonjour");
    }

    #[test]
    fn test_empty_translation_falls_back() {
        let policy = RedactionPolicy::default();
        let r = record("TXT_EMPTY", "Hi", "");
        assert_eq!(policy.fallback(&r), Some(Fallback::Untranslated));
        assert_eq!(policy.select(&r), "Hi");
    }

    #[test]
    fn test_explicit_key_list_is_checked_first() {
        let policy = RedactionPolicy::default().with_keys(["FRA", "TXT_TITLE"]);
        assert_eq!(
            policy.fallback(&record("FRA", "France", "")),
            Some(Fallback::ExcludedKey)
        );
        assert_eq!(
            policy.fallback(&record("TXT_TITLE", "Title", "Titre")),
            Some(Fallback::ExcludedKey)
        );
    }

    #[test]
    fn test_custom_pattern() {
        let policy = RedactionPolicy::new(r"^EVT_", Vec::<String>::new()).unwrap();
        assert_eq!(policy.select(&record("EVT_1_NAME", "Storm", "Orage")), "Storm");
        assert_eq!(policy.select(&record("PROV12", "Paris", "Paris-FR")), "Paris-FR");
        assert_eq!(policy.pattern(), "^EVT_");
    }

    #[test]
    fn test_pattern_is_anchored_at_key_start() {
        let policy = RedactionPolicy::new("EVT_", Vec::<String>::new()).unwrap();
        assert_eq!(policy.select(&record("EVT_1", "Storm", "Orage")), "Storm");
        assert_eq!(policy.select(&record("MY_EVT_1", "Storm", "Orage")), "Orage");
        // A prefix match is enough, the key may continue after it.
        assert!(policy.is_excluded("EVT_1_DESC"));
        assert!(!policy.is_excluded("XEVT_"));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let err = RedactionPolicy::new("(unclosed", Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, Error::Pattern(_)));
    }
}
