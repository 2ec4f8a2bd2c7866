//! Registration and coverage validation.
//!
//! `ValidationResult` is what every registration returns. `PlaceholderValidator`
//! checks that the translations of a template key agree on which `{name}`
//! placeholders they reference, so a translator dropping `{count}` shows up as
//! a warning at registration time.

use crate::error::MissingKey;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

/// Outcome of a registration or coverage check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// Whether every (language, key) pair was present
    pub is_valid: bool,

    /// (language id, string key) pairs that were missing
    pub missing_keys: Vec<MissingKey>,

    /// Non-critical findings
    pub warnings: Vec<String>,

    /// Critical findings
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// Create a valid, empty result
    pub fn new() -> Self {
        Self {
            is_valid: true,
            missing_keys: Vec::new(),
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Record a missing pair; the result becomes invalid.
    pub fn add_missing(&mut self, language: &str, key: &str) {
        self.is_valid = false;
        self.missing_keys
            .push((language.to_string(), key.to_string()));
    }

    /// Record an error; the result becomes invalid.
    pub fn add_error(&mut self, error: impl Into<String>) {
        self.is_valid = false;
        self.errors.push(error.into());
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Fold another result into this one.
    pub fn merge(&mut self, other: ValidationResult) {
        self.is_valid &= other.is_valid;
        self.missing_keys.extend(other.missing_keys);
        self.warnings.extend(other.warnings);
        self.errors.extend(other.errors);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the result is clean (valid, no errors or warnings)
    pub fn is_clean(&self) -> bool {
        self.is_valid && !self.has_errors() && !self.has_warnings()
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Cross-language placeholder consistency checks.
pub struct PlaceholderValidator;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

impl PlaceholderValidator {
    /// Compare the placeholders of each key's translations against the
    /// reference language and describe every mismatch.
    ///
    /// `strings` maps language id to (key to value).
    pub fn validate(
        component: &str,
        reference_language: &str,
        strings: &BTreeMap<String, BTreeMap<String, String>>,
    ) -> Vec<String> {
        let Some(reference) = strings.get(reference_language) else {
            return Vec::new();
        };

        let mut warnings = Vec::new();
        for (language, table) in strings {
            if language == reference_language {
                continue;
            }
            for (key, value) in table {
                let Some(reference_value) = reference.get(key) else {
                    continue;
                };
                let expected = Self::extract_placeholders(reference_value);
                let actual = Self::extract_placeholders(value);
                if expected != actual {
                    warnings.push(format!(
                        "Placeholder mismatch in {}.{} for '{}': expected {:?}, found {:?}",
                        component, key, language, expected, actual
                    ));
                }
            }
        }
        warnings
    }

    /// Extract the set of `{name}` placeholder names from text
    pub fn extract_placeholders(text: &str) -> BTreeSet<String> {
        let regex = PLACEHOLDER_REGEX.get_or_init(|| {
            Regex::new(r"\{([A-Za-z0-9_]+)\}").expect("placeholder pattern is valid")
        });

        regex
            .captures_iter(text)
            .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables(entries: &[(&str, &[(&str, &str)])]) -> BTreeMap<String, BTreeMap<String, String>> {
        entries
            .iter()
            .map(|(lang, pairs)| {
                (
                    lang.to_string(),
                    pairs
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect(),
                )
            })
            .collect()
    }

    // ==================== Placeholder Extraction Tests ====================

    #[test]
    fn test_extract_placeholders_single() {
        let names = PlaceholderValidator::extract_placeholders("Hello {name}!");
        assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["name"]);
    }

    #[test]
    fn test_extract_placeholders_multiple_deduplicated() {
        let names = PlaceholderValidator::extract_placeholders("{a} and {b} and {a}");
        assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_extract_placeholders_ignores_malformed() {
        let names = PlaceholderValidator::extract_placeholders("{ spaced } {} {bad-name}");
        assert!(names.is_empty());
    }

    // ==================== Consistency Tests ====================

    #[test]
    fn test_validate_consistent_translations() {
        let strings = tables(&[
            ("en", &[("greetingTemplate", "Hi {name}")]),
            ("es", &[("greetingTemplate", "Hola {name}")]),
        ]);
        assert!(PlaceholderValidator::validate("app", "en", &strings).is_empty());
    }

    #[test]
    fn test_validate_dropped_placeholder() {
        let strings = tables(&[
            ("en", &[("countTemplate", "{count} items")]),
            ("es", &[("countTemplate", "elementos")]),
        ]);
        let warnings = PlaceholderValidator::validate("app", "en", &strings);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Placeholder mismatch in app.countTemplate"));
    }

    #[test]
    fn test_validate_missing_reference_language() {
        let strings = tables(&[("es", &[("a", "{x}")])]);
        assert!(PlaceholderValidator::validate("app", "en", &strings).is_empty());
    }

    // ==================== ValidationResult Tests ====================

    #[test]
    fn test_validation_result_new_is_clean() {
        let result = ValidationResult::new();
        assert!(result.is_valid);
        assert!(result.is_clean());
    }

    #[test]
    fn test_add_missing_invalidates() {
        let mut result = ValidationResult::new();
        result.add_missing("fr", "welcome");

        assert!(!result.is_valid);
        assert_eq!(result.missing_keys, vec![("fr".to_string(), "welcome".to_string())]);
    }

    #[test]
    fn test_warning_keeps_valid() {
        let mut result = ValidationResult::new();
        result.add_warning("heads up");

        assert!(result.is_valid);
        assert!(!result.is_clean());
        assert!(result.has_warnings());
    }

    #[test]
    fn test_merge_combines() {
        let mut a = ValidationResult::new();
        let mut b = ValidationResult::new();
        b.add_error("broken");
        a.merge(b);

        assert!(!a.is_valid);
        assert!(a.has_errors());
    }
}
