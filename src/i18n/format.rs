//! Boundary for plural/select message formatting.
//!
//! The engine does not implement plural or select grammar. Strings that use
//! it are handed to an installed `MessageFormatter`; everything else goes
//! through plain `{name}` substitution.

use super::value::Variables;
use crate::error::Result;
use regex::Regex;
use std::sync::OnceLock;

/// Renders strings written in plural/select message grammar.
pub trait MessageFormatter: Send + Sync {
    /// Format `template` with `variables` for the given locale code.
    fn format_message(&self, template: &str, variables: &Variables, locale: &str) -> Result<String>;
}

static ICU_REGEX: OnceLock<Regex> = OnceLock::new();

/// Whether a string opts into plural/select grammar, e.g. `{count, plural, ...}`.
pub fn uses_message_grammar(text: &str) -> bool {
    let regex = ICU_REGEX.get_or_init(|| {
        Regex::new(r"\{\s*[A-Za-z0-9_]+\s*,\s*(plural|select|selectordinal)\s*,")
            .expect("message grammar pattern is valid")
    });
    regex.is_match(text)
}
