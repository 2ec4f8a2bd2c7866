//! Language registry: the set of languages an engine instance knows about.
//!
//! Registration is append-only. Exactly one language acts as the default;
//! when none is flagged the first registered language is used.

use crate::error::{I18nError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Definition of a supported language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageDefinition {
    /// Unique identifier used as the key of every string table (e.g., "en-US")
    pub id: String,

    /// Human-readable name (e.g., "English (US)")
    pub name: String,

    /// Locale code handed to message formatters (e.g., "en-US")
    pub code: String,

    /// Whether this is the engine's default language
    #[serde(default)]
    pub is_default: bool,
}

impl LanguageDefinition {
    /// Create a non-default language definition.
    pub fn new(id: impl Into<String>, name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            code: code.into(),
            is_default: false,
        }
    }

    /// Mark this language as the default.
    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }
}

/// Ordered registry of language definitions.
#[derive(Debug, Clone, Default)]
pub struct LanguageRegistry {
    languages: Vec<LanguageDefinition>,
}

impl LanguageRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a single language.
    ///
    /// # Errors
    /// `DuplicateLanguage` if a language with the same id is already present.
    pub fn register_language(&mut self, definition: LanguageDefinition) -> Result<()> {
        if self.has_language(&definition.id) {
            return Err(I18nError::DuplicateLanguage(definition.id));
        }

        if definition.is_default {
            if let Some(existing) = self.languages.iter().find(|lang| lang.is_default) {
                warn!(
                    "Language '{}' flagged as default but '{}' already is; keeping '{}'",
                    definition.id, existing.id, existing.id
                );
            }
        }

        debug!("Registered language '{}' ({})", definition.id, definition.code);
        self.languages.push(definition);
        Ok(())
    }

    /// Register several languages, stopping at the first duplicate.
    pub fn register_languages<I>(&mut self, definitions: I) -> Result<()>
    where
        I: IntoIterator<Item = LanguageDefinition>,
    {
        for definition in definitions {
            self.register_language(definition)?;
        }
        Ok(())
    }

    /// Check whether a language id is registered.
    pub fn has_language(&self, id: &str) -> bool {
        self.languages.iter().any(|lang| lang.id == id)
    }

    /// Get a language by id.
    pub fn get_language(&self, id: &str) -> Option<&LanguageDefinition> {
        self.languages.iter().find(|lang| lang.id == id)
    }

    /// Get a language by its locale code.
    pub fn get_language_by_code(&self, code: &str) -> Option<&LanguageDefinition> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Resolve an id or a locale code to a registered language id.
    ///
    /// Ids win over codes when both could match.
    pub fn resolve_id(&self, id_or_code: &str) -> Option<&str> {
        self.get_language(id_or_code)
            .or_else(|| self.get_language_by_code(id_or_code))
            .map(|lang| lang.id.as_str())
    }

    /// All languages in registration order.
    pub fn get_all_languages(&self) -> &[LanguageDefinition] {
        &self.languages
    }

    /// Registered language ids in registration order.
    pub fn ids(&self) -> Vec<String> {
        self.languages.iter().map(|lang| lang.id.clone()).collect()
    }

    /// The default language: the first one flagged default, else the first registered.
    pub fn default_language(&self) -> Option<&LanguageDefinition> {
        self.languages
            .iter()
            .find(|lang| lang.is_default)
            .or_else(|| self.languages.first())
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}
