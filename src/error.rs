//! Error types for the translation engine.

use thiserror::Error;

/// A (language id, string key) pair that a component does not provide.
pub type MissingKey = (String, String);

/// Errors raised by registries, the resolver, and the instance store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum I18nError {
    #[error("Component not found: {0}")]
    ComponentNotFound(String),

    #[error("Language not found: {0}")]
    LanguageNotFound(String),

    #[error("String key '{key}' not found in component '{component}'")]
    StringKeyNotFound { component: String, key: String },

    #[error("Component identifier already registered: {0}")]
    DuplicateComponent(String),

    #[error("Language already registered: {0}")]
    DuplicateLanguage(String),

    #[error("Invalid context: {0}")]
    InvalidContext(String),

    #[error("Incomplete registration for component '{component}': {} missing string(s)", .missing.len())]
    IncompleteRegistration {
        component: String,
        missing: Vec<MissingKey>,
    },

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Constant '{name}' is owned by '{owner}' with a different value (attempted by '{attempted_by}')")]
    ConstantConflict {
        name: String,
        owner: String,
        attempted_by: String,
    },

    #[error("Instance not found: {0}")]
    InstanceNotFound(String),

    #[error("Instance already exists: {0}")]
    DuplicateInstance(String),

    #[error("Enumeration not found: {0}")]
    EnumNotFound(String),

    #[error("No translation for value '{value}' of enumeration '{enum_id}'")]
    EnumTranslationNotFound { enum_id: String, value: String },

    #[error("Enumeration name '{name}' is already bound to '{existing}'")]
    DuplicateEnum { name: String, existing: String },

    #[error("Invalid currency code: {0}")]
    InvalidCurrencyCode(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("An engine requires at least one language")]
    NoLanguages,
}

impl I18nError {
    /// The universal "could not resolve" marker: `[component.key]`.
    ///
    /// Downstream UI code pattern-matches on this exact shape, so it never
    /// carries whitespace or any other decoration.
    pub fn placeholder(component: &str, key: &str) -> String {
        format!("[{}.{}]", component, key)
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, I18nError>;
