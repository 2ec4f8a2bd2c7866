use crate::i18n::DEFAULT_CONTEXT_KEY;
use anyhow::{ensure, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    // Context defaults
    pub default_currency_code: String,
    pub default_timezone: String,
    pub context_key: String,

    // Registration policy
    pub require_complete_strings: bool,
    pub allow_partial_registration: bool,

    // Resolution
    pub fallback_language: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_currency_code: "USD".to_string(),
            default_timezone: "UTC".to_string(),
            context_key: DEFAULT_CONTEXT_KEY.to_string(),
            require_complete_strings: false,
            allow_partial_registration: true,
            fallback_language: None,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            // Context defaults
            default_currency_code: std::env::var("I18N_DEFAULT_CURRENCY")
                .unwrap_or(defaults.default_currency_code),
            default_timezone: std::env::var("I18N_DEFAULT_TIMEZONE")
                .unwrap_or(defaults.default_timezone),
            context_key: std::env::var("I18N_CONTEXT_KEY").unwrap_or(defaults.context_key),

            // Registration policy
            require_complete_strings: std::env::var("I18N_STRICT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.require_complete_strings),
            allow_partial_registration: std::env::var("I18N_ALLOW_PARTIAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.allow_partial_registration),

            // Resolution
            fallback_language: std::env::var("I18N_FALLBACK_LANGUAGE")
                .ok()
                .filter(|v| !v.is_empty()),
        };

        ensure!(!config.context_key.is_empty(), "I18N_CONTEXT_KEY must not be empty");
        Ok(config)
    }

    pub fn with_default_currency(mut self, code: impl Into<String>) -> Self {
        self.default_currency_code = code.into();
        self
    }

    pub fn with_default_timezone(mut self, tz: impl Into<String>) -> Self {
        self.default_timezone = tz.into();
        self
    }

    pub fn with_context_key(mut self, key: impl Into<String>) -> Self {
        self.context_key = key.into();
        self
    }

    pub fn with_strict_strings(mut self, strict: bool) -> Self {
        self.require_complete_strings = strict;
        self
    }

    pub fn with_partial_registration(mut self, allow: bool) -> Self {
        self.allow_partial_registration = allow;
        self
    }

    pub fn with_fallback_language(mut self, language: impl Into<String>) -> Self {
        self.fallback_language = Some(language.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "I18N_DEFAULT_CURRENCY",
        "I18N_DEFAULT_TIMEZONE",
        "I18N_CONTEXT_KEY",
        "I18N_STRICT",
        "I18N_ALLOW_PARTIAL",
        "I18N_FALLBACK_LANGUAGE",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.default_currency_code, "USD");
        assert_eq!(config.default_timezone, "UTC");
        assert_eq!(config.context_key, "default");
        assert!(!config.require_complete_strings);
        assert!(config.allow_partial_registration);
        assert!(config.fallback_language.is_none());
    }

    #[test]
    fn test_builder_setters() {
        let config = EngineConfig::default()
            .with_default_currency("EUR")
            .with_strict_strings(true)
            .with_fallback_language("en");
        assert_eq!(config.default_currency_code, "EUR");
        assert!(config.require_complete_strings);
        assert_eq!(config.fallback_language.as_deref(), Some("en"));
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        let config = EngineConfig::from_env().unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var("I18N_DEFAULT_CURRENCY", "GBP");
        std::env::set_var("I18N_STRICT", "true");
        std::env::set_var("I18N_FALLBACK_LANGUAGE", "es");

        let config = EngineConfig::from_env().unwrap();
        clear_env();

        assert_eq!(config.default_currency_code, "GBP");
        assert!(config.require_complete_strings);
        assert_eq!(config.fallback_language.as_deref(), Some("es"));
    }

    #[test]
    #[serial]
    fn test_from_env_unparseable_bool_uses_default() {
        clear_env();
        std::env::set_var("I18N_ALLOW_PARTIAL", "maybe");

        let config = EngineConfig::from_env().unwrap();
        clear_env();

        assert!(config.allow_partial_registration);
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_empty_context_key() {
        clear_env();
        std::env::set_var("I18N_CONTEXT_KEY", "");

        let result = EngineConfig::from_env();
        clear_env();

        assert!(result.is_err());
    }
}
