//! Active context store.
//!
//! Holds one fully-populated `ActiveContext` per context key. Lookups and
//! setters against an unknown key fail with `InvalidContext`; contexts are
//! only ever created explicitly and only removed by `clear_all`.

use super::value::{CurrencyCode, Timezone, Variables};
use crate::error::{I18nError, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Key of the context used when none is given.
pub const DEFAULT_CONTEXT_KEY: &str = "default";

/// Which perspective drives language and timezone resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageContextSpace {
    #[default]
    User,
    Admin,
}

impl fmt::Display for LanguageContextSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LanguageContextSpace::User => f.write_str("user"),
            LanguageContextSpace::Admin => f.write_str("admin"),
        }
    }
}

/// Current language, currency, and timezone settings for one context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveContext {
    pub language: String,
    pub admin_language: String,
    pub currency_code: CurrencyCode,
    pub timezone: Timezone,
    pub admin_timezone: Timezone,
    pub current_context_space: LanguageContextSpace,
}

impl ActiveContext {
    /// Language of the active context space.
    pub fn active_language(&self) -> &str {
        match self.current_context_space {
            LanguageContextSpace::User => &self.language,
            LanguageContextSpace::Admin => &self.admin_language,
        }
    }

    /// Timezone of the active context space.
    pub fn active_timezone(&self) -> &Timezone {
        match self.current_context_space {
            LanguageContextSpace::User => &self.timezone,
            LanguageContextSpace::Admin => &self.admin_timezone,
        }
    }

    /// Variables templates can reference: `language`, `adminLanguage`,
    /// `userLanguage`, `currencyCode`, `timezone`, `userTimezone`, `adminTimezone`.
    pub fn variables(&self) -> Variables {
        Variables::new()
            .with("language", self.active_language())
            .with("adminLanguage", self.admin_language.as_str())
            .with("userLanguage", self.language.as_str())
            .with("currencyCode", self.currency_code.clone())
            .with("timezone", self.active_timezone().clone())
            .with("userTimezone", self.timezone.clone())
            .with("adminTimezone", self.admin_timezone.clone())
    }
}

/// Partial update applied by `ContextStore::apply`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextUpdate {
    pub language: Option<String>,
    pub admin_language: Option<String>,
    pub currency_code: Option<CurrencyCode>,
    pub timezone: Option<Timezone>,
    pub admin_timezone: Option<Timezone>,
    pub current_context_space: Option<LanguageContextSpace>,
}

/// Contexts keyed by an arbitrary string.
#[derive(Debug, Clone)]
pub struct ContextStore {
    contexts: HashMap<String, ActiveContext>,
    default_currency: CurrencyCode,
    default_timezone: Timezone,
}

impl ContextStore {
    /// Create an empty store whose new contexts use the given currency and timezone.
    pub fn new(default_currency: CurrencyCode, default_timezone: Timezone) -> Self {
        Self {
            contexts: HashMap::new(),
            default_currency,
            default_timezone,
        }
    }

    /// Build a fully-populated context and store it under `key`.
    ///
    /// The admin language defaults to `default_language`, both timezones to
    /// the store's default timezone (UTC unless configured otherwise), and the
    /// context space to user. An existing context under `key`
    /// is replaced.
    pub fn create_context(
        &mut self,
        default_language: &str,
        default_admin_language: Option<&str>,
        key: &str,
    ) -> &ActiveContext {
        let context = ActiveContext {
            language: default_language.to_string(),
            admin_language: default_admin_language
                .unwrap_or(default_language)
                .to_string(),
            currency_code: self.default_currency.clone(),
            timezone: self.default_timezone.clone(),
            admin_timezone: self.default_timezone.clone(),
            current_context_space: LanguageContextSpace::User,
        };
        debug!("Created context '{}' ({})", key, default_language);
        self.contexts.insert(key.to_string(), context);
        &self.contexts[key]
    }

    /// # Errors
    /// `InvalidContext` if no context exists under `key`.
    pub fn get_context(&self, key: &str) -> Result<&ActiveContext> {
        self.contexts
            .get(key)
            .ok_or_else(|| I18nError::InvalidContext(key.to_string()))
    }

    fn get_context_mut(&mut self, key: &str) -> Result<&mut ActiveContext> {
        self.contexts
            .get_mut(key)
            .ok_or_else(|| I18nError::InvalidContext(key.to_string()))
    }

    pub fn has_context(&self, key: &str) -> bool {
        self.contexts.contains_key(key)
    }

    /// Apply every field present in `update` to the context under `key`.
    pub fn apply(&mut self, key: &str, update: ContextUpdate) -> Result<()> {
        let context = self.get_context_mut(key)?;
        if let Some(language) = update.language {
            context.language = language;
        }
        if let Some(language) = update.admin_language {
            context.admin_language = language;
        }
        if let Some(code) = update.currency_code {
            context.currency_code = code;
        }
        if let Some(tz) = update.timezone {
            context.timezone = tz;
        }
        if let Some(tz) = update.admin_timezone {
            context.admin_timezone = tz;
        }
        if let Some(space) = update.current_context_space {
            context.current_context_space = space;
        }
        Ok(())
    }

    pub fn user_language(&self, key: &str) -> Result<&str> {
        Ok(&self.get_context(key)?.language)
    }

    pub fn set_user_language(&mut self, language: &str, key: &str) -> Result<()> {
        self.get_context_mut(key)?.language = language.to_string();
        Ok(())
    }

    pub fn admin_language(&self, key: &str) -> Result<&str> {
        Ok(&self.get_context(key)?.admin_language)
    }

    pub fn set_admin_language(&mut self, language: &str, key: &str) -> Result<()> {
        self.get_context_mut(key)?.admin_language = language.to_string();
        Ok(())
    }

    pub fn currency_code(&self, key: &str) -> Result<&CurrencyCode> {
        Ok(&self.get_context(key)?.currency_code)
    }

    pub fn set_currency_code(&mut self, code: CurrencyCode, key: &str) -> Result<()> {
        self.get_context_mut(key)?.currency_code = code;
        Ok(())
    }

    pub fn user_timezone(&self, key: &str) -> Result<&Timezone> {
        Ok(&self.get_context(key)?.timezone)
    }

    pub fn set_user_timezone(&mut self, tz: Timezone, key: &str) -> Result<()> {
        self.get_context_mut(key)?.timezone = tz;
        Ok(())
    }

    pub fn admin_timezone(&self, key: &str) -> Result<&Timezone> {
        Ok(&self.get_context(key)?.admin_timezone)
    }

    pub fn set_admin_timezone(&mut self, tz: Timezone, key: &str) -> Result<()> {
        self.get_context_mut(key)?.admin_timezone = tz;
        Ok(())
    }

    pub fn language_context_space(&self, key: &str) -> Result<LanguageContextSpace> {
        Ok(self.get_context(key)?.current_context_space)
    }

    pub fn set_language_context_space(
        &mut self,
        space: LanguageContextSpace,
        key: &str,
    ) -> Result<()> {
        self.get_context_mut(key)?.current_context_space = space;
        Ok(())
    }

    /// Discard every context.
    pub fn clear_all(&mut self) {
        debug!("Clearing {} context(s)", self.contexts.len());
        self.contexts.clear();
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}
