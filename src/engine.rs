//! The translation engine: one isolated translation universe.
//!
//! An `I18nEngine` owns a language registry, component registry, enumeration
//! registry, constants registry, and context store, each behind its own
//! `RwLock`. Every operation takes `&self`, so engines are shared as
//! `Arc<I18nEngine>` (see `crate::instances`).
//!
//! Locks are always taken in the order languages, components, enums,
//! constants, contexts, and never held across a call back into the engine.

use crate::config::EngineConfig;
use crate::error::{I18nError, Result};
use crate::i18n::template::{is_template_key, scan_references, substitute_variables, Segment};
use crate::i18n::{
    uses_message_grammar, ActiveContext, ComponentDefinition, ComponentRegistry,
    ConstantsRegistry, ContextStore, ContextUpdate, CurrencyCode, EnumDefinition, EnumRegistry,
    EnumValue, LanguageContextSpace, LanguageDefinition, LanguageRegistry, LocaleData,
    MessageFormatter, RegistrationPolicy, StandardLocaleData, StringTables, Timezone,
    TranslatableEnum, TranslationMetrics, ValidationResult, Variables,
};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info, warn};

/// A resolved string together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    pub value: String,
    /// Language whose table supplied the value
    pub language: String,
    pub was_fallback: bool,
}

pub struct I18nEngine {
    config: EngineConfig,
    languages: RwLock<LanguageRegistry>,
    components: RwLock<ComponentRegistry>,
    enums: RwLock<EnumRegistry>,
    constants: RwLock<ConstantsRegistry>,
    contexts: RwLock<ContextStore>,
    locale_data: Box<dyn LocaleData>,
    formatter: Option<Box<dyn MessageFormatter>>,
    metrics: TranslationMetrics,
}

impl std::fmt::Debug for I18nEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("I18nEngine")
            .field("config", &self.config)
            .field("languages", &self.languages.read().ids())
            .field("components", &self.components.read().component_ids())
            .field("has_formatter", &self.formatter.is_some())
            .finish()
    }
}

impl I18nEngine {
    /// Create an engine with the standard currency and timezone data.
    ///
    /// # Errors
    /// * `NoLanguages` if `languages` is empty
    /// * `DuplicateLanguage` if two definitions share an id
    /// * `LanguageNotFound` if the configured fallback language is unknown
    /// * `InvalidCurrencyCode` / `InvalidTimezone` for bad configured defaults
    pub fn new(languages: Vec<LanguageDefinition>, config: EngineConfig) -> Result<Self> {
        Self::with_locale_data(languages, config, Box::new(StandardLocaleData))
    }

    /// Create an engine backed by custom currency and timezone data.
    pub fn with_locale_data(
        languages: Vec<LanguageDefinition>,
        config: EngineConfig,
        locale_data: Box<dyn LocaleData>,
    ) -> Result<Self> {
        if languages.is_empty() {
            return Err(I18nError::NoLanguages);
        }

        let mut registry = LanguageRegistry::new();
        registry.register_languages(languages)?;

        if let Some(fallback) = &config.fallback_language {
            if registry.resolve_id(fallback).is_none() {
                return Err(I18nError::LanguageNotFound(fallback.clone()));
            }
        }

        let currency = CurrencyCode::new(&config.default_currency_code, locale_data.as_ref())?;
        let timezone = Timezone::new(&config.default_timezone, locale_data.as_ref())?;
        let default_language = registry
            .default_language()
            .map(|lang| lang.id.clone())
            .ok_or(I18nError::NoLanguages)?;

        let mut contexts = ContextStore::new(currency, timezone);
        contexts.create_context(&default_language, None, &config.context_key);

        info!(
            "Created engine with {} language(s), default '{}'",
            registry.len(),
            default_language
        );

        Ok(Self {
            config,
            languages: RwLock::new(registry),
            components: RwLock::new(ComponentRegistry::new()),
            enums: RwLock::new(EnumRegistry::new()),
            constants: RwLock::new(ConstantsRegistry::new()),
            contexts: RwLock::new(contexts),
            locale_data,
            formatter: None,
            metrics: TranslationMetrics::new(),
        })
    }

    /// Install a formatter for strings written in plural/select grammar.
    pub fn with_formatter(mut self, formatter: Box<dyn MessageFormatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn metrics(&self) -> &TranslationMetrics {
        &self.metrics
    }

    pub fn locale_data(&self) -> &dyn LocaleData {
        self.locale_data.as_ref()
    }

    fn policy(&self) -> RegistrationPolicy {
        RegistrationPolicy {
            require_complete_strings: self.config.require_complete_strings,
            allow_partial_registration: self.config.allow_partial_registration,
        }
    }

    fn context_key<'a>(&'a self, key: Option<&'a str>) -> &'a str {
        key.unwrap_or(&self.config.context_key)
    }

    // ==================== Languages ====================

    /// Register an additional language.
    pub fn register_language(&self, definition: LanguageDefinition) -> Result<()> {
        self.languages.write().register_language(definition)
    }

    /// Register additional languages, stopping at the first duplicate.
    pub fn register_languages(&self, definitions: Vec<LanguageDefinition>) -> Result<()> {
        self.languages.write().register_languages(definitions)
    }

    pub fn has_language(&self, id: &str) -> bool {
        self.languages.read().has_language(id)
    }

    pub fn get_language(&self, id: &str) -> Option<LanguageDefinition> {
        self.languages.read().get_language(id).cloned()
    }

    pub fn get_language_by_code(&self, code: &str) -> Option<LanguageDefinition> {
        self.languages.read().get_language_by_code(code).cloned()
    }

    pub fn get_all_languages(&self) -> Vec<LanguageDefinition> {
        self.languages.read().get_all_languages().to_vec()
    }

    /// The default language: the first one flagged default, else the first registered.
    ///
    /// Always `Some` for a constructed engine, since construction rejects an
    /// empty language list and languages are never removed.
    pub fn default_language(&self) -> Option<LanguageDefinition> {
        self.languages.read().default_language().cloned()
    }

    /// The language whose strings fill gaps: the configured fallback, else the default.
    pub fn fallback_language(&self) -> String {
        let languages = self.languages.read();
        self.config
            .fallback_language
            .as_deref()
            .and_then(|lang| languages.resolve_id(lang))
            .or_else(|| languages.default_language().map(|lang| lang.id.as_str()))
            .unwrap_or_default()
            .to_string()
    }

    fn require_language(&self, id_or_code: &str) -> Result<String> {
        self.languages
            .read()
            .resolve_id(id_or_code)
            .map(str::to_string)
            .ok_or_else(|| I18nError::LanguageNotFound(id_or_code.to_string()))
    }

    /// Resolve the language a request should use.
    ///
    /// An explicit language wins; an unknown explicit language means the
    /// fallback language. Without one, the current context's active-space
    /// language is used, then the default language.
    pub fn resolve_language(&self, requested: Option<&str>) -> String {
        self.resolve_request_language(requested).0
    }

    /// Like `resolve_language`, also reporting whether an explicitly
    /// requested language was replaced by the fallback language.
    fn resolve_request_language(&self, requested: Option<&str>) -> (String, bool) {
        if let Some(requested) = requested {
            let known = self
                .languages
                .read()
                .resolve_id(requested)
                .map(str::to_string);
            return match known {
                Some(id) => (id, false),
                None => {
                    debug!("Unknown language '{}', using fallback", requested);
                    (self.fallback_language(), true)
                }
            };
        }
        (self.context_or_default_language(), false)
    }

    fn context_or_default_language(&self) -> String {
        let active = {
            let contexts = self.contexts.read();
            contexts
                .get_context(&self.config.context_key)
                .map(|context| context.active_language().to_string())
                .ok()
        };
        let active = active.and_then(|active| {
            self.languages
                .read()
                .resolve_id(&active)
                .map(str::to_string)
        });
        if let Some(id) = active {
            return id;
        }
        // Construction guarantees a default language exists
        self.languages
            .read()
            .default_language()
            .map(|lang| lang.id.clone())
            .unwrap_or_default()
    }

    fn locale_code(&self, language: &str) -> String {
        self.languages
            .read()
            .get_language(language)
            .map(|lang| lang.code.clone())
            .unwrap_or_else(|| language.to_string())
    }

    /// Set the current (user) language of the default context.
    ///
    /// # Errors
    /// `LanguageNotFound` if the language is not registered.
    pub fn set_language(&self, language: &str) -> Result<()> {
        self.set_user_language(language, None)
    }

    /// The language of the default context's active space.
    pub fn current_language(&self) -> Result<String> {
        let contexts = self.contexts.read();
        let context = contexts.get_context(&self.config.context_key)?;
        Ok(context.active_language().to_string())
    }

    // ==================== Components ====================

    /// Register a component.
    ///
    /// # Errors
    /// * `DuplicateComponent` if its id or an alias is taken
    /// * `IncompleteRegistration` in strict mode when strings are missing
    /// * `ValidationFailed` when partial registration is disabled and the
    ///   fallback language lacks keys
    pub fn register(&self, definition: ComponentDefinition) -> Result<ValidationResult> {
        let (languages, fallback) = self.registration_languages();
        let result =
            self.components
                .write()
                .register(definition, &languages, &fallback, self.policy())?;
        if !result.is_valid {
            warn!(
                "Component registered with {} missing string(s)",
                result.missing_keys.len()
            );
        }
        Ok(result)
    }

    /// Register a component unless its id or an alias is already taken.
    pub fn register_if_not_exists(&self, definition: ComponentDefinition) -> Result<ValidationResult> {
        let (languages, fallback) = self.registration_languages();
        self.components
            .write()
            .register_if_not_exists(definition, &languages, &fallback, self.policy())
    }

    /// Merge additional language tables into an existing component.
    ///
    /// # Errors
    /// `ComponentNotFound` if no component has this id or alias.
    pub fn update(&self, component: &str, strings: StringTables) -> Result<ValidationResult> {
        let (languages, _) = self.registration_languages();
        self.components
            .write()
            .update(component, strings, &languages, self.policy())
    }

    fn registration_languages(&self) -> (Vec<String>, String) {
        let fallback = self.fallback_language();
        (self.languages.read().ids(), fallback)
    }

    pub fn has_component(&self, id_or_alias: &str) -> bool {
        self.components.read().has_component(id_or_alias)
    }

    /// The canonical id behind a component id or alias.
    pub fn resolve_component_id(&self, id_or_alias: &str) -> Option<String> {
        self.components
            .read()
            .resolve_id(id_or_alias)
            .map(str::to_string)
    }

    pub fn component_ids(&self) -> Vec<String> {
        self.components.read().component_ids()
    }

    /// Check every component against every language.
    pub fn validate_all_components(&self) -> ValidationResult {
        let languages = self.languages.read().ids();
        self.components.read().validate_all(&languages)
    }

    // ==================== Translation ====================

    /// Translate one key of one component.
    ///
    /// Keys ending in `Template`/`template` get `{name}` substitution from the
    /// caller's variables, the context, and the constants, in that order.
    ///
    /// # Errors
    /// `ComponentNotFound` or `StringKeyNotFound`.
    pub fn translate(
        &self,
        component: &str,
        key: &str,
        variables: Option<&Variables>,
        language: Option<&str>,
    ) -> Result<String> {
        self.translate_detailed(component, key, variables, language)
            .map(|result| result.value)
    }

    /// Like `translate`, also reporting which language supplied the string.
    pub fn translate_detailed(
        &self,
        component: &str,
        key: &str,
        variables: Option<&Variables>,
        language: Option<&str>,
    ) -> Result<TranslationResult> {
        let (language, substituted) = self.resolve_request_language(language);
        let merged = self.merged_variables(variables.into_iter());
        self.translate_resolved(component, key, &merged, &language, substituted)
    }

    /// Translate, returning `[component.key]` instead of any error.
    pub fn safe_translate(
        &self,
        component: &str,
        key: &str,
        variables: Option<&Variables>,
        language: Option<&str>,
    ) -> String {
        match self.translate(component, key, variables, language) {
            Ok(value) => value,
            Err(e) => self.placeholder(component, key, &e),
        }
    }

    fn placeholder(&self, component: &str, key: &str, error: &I18nError) -> String {
        debug!("Falling back to placeholder for {}.{}: {}", component, key, error);
        self.metrics.record_placeholder();
        I18nError::placeholder(component, key)
    }

    /// `substituted` marks a request whose own language was unknown and has
    /// already been replaced by the fallback language.
    fn translate_resolved(
        &self,
        component: &str,
        key: &str,
        variables: &Variables,
        language: &str,
        substituted: bool,
    ) -> Result<TranslationResult> {
        let (raw, source, was_fallback) = {
            let components = self.components.read();
            let registered = components
                .get(component)
                .ok_or_else(|| I18nError::ComponentNotFound(component.to_string()))?;
            let found = registered.lookup(key, language).ok_or_else(|| {
                I18nError::StringKeyNotFound {
                    component: registered.id.clone(),
                    key: key.to_string(),
                }
            })?;
            (
                found.value.to_string(),
                found.language.to_string(),
                found.was_fallback || substituted,
            )
        };

        let value = self.render(key, &raw, variables, &source)?;
        self.metrics.record_translation(was_fallback);
        Ok(TranslationResult {
            value,
            language: source,
            was_fallback,
        })
    }

    fn render(&self, key: &str, raw: &str, variables: &Variables, language: &str) -> Result<String> {
        if let Some(formatter) = &self.formatter {
            if uses_message_grammar(raw) {
                return formatter.format_message(raw, variables, &self.locale_code(language));
            }
        }
        if is_template_key(key) {
            Ok(substitute_variables(raw, variables))
        } else {
            Ok(raw.to_string())
        }
    }

    /// Build the variable table for a resolution.
    ///
    /// Lowest to highest priority: constants, context-derived variables,
    /// then each caller table left to right.
    fn merged_variables<'a, I>(&self, variables: I) -> Variables
    where
        I: Iterator<Item = &'a Variables>,
    {
        let mut merged = self.constants.read().get_merged();
        {
            let contexts = self.contexts.read();
            if let Ok(context) = contexts.get_context(&self.config.context_key) {
                merged.overlay(&context.variables());
            }
        }
        for vars in variables {
            merged.overlay(vars);
        }
        merged
    }

    /// Process free-form text: resolve `{{Identifier.key}}` references, then
    /// substitute `{name}` variables. Never fails.
    ///
    /// `Identifier` may be a component id, an alias, or an enumeration name.
    /// Later variable tables override earlier ones.
    pub fn t(&self, template: &str, language: Option<&str>, variables: &[&Variables]) -> String {
        let (language, substituted) = self.resolve_request_language(language);
        let merged = self.merged_variables(variables.iter().copied());

        let mut resolved = String::with_capacity(template.len());
        for segment in scan_references(template) {
            match segment {
                Segment::Literal(text) => resolved.push_str(text),
                Segment::Reference { identifier, key } => {
                    resolved.push_str(&self.resolve_reference(identifier, key, &merged, &language, substituted))
                }
            }
        }

        substitute_variables(&resolved, &merged)
    }

    fn resolve_reference(
        &self,
        identifier: &str,
        key: &str,
        variables: &Variables,
        language: &str,
        substituted: bool,
    ) -> String {
        let component = self
            .components
            .read()
            .resolve_id(identifier)
            .map(str::to_string);
        if let Some(component) = component {
            return self.safe_translate_resolved(&component, key, variables, language, substituted);
        }

        let enum_id = self.enums.read().resolve_id(identifier).map(str::to_string);
        if let Some(enum_id) = enum_id {
            let fallback = self.fallback_language();
            let text = self
                .enums
                .read()
                .lookup_key(&enum_id, key, &[language, &fallback]);
            if let Some(text) = text {
                self.metrics.record_translation(substituted);
                return text;
            }
            return self.safe_translate_resolved(&enum_id, key, variables, language, substituted);
        }

        self.placeholder(
            identifier,
            key,
            &I18nError::ComponentNotFound(identifier.to_string()),
        )
    }

    fn safe_translate_resolved(
        &self,
        component: &str,
        key: &str,
        variables: &Variables,
        language: &str,
        substituted: bool,
    ) -> String {
        match self.translate_resolved(component, key, variables, language, substituted) {
            Ok(result) => result.value,
            Err(e) => self.placeholder(component, key, &e),
        }
    }

    // ==================== Enumerations ====================

    /// Register an enumeration under its explicit component-id tag.
    pub fn register_enum(&self, definition: EnumDefinition) -> Result<()> {
        self.enums.write().register(definition)
    }

    pub fn has_enum(&self, id_or_name: &str) -> bool {
        self.enums.read().has_enum(id_or_name)
    }

    /// Translate an enumeration value.
    ///
    /// Numeric values are looked up by value first and by member name second,
    /// in the requested language and then the fallback language.
    pub fn translate_enum(
        &self,
        enum_ref: &str,
        value: &EnumValue,
        language: Option<&str>,
    ) -> Result<String> {
        let (language, substituted) = self.resolve_request_language(language);
        let fallback = self.fallback_language();
        let text = self
            .enums
            .read()
            .translate(enum_ref, value, &[&language, &fallback])?;
        self.metrics.record_translation(substituted);
        Ok(text)
    }

    /// Translate a Rust enum that carries its registry tag.
    pub fn translate_enum_of<E: TranslatableEnum>(&self, value: &E, language: Option<&str>) -> Result<String> {
        self.translate_enum(E::enum_id(), &value.to_enum_value(), language)
    }

    /// Translate an enumeration value, returning `[enum.value]` instead of any error.
    pub fn safe_translate_enum(&self, enum_ref: &str, value: &EnumValue, language: Option<&str>) -> String {
        match self.translate_enum(enum_ref, value, language) {
            Ok(text) => text,
            Err(e) => self.placeholder(enum_ref, &value.to_string(), &e),
        }
    }

    // ==================== Constants ====================

    /// Register constants for a component (first writer owns each name).
    ///
    /// # Errors
    /// `ConstantConflict` if another component owns a name with a different value.
    pub fn register_constants(&self, component: &str, values: &Variables) -> Result<()> {
        self.constants.write().register(component, values)
    }

    /// Merge constants and take ownership of every touched name.
    pub fn update_constants(&self, component: &str, values: &Variables) {
        self.constants.write().update(component, values)
    }

    /// Merge constants without conflict checks or ownership transfer.
    pub fn merge_constants(&self, component: &str, values: &Variables) {
        self.constants.write().merge(component, values)
    }

    /// Replace a component's constants entirely.
    pub fn replace_constants(&self, component: &str, values: &Variables) {
        self.constants.write().replace(component, values)
    }

    pub fn resolve_constant_owner(&self, name: &str) -> Option<String> {
        self.constants.read().resolve_owner(name).map(str::to_string)
    }

    /// All constants folded into one table.
    pub fn constants(&self) -> Variables {
        self.constants.read().get_merged()
    }

    // ==================== Context ====================

    /// Validate a currency code against this engine's locale data.
    pub fn currency(&self, code: &str) -> Result<CurrencyCode> {
        CurrencyCode::new(code, self.locale_data())
    }

    /// Validate a timezone against this engine's locale data.
    pub fn timezone(&self, name: &str) -> Result<Timezone> {
        Timezone::new(name, self.locale_data())
    }

    /// Create (or recreate) a context under `key`.
    ///
    /// # Errors
    /// `LanguageNotFound` if either language is not registered.
    pub fn create_context(
        &self,
        default_language: &str,
        default_admin_language: Option<&str>,
        key: &str,
    ) -> Result<ActiveContext> {
        let language = self.require_language(default_language)?;
        let admin_language = default_admin_language
            .map(|lang| self.require_language(lang))
            .transpose()?;
        let mut contexts = self.contexts.write();
        Ok(contexts
            .create_context(&language, admin_language.as_deref(), key)
            .clone())
    }

    /// A copy of the context under `key` (the engine's own context when `None`).
    pub fn get_context(&self, key: Option<&str>) -> Result<ActiveContext> {
        self.contexts
            .read()
            .get_context(self.context_key(key))
            .cloned()
    }

    /// Apply a partial update after validating its languages.
    pub fn set_context(&self, update: ContextUpdate, key: Option<&str>) -> Result<()> {
        let update = ContextUpdate {
            language: update
                .language
                .map(|lang| self.require_language(&lang))
                .transpose()?,
            admin_language: update
                .admin_language
                .map(|lang| self.require_language(&lang))
                .transpose()?,
            ..update
        };
        self.contexts.write().apply(self.context_key(key), update)
    }

    /// Context-derived template variables of the engine's own context.
    pub fn context_variables(&self) -> Result<Variables> {
        let contexts = self.contexts.read();
        Ok(contexts.get_context(&self.config.context_key)?.variables())
    }

    pub fn user_language(&self, key: Option<&str>) -> Result<String> {
        self.contexts
            .read()
            .user_language(self.context_key(key))
            .map(str::to_string)
    }

    pub fn set_user_language(&self, language: &str, key: Option<&str>) -> Result<()> {
        let language = self.require_language(language)?;
        self.contexts
            .write()
            .set_user_language(&language, self.context_key(key))
    }

    pub fn admin_language(&self, key: Option<&str>) -> Result<String> {
        self.contexts
            .read()
            .admin_language(self.context_key(key))
            .map(str::to_string)
    }

    pub fn set_admin_language(&self, language: &str, key: Option<&str>) -> Result<()> {
        let language = self.require_language(language)?;
        self.contexts
            .write()
            .set_admin_language(&language, self.context_key(key))
    }

    pub fn currency_code(&self, key: Option<&str>) -> Result<CurrencyCode> {
        self.contexts
            .read()
            .currency_code(self.context_key(key))
            .cloned()
    }

    pub fn set_currency_code(&self, code: &str, key: Option<&str>) -> Result<()> {
        let code = self.currency(code)?;
        self.contexts
            .write()
            .set_currency_code(code, self.context_key(key))
    }

    pub fn user_timezone(&self, key: Option<&str>) -> Result<Timezone> {
        self.contexts
            .read()
            .user_timezone(self.context_key(key))
            .cloned()
    }

    pub fn set_user_timezone(&self, tz: &str, key: Option<&str>) -> Result<()> {
        let tz = self.timezone(tz)?;
        self.contexts
            .write()
            .set_user_timezone(tz, self.context_key(key))
    }

    pub fn admin_timezone(&self, key: Option<&str>) -> Result<Timezone> {
        self.contexts
            .read()
            .admin_timezone(self.context_key(key))
            .cloned()
    }

    pub fn set_admin_timezone(&self, tz: &str, key: Option<&str>) -> Result<()> {
        let tz = self.timezone(tz)?;
        self.contexts
            .write()
            .set_admin_timezone(tz, self.context_key(key))
    }

    pub fn language_context_space(&self, key: Option<&str>) -> Result<LanguageContextSpace> {
        self.contexts
            .read()
            .language_context_space(self.context_key(key))
    }

    pub fn set_language_context_space(
        &self,
        space: LanguageContextSpace,
        key: Option<&str>,
    ) -> Result<()> {
        self.contexts
            .write()
            .set_language_context_space(space, self.context_key(key))
    }

    /// Discard every context, including the engine's own.
    pub fn clear_contexts(&self) {
        self.contexts.write().clear_all();
    }
}
