//! Component registry: per-component multilingual string tables.
//!
//! Component ids and aliases share one namespace. Registration computes the
//! component's required key set and checks every registered language against
//! it. Strict registrations fail on any gap; permissive ones are stored with
//! the gaps backfilled from the fallback language and reported as missing.

use super::validator::{PlaceholderValidator, ValidationResult};
use crate::error::{I18nError, MissingKey, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::{debug, info, warn};

/// Language id to (string key to value).
pub type StringTables = BTreeMap<String, BTreeMap<String, String>>;

/// A component as supplied by its author.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDefinition {
    pub id: String,

    #[serde(default)]
    pub aliases: Vec<String>,

    /// Declared key list; when absent the union of all tables' keys is used
    #[serde(default)]
    pub string_keys: Option<Vec<String>>,

    /// Language used to fill gaps; defaults to the engine's fallback language
    #[serde(default)]
    pub fallback_language: Option<String>,

    #[serde(default)]
    pub strings: StringTables,
}

impl ComponentDefinition {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn with_string_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.string_keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_fallback_language(mut self, language: impl Into<String>) -> Self {
        self.fallback_language = Some(language.into());
        self
    }

    /// Add (or extend) one language's table.
    pub fn with_strings<I, K, V>(mut self, language: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let table = self.strings.entry(language.into()).or_default();
        for (key, value) in entries {
            table.insert(key.into(), value.into());
        }
        self
    }

    /// Every identifier this component claims: its id followed by its aliases.
    fn identifiers(&self) -> Vec<&str> {
        let mut ids = vec![self.id.as_str()];
        for alias in &self.aliases {
            if !ids.contains(&alias.as_str()) {
                ids.push(alias.as_str());
            }
        }
        ids
    }
}

/// How a registration treats gaps in the string tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationPolicy {
    /// Any missing (language, key) pair rejects the registration
    pub require_complete_strings: bool,

    /// The fallback language itself may lack required keys
    pub allow_partial_registration: bool,
}

/// A stored component.
#[derive(Debug, Clone)]
pub struct RegisteredComponent {
    pub id: String,
    pub aliases: Vec<String>,
    pub fallback_language: String,
    required_keys: BTreeSet<String>,
    declared_keys: bool,
    strings: StringTables,
    backfilled: HashSet<MissingKey>,
}

/// A string found for a (component, key, language) request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringLookup<'a> {
    pub value: &'a str,
    /// Language whose table supplied the value
    pub language: &'a str,
    pub was_fallback: bool,
}

impl RegisteredComponent {
    pub fn required_keys(&self) -> &BTreeSet<String> {
        &self.required_keys
    }

    pub fn strings(&self) -> &StringTables {
        &self.strings
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.required_keys.contains(key)
            || self.strings.values().any(|table| table.contains_key(key))
    }

    /// Look up a key for a language, substituting the fallback language's value.
    ///
    /// Values copied in at registration time count as fallbacks too.
    pub fn lookup(&self, key: &str, language: &str) -> Option<StringLookup<'_>> {
        if let Some((lang, value)) = self
            .strings
            .get_key_value(language)
            .and_then(|(lang, table)| table.get(key).map(|value| (lang, value)))
        {
            let was_fallback = self
                .backfilled
                .contains(&(language.to_string(), key.to_string()));
            let source = if was_fallback {
                self.fallback_language.as_str()
            } else {
                lang.as_str()
            };
            return Some(StringLookup {
                value,
                language: source,
                was_fallback,
            });
        }

        self.strings
            .get(&self.fallback_language)
            .and_then(|table| table.get(key))
            .map(|value| StringLookup {
                value,
                language: self.fallback_language.as_str(),
                was_fallback: true,
            })
    }

    /// Pairs with no entry of their own, ignoring backfilled copies.
    fn missing_pairs(&self, languages: &[String]) -> Vec<MissingKey> {
        let mut missing = Vec::new();
        for language in languages {
            let table = self.strings.get(language);
            for key in &self.required_keys {
                let own = table.is_some_and(|t| t.contains_key(key))
                    && !self.backfilled.contains(&(language.clone(), key.clone()));
                if !own {
                    missing.push((language.clone(), key.clone()));
                }
            }
        }
        missing
    }

    /// Pairs that no read can satisfy, even through the fallback language.
    fn unresolvable_pairs(&self, languages: &[String]) -> Vec<MissingKey> {
        let mut missing = Vec::new();
        for language in languages {
            for key in &self.required_keys {
                if self.lookup(key, language).is_none() {
                    missing.push((language.clone(), key.clone()));
                }
            }
        }
        missing
    }

    fn recompute_required_keys(&mut self) {
        if self.declared_keys {
            return;
        }
        self.required_keys = self
            .strings
            .values()
            .flat_map(|table| table.keys().cloned())
            .collect();
    }

    /// Copy fallback values into every gap the fallback language can fill.
    fn backfill(&mut self, missing: &[MissingKey]) -> usize {
        let Some(fallback) = self.strings.get(&self.fallback_language).cloned() else {
            return 0;
        };

        let mut filled = 0;
        for (language, key) in missing {
            if *language == self.fallback_language {
                continue;
            }
            if let Some(value) = fallback.get(key) {
                self.strings
                    .entry(language.clone())
                    .or_default()
                    .insert(key.clone(), value.clone());
                self.backfilled.insert((language.clone(), key.clone()));
                filled += 1;
            }
        }
        filled
    }
}

/// Registry of components keyed by canonical id, with an alias index.
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    components: HashMap<String, RegisteredComponent>,
    /// Every id and alias to its canonical id
    identifiers: HashMap<String, String>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component.
    ///
    /// # Arguments
    /// * `definition` - The component's id, aliases, and tables
    /// * `languages` - Every language registered with the engine
    /// * `default_fallback` - Fallback language when the component names none
    /// * `policy` - Strictness of the completeness check
    ///
    /// # Errors
    /// * `DuplicateComponent` if the id or any alias is already in use
    /// * `IncompleteRegistration` in strict mode when any pair is missing
    /// * `ValidationFailed` when the fallback language lacks required keys
    ///   and partial registration is not allowed
    pub fn register(
        &mut self,
        definition: ComponentDefinition,
        languages: &[String],
        default_fallback: &str,
        policy: RegistrationPolicy,
    ) -> Result<ValidationResult> {
        if let Some(taken) = definition
            .identifiers()
            .into_iter()
            .find(|id| self.identifiers.contains_key(*id))
        {
            return Err(I18nError::DuplicateComponent(taken.to_string()));
        }

        let fallback_language = definition
            .fallback_language
            .clone()
            .unwrap_or_else(|| default_fallback.to_string());

        let declared_keys = definition.string_keys.is_some();
        let mut component = RegisteredComponent {
            id: definition.id.clone(),
            aliases: definition.aliases.clone(),
            fallback_language,
            required_keys: BTreeSet::new(),
            declared_keys,
            strings: definition.strings.clone(),
            backfilled: HashSet::new(),
        };
        if let Some(keys) = &definition.string_keys {
            component.required_keys = keys.iter().cloned().collect();
        } else {
            component.recompute_required_keys();
        }

        let missing = component.missing_pairs(languages);
        if policy.require_complete_strings && !missing.is_empty() {
            warn!(
                "Rejected component '{}': {} missing string(s)",
                component.id,
                missing.len()
            );
            return Err(I18nError::IncompleteRegistration {
                component: component.id,
                missing,
            });
        }

        let fallback_gaps: Vec<&str> = missing
            .iter()
            .filter(|(language, _)| *language == component.fallback_language)
            .map(|(_, key)| key.as_str())
            .collect();
        if !policy.allow_partial_registration && !fallback_gaps.is_empty() {
            return Err(I18nError::ValidationFailed(format!(
                "component '{}' fallback language '{}' is missing keys: {}",
                component.id,
                component.fallback_language,
                fallback_gaps.join(", ")
            )));
        }

        let mut result = ValidationResult::new();
        for (language, key) in &missing {
            result.add_missing(language, key);
            result.add_warning(format!(
                "Missing string '{}' for language '{}' in component '{}'",
                key, language, component.id
            ));
        }
        for warning in
            PlaceholderValidator::validate(&component.id, &component.fallback_language, &component.strings)
        {
            result.add_warning(warning);
        }

        let filled = component.backfill(&missing);
        if filled > 0 {
            debug!(
                "Backfilled {} string(s) in '{}' from '{}'",
                filled, component.id, component.fallback_language
            );
        }

        for id in definition.identifiers() {
            self.identifiers.insert(id.to_string(), component.id.clone());
        }
        info!(
            "Registered component '{}' ({} key(s), {} alias(es))",
            component.id,
            component.required_keys.len(),
            component.aliases.len()
        );
        self.components.insert(component.id.clone(), component);

        Ok(result)
    }

    /// Register only if none of the component's identifiers is in use.
    ///
    /// An existing registration makes this a no-op that reports success.
    pub fn register_if_not_exists(
        &mut self,
        definition: ComponentDefinition,
        languages: &[String],
        default_fallback: &str,
        policy: RegistrationPolicy,
    ) -> Result<ValidationResult> {
        if definition
            .identifiers()
            .into_iter()
            .any(|id| self.identifiers.contains_key(id))
        {
            debug!("Component '{}' already registered, skipping", definition.id);
            return Ok(ValidationResult::new());
        }
        self.register(definition, languages, default_fallback, policy)
    }

    /// Merge additional strings into an existing component.
    ///
    /// Supplied values replace backfilled copies. In permissive mode any new
    /// gaps are backfilled again.
    pub fn update(
        &mut self,
        id_or_alias: &str,
        strings: StringTables,
        languages: &[String],
        policy: RegistrationPolicy,
    ) -> Result<ValidationResult> {
        let canonical = self
            .resolve_id(id_or_alias)
            .ok_or_else(|| I18nError::ComponentNotFound(id_or_alias.to_string()))?
            .to_string();
        let component = self
            .components
            .get_mut(&canonical)
            .ok_or_else(|| I18nError::ComponentNotFound(canonical.clone()))?;

        for (language, entries) in strings {
            let table = component.strings.entry(language.clone()).or_default();
            for (key, value) in entries {
                component.backfilled.remove(&(language.clone(), key.clone()));
                table.insert(key, value);
            }
        }
        component.recompute_required_keys();

        let missing = component.missing_pairs(languages);
        let mut result = ValidationResult::new();
        for (language, key) in &missing {
            result.add_missing(language, key);
        }
        if !policy.require_complete_strings {
            component.backfill(&missing);
        }

        debug!("Updated component '{}'", canonical);
        Ok(result)
    }

    /// Resolve an id or alias to the canonical component id.
    pub fn resolve_id(&self, id_or_alias: &str) -> Option<&str> {
        self.identifiers.get(id_or_alias).map(String::as_str)
    }

    pub fn get(&self, id_or_alias: &str) -> Option<&RegisteredComponent> {
        self.resolve_id(id_or_alias)
            .and_then(|id| self.components.get(id))
    }

    pub fn has_component(&self, id_or_alias: &str) -> bool {
        self.identifiers.contains_key(id_or_alias)
    }

    /// Canonical ids, sorted.
    pub fn component_ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.components.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Check that every read of every required key can resolve to some string.
    pub fn validate_all(&self, languages: &[String]) -> ValidationResult {
        let mut result = ValidationResult::new();
        for id in self.component_ids() {
            let Some(component) = self.components.get(&id) else {
                continue;
            };
            for (language, key) in component.unresolvable_pairs(languages) {
                result.add_missing(&language, &key);
                result.add_error(format!(
                    "No string for '{}' in component '{}' (language '{}' or fallback '{}')",
                    key, id, language, component.fallback_language
                ));
            }
        }
        result
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}
