//! Enumeration translations.
//!
//! Enumerations are identified by an explicit component-id tag carried with
//! the definition, never by the identity of any Rust value. The display name
//! is indexed separately so templates can write `{{Status.Active}}`.

use crate::error::{I18nError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tracing::debug;

/// The value of one enumeration member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnumValue {
    Int(i64),
    Str(String),
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumValue::Int(n) => write!(f, "{}", n),
            EnumValue::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EnumValue {
    fn from(value: i64) -> Self {
        EnumValue::Int(value)
    }
}

impl From<&str> for EnumValue {
    fn from(value: &str) -> Self {
        EnumValue::Str(value.to_string())
    }
}

/// One named member of an enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumMember {
    pub name: String,
    pub value: EnumValue,
}

/// An enumeration as supplied by its author.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumDefinition {
    /// Explicit registry tag
    pub component_id: String,

    /// Name templates use to reference the enumeration
    pub name: String,

    #[serde(default)]
    pub members: Vec<EnumMember>,

    /// Language id to (value string or member name to translation)
    #[serde(default)]
    pub translations: BTreeMap<String, BTreeMap<String, String>>,
}

impl EnumDefinition {
    pub fn new(component_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            component_id: component_id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_member(mut self, name: impl Into<String>, value: impl Into<EnumValue>) -> Self {
        self.members.push(EnumMember {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn with_translations<I, K, V>(mut self, language: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let table = self.translations.entry(language.into()).or_default();
        for (key, value) in entries {
            table.insert(key.into(), value.into());
        }
        self
    }
}

/// Rust enums that carry their registry tag explicitly.
pub trait TranslatableEnum {
    /// The component-id tag the enumeration was registered under.
    fn enum_id() -> &'static str;

    fn to_enum_value(&self) -> EnumValue;
}

/// Registered enumerations keyed by tag, with a name index.
#[derive(Debug, Clone, Default)]
pub struct EnumRegistry {
    enums: HashMap<String, EnumDefinition>,
    names: HashMap<String, String>,
}

impl EnumRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an enumeration, merging into an existing one with the same tag.
    ///
    /// # Errors
    /// `DuplicateEnum` if the name is already bound to a different tag.
    pub fn register(&mut self, definition: EnumDefinition) -> Result<()> {
        if let Some(existing) = self.names.get(&definition.name) {
            if *existing != definition.component_id {
                return Err(I18nError::DuplicateEnum {
                    name: definition.name,
                    existing: existing.clone(),
                });
            }
        }

        self.names
            .insert(definition.name.clone(), definition.component_id.clone());

        match self.enums.get_mut(&definition.component_id) {
            Some(current) => {
                for member in definition.members {
                    if !current.members.contains(&member) {
                        current.members.push(member);
                    }
                }
                for (language, table) in definition.translations {
                    current.translations.entry(language).or_default().extend(table);
                }
                debug!("Merged enumeration '{}'", current.component_id);
            }
            None => {
                debug!(
                    "Registered enumeration '{}' as '{}'",
                    definition.name, definition.component_id
                );
                self.enums
                    .insert(definition.component_id.clone(), definition);
            }
        }
        Ok(())
    }

    /// Resolve a tag or a registered name to the tag.
    pub fn resolve_id(&self, id_or_name: &str) -> Option<&str> {
        if let Some((id, _)) = self.enums.get_key_value(id_or_name) {
            return Some(id.as_str());
        }
        self.names.get(id_or_name).map(String::as_str)
    }

    pub fn get(&self, id_or_name: &str) -> Option<&EnumDefinition> {
        self.resolve_id(id_or_name).and_then(|id| self.enums.get(id))
    }

    pub fn has_enum(&self, id_or_name: &str) -> bool {
        self.resolve_id(id_or_name).is_some()
    }

    /// Translate a value, trying each language in order.
    ///
    /// For every language the value's own string form is looked up first;
    /// numeric values then fall back to their member name.
    pub fn translate(&self, id_or_name: &str, value: &EnumValue, languages: &[&str]) -> Result<String> {
        let definition = self
            .get(id_or_name)
            .ok_or_else(|| I18nError::EnumNotFound(id_or_name.to_string()))?;

        let value_key = value.to_string();
        let member_name = match value {
            EnumValue::Int(_) => definition
                .members
                .iter()
                .find(|member| member.value == *value)
                .map(|member| member.name.as_str()),
            EnumValue::Str(_) => None,
        };

        for language in languages {
            let Some(table) = definition.translations.get(*language) else {
                continue;
            };
            if let Some(text) = table.get(&value_key) {
                return Ok(text.clone());
            }
            if let Some(text) = member_name.and_then(|name| table.get(name)) {
                return Ok(text.clone());
            }
        }

        Err(I18nError::EnumTranslationNotFound {
            enum_id: definition.component_id.clone(),
            value: value_key,
        })
    }

    /// Look up a template key (value string or member name) without errors.
    ///
    /// The key is tried verbatim first, so `"02"` never collapses to `"2"`;
    /// a numeric key then gets the value-then-member-name lookup.
    pub fn lookup_key(&self, id_or_name: &str, key: &str, languages: &[&str]) -> Option<String> {
        let definition = self.get(id_or_name)?;
        let id = definition.component_id.as_str();
        if let Ok(text) = self.translate(id, &EnumValue::Str(key.to_string()), languages) {
            return Some(text);
        }
        if let Ok(n) = key.parse::<i64>() {
            if let Ok(text) = self.translate(id, &EnumValue::Int(n), languages) {
                return Some(text);
            }
        }
        // A member name whose own key is missing: try the member's value
        let member = definition.members.iter().find(|member| member.name == key)?;
        let value_key = member.value.to_string();
        languages.iter().find_map(|language| {
            definition
                .translations
                .get(*language)
                .and_then(|table| table.get(&value_key))
                .cloned()
        })
    }

    pub fn clear(&mut self) {
        self.enums.clear();
        self.names.clear();
    }
}
