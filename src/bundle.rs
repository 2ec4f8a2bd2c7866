//! JSON bundles: languages, components, enumerations, and constants in one file.
//!
//! ```json
//! {
//!   "languages": [{ "id": "en", "name": "English", "code": "en-US", "isDefault": true }],
//!   "components": [{ "id": "app", "strings": { "en": { "welcome": "Hi" } } }],
//!   "enums": [{ "componentId": "enum.status", "name": "Status", "translations": {} }],
//!   "constants": { "app": { "siteName": "Example" } }
//! }
//! ```

use crate::config::EngineConfig;
use crate::engine::I18nEngine;
use crate::i18n::{ComponentDefinition, EnumDefinition, LanguageDefinition, Value, Variables};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Bundle {
    #[serde(default)]
    pub languages: Vec<LanguageDefinition>,

    #[serde(default)]
    pub components: Vec<ComponentDefinition>,

    #[serde(default)]
    pub enums: Vec<EnumDefinition>,

    /// Constants per owning component
    #[serde(default)]
    pub constants: BTreeMap<String, BTreeMap<String, serde_json::Value>>,
}

impl Bundle {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse i18n bundle")
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read i18n bundle {}", path.display()))?;
        Self::from_json_str(&json)
    }

    /// Build a new engine holding everything in the bundle.
    pub fn build_engine(self, config: EngineConfig) -> Result<I18nEngine> {
        let languages = self.languages.clone();
        let engine = I18nEngine::new(languages, config)?;
        self.install(&engine)?;
        Ok(engine)
    }

    /// Register the bundle's components, enumerations, and constants into an
    /// existing engine. Languages the engine lacks are registered first.
    pub fn install(self, engine: &I18nEngine) -> Result<()> {
        for language in self.languages {
            if !engine.has_language(&language.id) {
                engine.register_language(language)?;
            }
        }

        let component_count = self.components.len();
        for component in self.components {
            let id = component.id.clone();
            engine
                .register(component)
                .with_context(|| format!("Failed to register component '{}'", id))?;
        }

        for definition in self.enums {
            engine.register_enum(definition)?;
        }

        for (component, values) in self.constants {
            let mut variables = Variables::new();
            for (name, value) in values {
                variables.insert(name.as_str(), json_value(&name, value)?);
            }
            engine
                .register_constants(&component, &variables)
                .with_context(|| format!("Failed to register constants for '{}'", component))?;
        }

        info!("Installed bundle with {} component(s)", component_count);
        Ok(())
    }
}

fn json_value(name: &str, value: serde_json::Value) -> Result<Value> {
    Ok(match value {
        serde_json::Value::String(text) => Value::Text(text),
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => Value::Float(n.as_f64().unwrap_or_default()),
        },
        other => bail!("Constant '{}' must be a string, number, or bool, got {}", name, other),
    })
}
