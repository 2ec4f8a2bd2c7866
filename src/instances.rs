//! Named engine instances.
//!
//! Engines are explicit values; this store only gives them names so that
//! independent parts of a process can share one. `InstanceStore::global()`
//! is a process-wide store for callers that want one.

use crate::config::EngineConfig;
use crate::engine::I18nEngine;
use crate::error::{I18nError, Result};
use crate::i18n::LanguageDefinition;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};

/// Key used when no instance key is given.
pub const DEFAULT_INSTANCE_KEY: &str = "default";

#[derive(Debug, Default)]
pub struct InstanceStore {
    instances: Mutex<HashMap<String, Arc<I18nEngine>>>,
}

static GLOBAL: OnceLock<InstanceStore> = OnceLock::new();

impl InstanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide store.
    pub fn global() -> &'static InstanceStore {
        GLOBAL.get_or_init(InstanceStore::new)
    }

    /// Build an engine and register it under `key`.
    ///
    /// # Errors
    /// `DuplicateInstance` if the key is taken, or any engine construction error.
    pub fn create_instance(
        &self,
        languages: Vec<LanguageDefinition>,
        config: EngineConfig,
        key: Option<&str>,
    ) -> Result<Arc<I18nEngine>> {
        let key = key.unwrap_or(DEFAULT_INSTANCE_KEY);
        if self.has_instance(Some(key)) {
            return Err(I18nError::DuplicateInstance(key.to_string()));
        }
        let engine = I18nEngine::new(languages, config)?;
        self.insert(key, engine)
    }

    /// Register an already-built engine under `key`.
    pub fn insert(&self, key: &str, engine: I18nEngine) -> Result<Arc<I18nEngine>> {
        let mut instances = self.instances.lock();
        if instances.contains_key(key) {
            return Err(I18nError::DuplicateInstance(key.to_string()));
        }
        let engine = Arc::new(engine);
        instances.insert(key.to_string(), Arc::clone(&engine));
        info!("Created i18n instance '{}'", key);
        Ok(engine)
    }

    /// # Errors
    /// `InstanceNotFound` if nothing is registered under `key`.
    pub fn get_instance(&self, key: Option<&str>) -> Result<Arc<I18nEngine>> {
        let key = key.unwrap_or(DEFAULT_INSTANCE_KEY);
        self.instances
            .lock()
            .get(key)
            .cloned()
            .ok_or_else(|| I18nError::InstanceNotFound(key.to_string()))
    }

    pub fn has_instance(&self, key: Option<&str>) -> bool {
        self.instances
            .lock()
            .contains_key(key.unwrap_or(DEFAULT_INSTANCE_KEY))
    }

    /// Remove an instance. Handles already held keep working.
    pub fn remove_instance(&self, key: Option<&str>) -> Option<Arc<I18nEngine>> {
        let key = key.unwrap_or(DEFAULT_INSTANCE_KEY);
        let removed = self.instances.lock().remove(key);
        if removed.is_some() {
            debug!("Removed i18n instance '{}'", key);
        }
        removed
    }

    pub fn instance_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.instances.lock().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Drop every instance.
    pub fn reset_all(&self) {
        let mut instances = self.instances.lock();
        debug!("Resetting {} i18n instance(s)", instances.len());
        instances.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::ComponentDefinition;

    fn languages() -> Vec<LanguageDefinition> {
        vec![LanguageDefinition::new("en", "English", "en-US").as_default()]
    }

    #[test]
    fn test_create_and_get_default_instance() {
        let store = InstanceStore::new();
        let created = store
            .create_instance(languages(), EngineConfig::default(), None)
            .unwrap();
        let fetched = store.get_instance(None).unwrap();

        assert!(Arc::ptr_eq(&created, &fetched));
        assert!(store.has_instance(Some(DEFAULT_INSTANCE_KEY)));
    }

    #[test]
    fn test_duplicate_instance_rejected() {
        let store = InstanceStore::new();
        store
            .create_instance(languages(), EngineConfig::default(), Some("a"))
            .unwrap();
        let err = store
            .create_instance(languages(), EngineConfig::default(), Some("a"))
            .unwrap_err();
        assert_eq!(err, I18nError::DuplicateInstance("a".to_string()));
    }

    #[test]
    fn test_missing_instance() {
        let store = InstanceStore::new();
        let err = store.get_instance(Some("nope")).unwrap_err();
        assert_eq!(err, I18nError::InstanceNotFound("nope".to_string()));
    }

    #[test]
    fn test_instances_are_isolated() {
        let store = InstanceStore::new();
        let a = store
            .create_instance(languages(), EngineConfig::default(), Some("a"))
            .unwrap();
        let b = store
            .create_instance(languages(), EngineConfig::default(), Some("b"))
            .unwrap();

        a.register(ComponentDefinition::new("app").with_strings("en", [("k", "v")]))
            .unwrap();

        assert!(a.has_component("app"));
        assert!(!b.has_component("app"));
        assert_eq!(store.instance_keys(), vec!["a", "b"]);
    }

    #[test]
    fn test_remove_and_reset() {
        let store = InstanceStore::new();
        let held = store
            .create_instance(languages(), EngineConfig::default(), Some("a"))
            .unwrap();
        store
            .create_instance(languages(), EngineConfig::default(), Some("b"))
            .unwrap();

        assert!(store.remove_instance(Some("a")).is_some());
        assert!(!store.has_instance(Some("a")));
        assert_eq!(held.default_language().unwrap().id, "en");

        store.reset_all();
        assert!(store.instance_keys().is_empty());
    }
}
