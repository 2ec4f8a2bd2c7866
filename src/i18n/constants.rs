//! Constants registry: named values contributed by components.
//!
//! Each constant name has at most one owner. `register` claims unowned names
//! and refuses to let a second component redefine an owned name with a
//! different value. `update` transfers ownership explicitly, `merge` never
//! does, and `replace` rebuilds a component's entry from scratch.

use super::value::{Value, Variables};
use crate::error::{I18nError, Result};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

/// Per-component constant tables plus the name-to-owner index.
#[derive(Debug, Clone, Default)]
pub struct ConstantsRegistry {
    entries: BTreeMap<String, Variables>,
    owners: HashMap<String, String>,
}

impl ConstantsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register constants for a component.
    ///
    /// Unowned names are claimed by `component_id`. A name owned by another
    /// component is accepted only when the value is identical; ownership does
    /// not move. Nothing is stored if any name conflicts.
    ///
    /// # Errors
    /// `ConstantConflict` naming the first conflicting constant.
    pub fn register(&mut self, component_id: &str, values: &Variables) -> Result<()> {
        for (name, value) in values.iter() {
            if let Some(owner) = self.owners.get(name) {
                if owner != component_id && self.owned_value(name) != Some(value) {
                    return Err(I18nError::ConstantConflict {
                        name: name.clone(),
                        owner: owner.clone(),
                        attempted_by: component_id.to_string(),
                    });
                }
            }
        }

        let entry = self.entries.entry(component_id.to_string()).or_default();
        for (name, value) in values.iter() {
            entry.insert(name.clone(), value.clone());
            self.owners
                .entry(name.clone())
                .or_insert_with(|| component_id.to_string());
        }
        debug!(
            "Registered {} constant(s) for '{}'",
            values.len(),
            component_id
        );
        Ok(())
    }

    /// Merge constants into a component's entry and take ownership of every
    /// touched name, with no conflict check.
    pub fn update(&mut self, component_id: &str, values: &Variables) {
        let entry = self.entries.entry(component_id.to_string()).or_default();
        for (name, value) in values.iter() {
            entry.insert(name.clone(), value.clone());
            if let Some(previous) = self.owners.insert(name.clone(), component_id.to_string()) {
                if previous != component_id {
                    info!(
                        "Constant '{}' ownership transferred from '{}' to '{}'",
                        name, previous, component_id
                    );
                }
            }
        }
    }

    /// Merge constants into a component's entry without raising conflicts or
    /// taking names that another component owns.
    pub fn merge(&mut self, component_id: &str, values: &Variables) {
        let entry = self.entries.entry(component_id.to_string()).or_default();
        for (name, value) in values.iter() {
            entry.insert(name.clone(), value.clone());
            self.owners
                .entry(name.clone())
                .or_insert_with(|| component_id.to_string());
        }
    }

    /// Discard a component's entry and install `values` in its place.
    ///
    /// Names this component owned but no longer defines pass to another
    /// component that still carries them, or become unowned. Every new name
    /// is owned by `component_id`.
    pub fn replace(&mut self, component_id: &str, values: &Variables) {
        self.entries.remove(component_id);

        let released: Vec<String> = self
            .owners
            .iter()
            .filter(|(name, owner)| *owner == component_id && !values.contains(name))
            .map(|(name, _)| name.clone())
            .collect();
        for name in released {
            let heir = self
                .entries
                .iter()
                .find(|(_, entry)| entry.contains(&name))
                .map(|(id, _)| id.clone());
            match heir {
                Some(heir) => {
                    self.owners.insert(name, heir);
                }
                None => {
                    self.owners.remove(&name);
                }
            }
        }

        for (name, _) in values.iter() {
            self.owners.insert(name.clone(), component_id.to_string());
        }
        self.entries.insert(component_id.to_string(), values.clone());
        debug!(
            "Replaced constants for '{}' ({} value(s))",
            component_id,
            values.len()
        );
    }

    /// The component owning a constant name, if any.
    pub fn resolve_owner(&self, name: &str) -> Option<&str> {
        self.owners.get(name).map(String::as_str)
    }

    /// A component's own constant table.
    pub fn get(&self, component_id: &str) -> Option<&Variables> {
        self.entries.get(component_id)
    }

    /// The value of a constant as its owner defines it.
    pub fn owned_value(&self, name: &str) -> Option<&Value> {
        let owner = self.owners.get(name)?;
        self.entries.get(owner)?.get(name)
    }

    /// Fold every component's constants into one table.
    ///
    /// Each name takes its owner's value, so a transferred constant never
    /// resolves to a stale copy left in the previous owner's entry.
    pub fn get_merged(&self) -> Variables {
        let mut merged = Variables::new();
        for entry in self.entries.values() {
            merged.overlay(entry);
        }
        for name in self.owners.keys() {
            if let Some(value) = self.owned_value(name) {
                merged.insert(name.clone(), value.clone());
            }
        }
        merged
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.owners.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(value: &str) -> Variables {
        Variables::new().with("Site", value)
    }

    // ==================== Register Tests ====================

    #[test]
    fn test_register_claims_ownership() {
        let mut registry = ConstantsRegistry::new();
        registry.register("x", &site("A")).unwrap();

        assert_eq!(registry.resolve_owner("Site"), Some("x"));
        assert_eq!(registry.owned_value("Site"), Some(&Value::from("A")));
    }

    #[test]
    fn test_register_conflicting_value_rejected() {
        let mut registry = ConstantsRegistry::new();
        registry.register("x", &site("A")).unwrap();

        let err = registry.register("y", &site("B")).unwrap_err();
        assert_eq!(
            err,
            I18nError::ConstantConflict {
                name: "Site".to_string(),
                owner: "x".to_string(),
                attempted_by: "y".to_string(),
            }
        );
        assert!(registry.get("y").is_none());
    }

    #[test]
    fn test_register_identical_value_tolerated() {
        let mut registry = ConstantsRegistry::new();
        registry.register("x", &site("A")).unwrap();
        registry.register("y", &site("A")).unwrap();

        assert_eq!(registry.resolve_owner("Site"), Some("x"));
        assert!(registry.get("y").unwrap().contains("Site"));
    }

    #[test]
    fn test_register_same_triple_is_noop() {
        let mut registry = ConstantsRegistry::new();
        registry.register("x", &site("A")).unwrap();
        registry.register("x", &site("A")).unwrap();

        assert_eq!(registry.get("x").unwrap().len(), 1);
        assert_eq!(registry.resolve_owner("Site"), Some("x"));
    }

    #[test]
    fn test_register_conflict_is_atomic() {
        let mut registry = ConstantsRegistry::new();
        registry.register("x", &site("A")).unwrap();

        let values = Variables::new().with("Other", "1").with("Site", "B");
        assert!(registry.register("y", &values).is_err());
        assert_eq!(registry.resolve_owner("Other"), None);
    }

    // ==================== Update Tests ====================

    #[test]
    fn test_update_transfers_ownership() {
        let mut registry = ConstantsRegistry::new();
        registry.register("x", &site("A")).unwrap();
        registry.update("y", &site("B"));

        assert_eq!(registry.resolve_owner("Site"), Some("y"));
        assert_eq!(registry.get_merged().get("Site"), Some(&Value::from("B")));
    }

    #[test]
    fn test_register_after_transfer_checks_new_owner() {
        let mut registry = ConstantsRegistry::new();
        registry.register("x", &site("A")).unwrap();
        registry.update("y", &site("B"));

        assert!(registry.register("x", &site("A")).is_err());
        assert!(registry.register("z", &site("B")).is_ok());
    }

    // ==================== Merge Tests ====================

    #[test]
    fn test_merge_never_steals_ownership() {
        let mut registry = ConstantsRegistry::new();
        registry.register("x", &site("A")).unwrap();
        registry.merge("y", &site("B").with("Tagline", "hello"));

        assert_eq!(registry.resolve_owner("Site"), Some("x"));
        assert_eq!(registry.resolve_owner("Tagline"), Some("y"));
        assert_eq!(registry.get_merged().get("Site"), Some(&Value::from("A")));
    }

    // ==================== Replace Tests ====================

    #[test]
    fn test_replace_discards_previous_entries() {
        let mut registry = ConstantsRegistry::new();
        registry
            .register("x", &Variables::new().with("Site", "A").with("Old", "1"))
            .unwrap();
        registry.replace("x", &Variables::new().with("New", "2"));

        assert_eq!(registry.resolve_owner("Old"), None);
        assert_eq!(registry.resolve_owner("Site"), None);
        assert_eq!(registry.resolve_owner("New"), Some("x"));
        assert!(!registry.get_merged().contains("Old"));
    }

    #[test]
    fn test_replace_hands_released_names_to_other_holder() {
        let mut registry = ConstantsRegistry::new();
        registry.register("x", &site("A")).unwrap();
        registry.register("y", &site("A")).unwrap();
        registry.replace("x", &Variables::new());

        assert_eq!(registry.resolve_owner("Site"), Some("y"));
    }

    // ==================== Merged View Tests ====================

    #[test]
    fn test_get_merged_folds_components() {
        let mut registry = ConstantsRegistry::new();
        registry.register("x", &site("A")).unwrap();
        registry
            .register("y", &Variables::new().with("Support", "help@example.com"))
            .unwrap();

        let merged = registry.get_merged();
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.get("Support"), Some(&Value::from("help@example.com")));
    }

    #[test]
    fn test_resolve_owner_unknown() {
        let registry = ConstantsRegistry::new();
        assert_eq!(registry.resolve_owner("Nope"), None);
    }

    #[test]
    fn test_clear() {
        let mut registry = ConstantsRegistry::new();
        registry.register("x", &site("A")).unwrap();
        registry.clear();

        assert!(registry.get_merged().is_empty());
        assert_eq!(registry.resolve_owner("Site"), None);
    }
}
