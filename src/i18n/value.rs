//! Interpolation values and variable tables.
//!
//! Every value knows how to render itself as text through `Value::render`,
//! so the resolver never depends on implicit stringification. Objects such
//! as `CurrencyCode` and `Timezone` render through their display value.

use super::locale_data::LocaleData;
use crate::error::{I18nError, Result};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Capability of objects that present a display value instead of their structure.
pub trait DisplayValue: fmt::Debug + Send + Sync {
    fn display_value(&self) -> String;
}

/// A validated ISO 4217 currency code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Validate and wrap a currency code.
    pub fn new(code: &str, data: &dyn LocaleData) -> Result<Self> {
        if data.is_valid_currency_code(code) {
            Ok(Self(code.to_string()))
        } else {
            Err(I18nError::InvalidCurrencyCode(code.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl DisplayValue for CurrencyCode {
    fn display_value(&self) -> String {
        self.0.clone()
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated IANA timezone name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Timezone(String);

impl Timezone {
    /// Validate and wrap a timezone name.
    pub fn new(name: &str, data: &dyn LocaleData) -> Result<Self> {
        if data.is_valid_timezone(name) {
            Ok(Self(name.to_string()))
        } else {
            Err(I18nError::InvalidTimezone(name.to_string()))
        }
    }

    /// UTC is always valid.
    pub fn utc() -> Self {
        Self("UTC".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl DisplayValue for Timezone {
    fn display_value(&self) -> String {
        self.0.clone()
    }
}

impl fmt::Display for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A value that can be interpolated into a template.
#[derive(Debug, Clone)]
pub enum Value {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Currency(CurrencyCode),
    Timezone(Timezone),
    Display(Arc<dyn DisplayValue>),
}

impl Value {
    /// Render the value as the text that replaces its placeholder.
    pub fn render(&self) -> String {
        match self {
            Value::Text(text) => text.clone(),
            Value::Integer(n) => n.to_string(),
            Value::Float(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Currency(code) => code.display_value(),
            Value::Timezone(tz) => tz.display_value(),
            Value::Display(obj) => obj.display_value(),
        }
    }

    /// Wrap any display-value object.
    pub fn display<D: DisplayValue + 'static>(value: D) -> Self {
        Value::Display(Arc::new(value))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Currency(a), Value::Currency(b)) => a == b,
            (Value::Timezone(a), Value::Timezone(b)) => a == b,
            (Value::Display(a), Value::Display(b)) => a.display_value() == b.display_value(),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Integer(n) => serializer.serialize_i64(*n),
            Value::Float(n) => serializer.serialize_f64(*n),
            Value::Bool(b) => serializer.serialize_bool(*b),
            other => serializer.serialize_str(&other.render()),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<CurrencyCode> for Value {
    fn from(value: CurrencyCode) -> Self {
        Value::Currency(value)
    }
}

impl From<Timezone> for Value {
    fn from(value: Timezone) -> Self {
        Value::Timezone(value)
    }
}

/// Named interpolation values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Variables(BTreeMap<String, Value>);

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Copy every entry of `other` over this table; `other` wins on clashes.
    pub fn overlay(&mut self, other: &Variables) {
        for (name, value) in &other.0 {
            self.0.insert(name.clone(), value.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Variables
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut vars = Variables::new();
        for (name, value) in iter {
            vars.insert(name, value);
        }
        vars
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::locale_data::StandardLocaleData;

    #[derive(Debug)]
    struct Money {
        amount: i64,
        symbol: &'static str,
    }

    impl DisplayValue for Money {
        fn display_value(&self) -> String {
            format!("{}{}", self.symbol, self.amount)
        }
    }

    // ==================== Rendering Tests ====================

    #[test]
    fn test_render_scalars() {
        assert_eq!(Value::from("hi").render(), "hi");
        assert_eq!(Value::from(42i64).render(), "42");
        assert_eq!(Value::from(1.5).render(), "1.5");
        assert_eq!(Value::from(true).render(), "true");
    }

    #[test]
    fn test_render_display_value_objects() {
        let data = StandardLocaleData;
        let currency = CurrencyCode::new("EUR", &data).unwrap();
        let tz = Timezone::new("Europe/Paris", &data).unwrap();

        assert_eq!(Value::from(currency).render(), "EUR");
        assert_eq!(Value::from(tz).render(), "Europe/Paris");
        assert_eq!(
            Value::display(Money { amount: 5, symbol: "$" }).render(),
            "$5"
        );
    }

    #[test]
    fn test_serialize_uses_display_value() {
        let vars = Variables::new()
            .with("tz", Timezone::utc())
            .with("count", 3i64);
        let json = serde_json::to_string(&vars).unwrap();
        assert_eq!(json, r#"{"count":3,"tz":"UTC"}"#);
    }

    // ==================== Validation Tests ====================

    #[test]
    fn test_currency_code_rejects_unknown() {
        let result = CurrencyCode::new("ZZZ", &StandardLocaleData);
        assert_eq!(result, Err(I18nError::InvalidCurrencyCode("ZZZ".to_string())));
    }

    #[test]
    fn test_timezone_rejects_unknown() {
        let result = Timezone::new("Nowhere/Town", &StandardLocaleData);
        assert_eq!(result, Err(I18nError::InvalidTimezone("Nowhere/Town".to_string())));
    }

    // ==================== Variables Tests ====================

    #[test]
    fn test_overlay_later_wins() {
        let mut base = Variables::new().with("a", "1").with("b", "2");
        base.overlay(&Variables::new().with("b", "3"));

        assert_eq!(base.get("a"), Some(&Value::from("1")));
        assert_eq!(base.get("b"), Some(&Value::from("3")));
    }

    #[test]
    fn test_from_iterator() {
        let vars: Variables = vec![("name", "Ada"), ("role", "admin")].into_iter().collect();
        assert_eq!(vars.len(), 2);
        assert!(vars.contains("role"));
    }
}
