//! Component-based translation registry and template resolver.
//!
//! Components register per-language string tables; `I18nEngine::t` resolves
//! `{{Component.key}}` references and `{name}` variables in free-form text.
//!
//! ```no_run
//! use component_i18n::{ComponentDefinition, EngineConfig, I18nEngine, LanguageDefinition};
//!
//! let engine = I18nEngine::new(
//!     vec![LanguageDefinition::new("en", "English", "en-US").as_default()],
//!     EngineConfig::default(),
//! )?;
//! engine.register(ComponentDefinition::new("app").with_strings("en", [("welcome", "Hi")]))?;
//! assert_eq!(engine.t("{{app.welcome}}", None, &[]), "Hi");
//! # Ok::<(), component_i18n::I18nError>(())
//! ```

pub mod bundle;
pub mod config;
pub mod engine;
pub mod error;
pub mod i18n;
pub mod instances;

pub use bundle::Bundle;
pub use config::EngineConfig;
pub use engine::{I18nEngine, TranslationResult};
pub use error::{I18nError, Result};
pub use i18n::{
    ActiveContext, ComponentDefinition, ContextUpdate, CurrencyCode, EnumDefinition, EnumValue,
    LanguageContextSpace, LanguageDefinition, MessageFormatter, Timezone, TranslatableEnum,
    ValidationResult, Value, Variables,
};
pub use instances::{InstanceStore, DEFAULT_INSTANCE_KEY};
