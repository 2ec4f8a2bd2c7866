//! Internationalization (i18n) building blocks.
//!
//! Each registry here is a plain data structure; `crate::engine::I18nEngine`
//! owns one of each behind locks and orchestrates resolution.
//!
//! # Architecture
//!
//! - `language`: Registered language definitions and the default language
//! - `component`: Per-component string tables, aliases, and completeness checks
//! - `constants`: Component-contributed constants with ownership tracking
//! - `context`: Per-key active language, currency, and timezone settings
//! - `enums`: Enumeration translations addressed by explicit tags
//! - `template`: The reference and variable passes behind `t()`
//! - `value`: Interpolation values and variable tables
//! - `locale_data`: Currency and timezone validity
//! - `format`: Boundary for plural/select message formatting
//! - `validator`: Validation results and placeholder consistency checks
//! - `metrics`: Resolution counters

mod component;
mod constants;
mod context;
mod enums;
mod format;
mod language;
mod locale_data;
mod metrics;
pub mod template;
mod validator;
mod value;

pub use component::{
    ComponentDefinition, ComponentRegistry, RegisteredComponent, RegistrationPolicy,
    StringLookup, StringTables,
};
pub use constants::ConstantsRegistry;
pub use context::{
    ActiveContext, ContextStore, ContextUpdate, LanguageContextSpace, DEFAULT_CONTEXT_KEY,
};
pub use enums::{EnumDefinition, EnumMember, EnumRegistry, EnumValue, TranslatableEnum};
pub use format::{uses_message_grammar, MessageFormatter};
pub use language::{LanguageDefinition, LanguageRegistry};
pub use locale_data::{LocaleData, StandardLocaleData};
pub use metrics::{MetricsReport, TranslationMetrics};
pub use validator::{PlaceholderValidator, ValidationResult};
pub use value::{CurrencyCode, DisplayValue, Timezone, Value, Variables};
