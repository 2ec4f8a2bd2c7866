//! Translation metrics.
//!
//! Counts resolutions per engine: how many strings were resolved, how many
//! came from a fallback language, and how many safe operations had to emit
//! the `[component.key]` placeholder.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Resolution counters for one engine instance.
#[derive(Debug, Default)]
pub struct TranslationMetrics {
    /// Number of strings resolved from a component or enumeration
    translations: AtomicUsize,

    /// Number of resolved strings that came from a fallback language
    fallbacks: AtomicUsize,

    /// Number of safe operations that returned the placeholder
    placeholders: AtomicUsize,
}

impl TranslationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a resolved string.
    pub fn record_translation(&self, was_fallback: bool) {
        self.translations.fetch_add(1, Ordering::Relaxed);
        if was_fallback {
            self.fallbacks.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a placeholder returned by a safe operation.
    pub fn record_placeholder(&self) {
        self.placeholders.fetch_add(1, Ordering::Relaxed);
    }

    pub fn translations(&self) -> usize {
        self.translations.load(Ordering::Relaxed)
    }

    pub fn fallbacks(&self) -> usize {
        self.fallbacks.load(Ordering::Relaxed)
    }

    pub fn placeholders(&self) -> usize {
        self.placeholders.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let translations = self.translations();
        let fallbacks = self.fallbacks();
        let placeholders = self.placeholders();

        let fallback_rate = if translations > 0 {
            (fallbacks as f64 / translations as f64) * 100.0
        } else {
            0.0
        };

        let attempts = translations + placeholders;
        let resolution_rate = if attempts > 0 {
            (translations as f64 / attempts as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            translations,
            fallbacks,
            fallback_rate,
            placeholders,
            resolution_rate,
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.translations.store(0, Ordering::Relaxed);
        self.fallbacks.store(0, Ordering::Relaxed);
        self.placeholders.store(0, Ordering::Relaxed);
    }
}

/// Snapshot of an engine's resolution statistics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    /// Number of strings resolved
    pub translations: usize,

    /// Number of resolved strings served from a fallback language
    pub fallbacks: usize,

    /// Fallback share of resolved strings as a percentage (0-100)
    pub fallback_rate: f64,

    /// Number of placeholders emitted
    pub placeholders: usize,

    /// Resolved share of all attempts as a percentage (0-100)
    pub resolution_rate: f64,
}
