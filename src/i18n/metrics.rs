//! Catalog metrics: cache efficiency, fetch health and missing keys.
//!
//! One instance is shared (via `Arc`) between a `CatalogStore` and the
//! translators built on top of it, so a fresh controller starts from zero.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters for catalog loading and key lookup.
#[derive(Debug, Default)]
pub struct CatalogMetrics {
    /// Loads answered from the in-memory cache
    cache_hits: AtomicUsize,

    /// Loads that had to go to the catalog source
    cache_misses: AtomicUsize,

    /// Fetches issued to the catalog source
    fetches: AtomicUsize,

    /// Fetches that failed (status, transport or parse)
    fetch_failures: AtomicUsize,

    /// Loads answered with the default locale's catalog instead
    fallbacks: AtomicUsize,

    /// Lookups that found no value for the key
    missing_keys: AtomicUsize,
}

impl CatalogMetrics {
    /// Create a set of counters starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a load answered from the cache.
    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a load that had to go to the source.
    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a fetch issued to the catalog source.
    pub fn record_fetch(&self) {
        self.fetches.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed fetch.
    pub fn record_fetch_failure(&self) {
        self.fetch_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a load answered with the default catalog.
    pub fn record_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a lookup with no value for its key.
    pub fn record_missing_key(&self) {
        self.missing_keys.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current cache hit count.
    pub fn cache_hits(&self) -> usize {
        self.cache_hits.load(Ordering::Relaxed)
    }

    /// Get the current cache miss count.
    pub fn cache_misses(&self) -> usize {
        self.cache_misses.load(Ordering::Relaxed)
    }

    /// Get the current fetch count.
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }

    /// Get the current fetch failure count.
    pub fn fetch_failures(&self) -> usize {
        self.fetch_failures.load(Ordering::Relaxed)
    }

    /// Get the current fallback count.
    pub fn fallbacks(&self) -> usize {
        self.fallbacks.load(Ordering::Relaxed)
    }

    /// Get the current missing key count.
    pub fn missing_keys(&self) -> usize {
        self.missing_keys.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.cache_hits();
        let misses = self.cache_misses();
        let total_loads = hits + misses;
        let cache_hit_rate = if total_loads > 0 {
            (hits as f64 / total_loads as f64) * 100.0
        } else {
            0.0
        };

        let fetches = self.fetches();
        let failures = self.fetch_failures();
        let fetch_success_rate = if fetches > 0 {
            (fetches.saturating_sub(failures) as f64 / fetches as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            cache_hits: hits,
            cache_misses: misses,
            cache_hit_rate,
            fetches,
            fetch_failures: failures,
            fetch_success_rate,
            fallbacks: self.fallbacks(),
            missing_keys: self.missing_keys(),
        }
    }
}

/// Point-in-time snapshot of [`CatalogMetrics`].
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub cache_hits: usize,
    pub cache_misses: usize,

    /// Cache hit rate as a percentage (0-100)
    pub cache_hit_rate: f64,

    pub fetches: usize,
    pub fetch_failures: usize,

    /// Fetch success rate as a percentage (0-100)
    pub fetch_success_rate: f64,

    pub fallbacks: usize,
    pub missing_keys: usize,
}
