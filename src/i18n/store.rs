//! Catalog store: fetch-once cache with fallback to the default locale.
//!
//! # Invariants
//!
//! 1. A successfully loaded catalog is memoized for the lifetime of the store
//!    and later loads return the same `Arc` without touching the source.
//! 2. Failed fetches are not cached; the next `load` tries again.
//! 3. Concurrent loads of the same code share one fetch (per-code mutex).
//! 4. `load` never fails. A failed non-default code falls back to the default
//!    code's catalog exactly once; a failed default yields an empty catalog.

use crate::error::Result;
use crate::i18n::{Catalog, CatalogMetrics, CatalogSource};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};

type Slot = Arc<tokio::sync::Mutex<Option<Arc<Catalog>>>>;

/// Caching loader for message catalogs.
pub struct CatalogStore {
    source: Arc<dyn CatalogSource>,
    default_code: String,
    slots: Mutex<HashMap<String, Slot>>,
    metrics: Arc<CatalogMetrics>,
}

impl CatalogStore {
    pub fn new(source: Arc<dyn CatalogSource>, default_code: &str) -> Self {
        Self::with_metrics(source, default_code, Arc::new(CatalogMetrics::new()))
    }

    pub fn with_metrics(
        source: Arc<dyn CatalogSource>,
        default_code: &str,
        metrics: Arc<CatalogMetrics>,
    ) -> Self {
        Self {
            source,
            default_code: default_code.to_string(),
            slots: Mutex::new(HashMap::new()),
            metrics,
        }
    }

    pub fn default_code(&self) -> &str {
        &self.default_code
    }

    pub fn metrics(&self) -> &Arc<CatalogMetrics> {
        &self.metrics
    }

    /// Load the catalog for `code`, falling back as described above.
    pub async fn load(&self, code: &str) -> Arc<Catalog> {
        let err = match self.try_load(code).await {
            Ok(catalog) => return catalog,
            Err(e) => e,
        };
        warn!("Error loading locale {}: {}", code, err);

        if code == self.default_code {
            return Arc::new(Catalog::default());
        }

        self.metrics.record_fallback();
        warn!("Falling back to default locale {}", self.default_code);

        // One level only: the default's own failure ends the chain
        match self.try_load(&self.default_code).await {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!("Error loading default locale {}: {}", self.default_code, e);
                Arc::new(Catalog::default())
            }
        }
    }

    /// Load `code` without fallback.
    ///
    /// # Errors
    ///
    /// Returns the source's error when the fetch fails; nothing is cached then.
    pub async fn try_load(&self, code: &str) -> Result<Arc<Catalog>> {
        let slot = self.slot(code);
        let mut cached = slot.lock().await;

        if let Some(catalog) = cached.as_ref() {
            self.metrics.record_cache_hit();
            return Ok(Arc::clone(catalog));
        }

        self.metrics.record_cache_miss();
        self.metrics.record_fetch();

        match self.source.fetch(code).await {
            Ok(catalog) => {
                debug!("Loaded catalog {}", code);
                let catalog = Arc::new(catalog);
                *cached = Some(Arc::clone(&catalog));
                Ok(catalog)
            }
            Err(e) => {
                self.metrics.record_fetch_failure();
                Err(e)
            }
        }
    }

    /// Peek at the cache without fetching.
    ///
    /// Returns `None` while another task holds the slot for an in-flight fetch.
    pub fn cached(&self, code: &str) -> Option<Arc<Catalog>> {
        let slot = self.slots_guard().get(code).cloned()?;
        let guard = slot.try_lock().ok()?;
        guard.as_ref().map(Arc::clone)
    }

    fn slot(&self, code: &str) -> Slot {
        Arc::clone(self.slots_guard().entry(code.to_string()).or_default())
    }

    fn slots_guard(&self) -> std::sync::MutexGuard<'_, HashMap<String, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::I18nError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// In-memory source that counts fetches per code.
    struct FakeSource {
        catalogs: HashMap<String, serde_json::Value>,
        calls: Mutex<HashMap<String, usize>>,
        total: AtomicUsize,
        delay: Duration,
    }

    impl FakeSource {
        fn new(catalogs: &[(&str, serde_json::Value)]) -> Self {
            Self {
                catalogs: catalogs
                    .iter()
                    .map(|(code, value)| (code.to_string(), value.clone()))
                    .collect(),
                calls: Mutex::new(HashMap::new()),
                total: AtomicUsize::new(0),
                delay: Duration::ZERO,
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        fn calls(&self, code: &str) -> usize {
            *self.calls.lock().unwrap().get(code).unwrap_or(&0)
        }
    }

    #[async_trait]
    impl CatalogSource for FakeSource {
        async fn fetch(&self, code: &str) -> Result<Catalog> {
            *self.calls.lock().unwrap().entry(code.to_string()).or_default() += 1;
            self.total.fetch_add(1, Ordering::SeqCst);

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            match self.catalogs.get(code) {
                Some(value) => Catalog::from_json_str(code, &value.to_string()),
                None => Err(I18nError::CatalogStatus {
                    code: code.to_string(),
                    status: 404,
                }),
            }
        }
    }

    fn store_with(source: &Arc<FakeSource>) -> CatalogStore {
        CatalogStore::new(Arc::clone(source) as Arc<dyn CatalogSource>, "zh-CN")
    }

    // ==================== Cache Tests ====================

    #[tokio::test]
    async fn test_second_load_hits_cache() {
        let source = Arc::new(FakeSource::new(&[("en", json!({ "a": "A" }))]));
        let store = store_with(&source);

        let first = store.load("en").await;
        let second = store.load("en").await;

        assert_eq!(source.calls("en"), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.metrics().cache_hits(), 1);
        assert_eq!(store.metrics().cache_misses(), 1);
    }

    #[tokio::test]
    async fn test_cached_peek() {
        let source = Arc::new(FakeSource::new(&[("en", json!({ "a": "A" }))]));
        let store = store_with(&source);

        assert!(store.cached("en").is_none());
        let loaded = store.load("en").await;

        let peeked = store.cached("en").expect("Should be cached");
        assert!(Arc::ptr_eq(&loaded, &peeked));
        assert_eq!(source.calls("en"), 1);
    }

    #[tokio::test]
    async fn test_concurrent_loads_share_one_fetch() {
        let source = Arc::new(
            FakeSource::new(&[("ru", json!({ "a": "А" }))]).with_delay(Duration::from_millis(20)),
        );
        let store = store_with(&source);

        let (a, b) = futures::future::join(store.load("ru"), store.load("ru")).await;

        assert_eq!(source.calls("ru"), 1);
        assert!(Arc::ptr_eq(&a, &b));
    }

    // ==================== Fallback Tests ====================

    #[tokio::test]
    async fn test_failed_load_falls_back_to_default() {
        let source = Arc::new(FakeSource::new(&[("zh-CN", json!({ "a": "甲" }))]));
        let store = store_with(&source);

        let default = store.load("zh-CN").await;
        let fallback = store.load("xx").await;

        assert!(Arc::ptr_eq(&default, &fallback));
        assert_eq!(store.metrics().fallbacks(), 1);
    }

    #[tokio::test]
    async fn test_failed_load_is_not_cached() {
        let source = Arc::new(FakeSource::new(&[("zh-CN", json!({ "a": "甲" }))]));
        let store = store_with(&source);

        store.load("vi").await;
        store.load("vi").await;

        assert_eq!(source.calls("vi"), 2);
        // the default was fetched once and then served from cache
        assert_eq!(source.calls("zh-CN"), 1);
        assert!(store.cached("vi").is_none());
    }

    #[tokio::test]
    async fn test_default_failure_returns_empty() {
        let source = Arc::new(FakeSource::new(&[]));
        let store = store_with(&source);

        let catalog = store.load("zh-CN").await;

        assert!(catalog.is_empty());
        assert_eq!(source.calls("zh-CN"), 1);
        assert_eq!(store.metrics().fallbacks(), 0);
    }

    #[tokio::test]
    async fn test_fallback_chain_stops_after_one_level() {
        let source = Arc::new(FakeSource::new(&[]));
        let store = store_with(&source);

        let catalog = store.load("fa").await;

        assert!(catalog.is_empty());
        assert_eq!(source.calls("fa"), 1);
        assert_eq!(source.calls("zh-CN"), 1);
        assert_eq!(source.total.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_try_load_surfaces_error() {
        let source = Arc::new(FakeSource::new(&[]));
        let store = store_with(&source);

        let err = store.try_load("fa").await.unwrap_err();
        assert!(matches!(err, I18nError::CatalogStatus { status: 404, .. }));
        assert_eq!(store.metrics().fetch_failures(), 1);
    }
}
