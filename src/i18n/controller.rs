//! Locale controller: initialization and locale switching.
//!
//! The controller owns the active locale, the catalog store, the preference
//! store and the document. `init` and `set_locale` take `&mut self`, so two
//! switches on one controller can never interleave: each call runs
//! load → direction → translation pass to completion before the next starts.

use crate::i18n::resolver::{query_locale, resolve, LocaleCandidates};
use crate::i18n::{
    Catalog, CatalogMetrics, CatalogSource, CatalogStore, Document, DocumentBinder,
    LocaleDescriptor, LocaleRegistry, PreferenceStore, Translator, LOCALE_STORAGE_KEY,
};
use std::fmt::Display;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{info, warn};

/// Name of the locale change notification.
pub const LOCALE_CHANGED_EVENT: &str = "localeChanged";

const EVENT_CAPACITY: usize = 16;

/// Payload of the locale change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleChanged {
    pub locale: String,
}

impl LocaleChanged {
    pub fn name(&self) -> &'static str {
        LOCALE_CHANGED_EVENT
    }
}

/// Coordinates resolution, loading, direction and translation for one document.
pub struct LocaleController<D: Document> {
    registry: Arc<LocaleRegistry>,
    catalogs: CatalogStore,
    preferences: Box<dyn PreferenceStore>,
    document: D,
    page_url: Option<String>,
    environment_language: Option<String>,
    active: Translator,
    ready: bool,
    events: broadcast::Sender<LocaleChanged>,
}

impl<D: Document> LocaleController<D> {
    pub fn new(
        registry: Arc<LocaleRegistry>,
        source: Arc<dyn CatalogSource>,
        preferences: Box<dyn PreferenceStore>,
        document: D,
    ) -> Self {
        let metrics = Arc::new(CatalogMetrics::new());
        let catalogs =
            CatalogStore::with_metrics(source, registry.default_code(), Arc::clone(&metrics));
        let active = Translator::new(
            registry.default_code(),
            Arc::new(Catalog::default()),
            metrics,
        );
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            registry,
            catalogs,
            preferences,
            document,
            page_url: None,
            environment_language: None,
            active,
            ready: false,
            events,
        }
    }

    /// Page URL whose `lang` query parameter is consulted by `init`.
    pub fn with_page_url(mut self, page_url: Option<String>) -> Self {
        self.page_url = page_url;
        self
    }

    /// Language tag reported by the host environment.
    pub fn with_environment_language(mut self, language: Option<String>) -> Self {
        self.environment_language = language;
        self
    }

    /// Use the operating system language as the environment language.
    pub fn with_system_language(self) -> Self {
        let language = crate::i18n::resolver::detect_environment_language();
        self.with_environment_language(language)
    }

    /// Resolve the initial locale, load it and translate the document.
    ///
    /// Stays pending for as long as the catalog source does; there is no
    /// timeout.
    pub async fn init(&mut self, default_code: &str) {
        let candidates = LocaleCandidates {
            request: self.page_url.as_deref().and_then(query_locale),
            persisted: self.preferences.get(LOCALE_STORAGE_KEY),
            environment: self.environment_language.clone(),
            default: Some(default_code.to_string()),
        };

        let mut code = resolve(&candidates, &self.registry, default_code);
        if !self.registry.has(&code) {
            warn!(
                "Resolved locale {} is not supported, using {}",
                code,
                self.registry.default_code()
            );
            code = self.registry.default_code().to_string();
        }

        self.activate(&code).await;
        self.ready = true;
        info!("Locale initialized: {}", code);
    }

    /// Switch to `code`, persist it and notify subscribers.
    ///
    /// Unsupported codes are logged and ignored.
    pub async fn set_locale(&mut self, code: &str) {
        if !self.registry.has(code) {
            warn!("Unsupported locale: {}", code);
            return;
        }

        if let Err(e) = self.preferences.set(LOCALE_STORAGE_KEY, code) {
            warn!("Failed to persist locale {}: {}", code, e);
        }

        self.activate(code).await;
        self.ready = true;

        // No subscribers is fine
        let _ = self.events.send(LocaleChanged {
            locale: code.to_string(),
        });
        info!("Locale changed: {}", code);
    }

    async fn activate(&mut self, code: &str) {
        let catalog = self.catalogs.load(code).await;
        self.active = Translator::new(code, catalog, Arc::clone(self.catalogs.metrics()));

        let locale = self.current_locale().clone();
        DocumentBinder::apply_direction(&mut self.document, &locale);
        DocumentBinder::new(&self.active).translate_page(&mut self.document);
    }

    /// Re-run the translation pass, e.g. after the host added elements.
    pub fn translate_page(&mut self) {
        DocumentBinder::new(&self.active).translate_page(&mut self.document);
    }

    pub fn t(&self, key: &str) -> String {
        self.active.t(key)
    }

    pub fn t_with<V: Display>(&self, key: &str, params: &[(&str, V)]) -> String {
        self.active.t_with(key, params)
    }

    pub fn translator(&self) -> &Translator {
        &self.active
    }

    /// Descriptor of the active locale.
    pub fn current_locale(&self) -> &LocaleDescriptor {
        self.registry
            .get(self.active.locale())
            .unwrap_or_else(|| self.registry.default_locale())
    }

    /// All supported locales in registration order.
    pub fn supported_locales(&self) -> &[LocaleDescriptor] {
        self.registry.all()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Receive a [`LocaleChanged`] for every completed `set_locale`.
    pub fn subscribe(&self) -> broadcast::Receiver<LocaleChanged> {
        self.events.subscribe()
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn catalogs(&self) -> &CatalogStore {
        &self.catalogs
    }

    pub fn metrics(&self) -> &Arc<CatalogMetrics> {
        self.catalogs.metrics()
    }
}
