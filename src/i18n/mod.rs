//! Internationalization layer: locale resolution, catalogs and page translation.
//!
//! # Architecture
//!
//! - `registry`: Supported locales with display name and text direction
//! - `resolver`: Picks the active locale from request, persisted, environment and default candidates
//! - `catalog`: JSON message tree addressed by dotted keys
//! - `source`: Where catalogs come from (HTTP, directory)
//! - `store`: Fetch-once catalog cache with fallback to the default locale
//! - `translator`: Key lookup and `{placeholder}` interpolation
//! - `document` / `binder`: Declarative `data-i18n*` translation pass over a document
//! - `preferences`: Persisted locale choice
//! - `controller`: Ties the above together (`init`, `set_locale`, change events)
//! - `metrics` / `validator`: Observability and catalog quality checks
//!
//! # Example
//!
//! ```rust,ignore
//! use page_i18n::i18n::{HttpCatalogSource, LocaleController, LocaleRegistry, MemoryDocument, MemoryPreferences};
//!
//! let mut controller = LocaleController::new(
//!     LocaleRegistry::builtin(),
//!     Arc::new(HttpCatalogSource::new("https://pay.example.com/static/locales")),
//!     Box::new(MemoryPreferences::new()),
//!     MemoryDocument::new(),
//! );
//! controller.init("zh-CN").await;
//! let title = controller.t_with("cashier.pay", &[("amount", "12.50")]);
//! ```

mod binder;
mod catalog;
mod controller;
mod document;
mod metrics;
mod preferences;
mod registry;
mod resolver;
mod source;
mod store;
mod translator;
mod validator;

pub use binder::{
    DocumentBinder, MarkerKind, TranslationMarker, DOCUMENT_TITLE_MARKER, PLACEHOLDER_MARKER,
    RTL_FLAG, TEXT_MARKER, TITLE_MARKER,
};
pub use catalog::Catalog;
pub use controller::{LocaleChanged, LocaleController, LOCALE_CHANGED_EVENT};
pub use document::{Document, ElementId, MemoryDocument, MemoryElement};
pub use metrics::{CatalogMetrics, MetricsReport};
pub use preferences::{FilePreferences, MemoryPreferences, PreferenceStore, LOCALE_STORAGE_KEY};
pub use registry::{Direction, LocaleDescriptor, LocaleRegistry, DEFAULT_LOCALE};
pub use resolver::{
    detect_environment_language, match_language_tag, query_locale, resolve, LocaleCandidates,
    LANG_QUERY_PARAM,
};
pub use source::{CatalogSource, DirCatalogSource, HttpCatalogSource};
pub use store::CatalogStore;
pub use translator::{interpolate, Translator};
pub use validator::{CatalogValidator, ValidationReport};
