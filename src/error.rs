use thiserror::Error;

/// Errors raised inside the i18n layer.
///
/// Most of these never reach callers of the controller: catalog failures are
/// absorbed by the fallback chain and missing keys degrade to the key text.
/// They surface from constructors and from the lower-level source/store APIs.
#[derive(Debug, Error)]
pub enum I18nError {
    #[error("Unsupported locale: {0}")]
    UnsupportedLocale(String),

    #[error("Duplicate locale code in registry: {0}")]
    DuplicateLocale(String),

    #[error("Failed to load locale {code}: HTTP {status}")]
    CatalogStatus { code: String, status: u16 },

    #[error("Failed to request catalog for {code}: {source}")]
    CatalogRequest {
        code: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read catalog for {code}: {source}")]
    CatalogRead {
        code: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog for {code}: {message}")]
    CatalogParse { code: String, message: String },

    #[error("Preference store error: {0}")]
    Preferences(String),
}

pub type Result<T> = std::result::Result<T, I18nError>;
