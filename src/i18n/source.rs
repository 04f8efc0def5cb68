//! Catalog sources: where catalog documents come from.
//!
//! The store only knows the [`CatalogSource`] trait. The HTTP source is the
//! production path (`GET {base_url}/{code}.json`); the directory source serves
//! the same layout from disk for the CLI and offline hosts.

use crate::error::{I18nError, Result};
use crate::i18n::Catalog;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

/// Fetches the catalog document addressed by a locale code.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch and parse the catalog for `code`.
    ///
    /// # Errors
    ///
    /// Returns [`I18nError`] on non-success status, transport or parse failure.
    async fn fetch(&self, code: &str) -> Result<Catalog>;
}

/// Fetches catalogs over HTTP.
pub struct HttpCatalogSource {
    client: reqwest::Client,
    /// Base URL (no trailing slash), e.g. `https://pay.example.com/static/locales`
    base_url: String,
}

impl HttpCatalogSource {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn catalog_url(&self, code: &str) -> String {
        format!("{}/{}.json", self.base_url, code)
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch(&self, code: &str) -> Result<Catalog> {
        let url = self.catalog_url(code);
        debug!("Fetching catalog {} from {}", code, url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| I18nError::CatalogRequest {
                code: code.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(I18nError::CatalogStatus {
                code: code.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| I18nError::CatalogRequest {
                code: code.to_string(),
                source,
            })?;

        Catalog::from_json_str(code, &body)
    }
}

/// Reads catalogs from `{root}/{code}.json`.
pub struct DirCatalogSource {
    root: PathBuf,
}

impl DirCatalogSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl CatalogSource for DirCatalogSource {
    async fn fetch(&self, code: &str) -> Result<Catalog> {
        let path = self.root.join(format!("{}.json", code));
        debug!("Reading catalog {} from {}", code, path.display());

        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| I18nError::CatalogRead {
                code: code.to_string(),
                source,
            })?;

        Catalog::from_json_str(code, &text)
    }
}
