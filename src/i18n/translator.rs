//! Key lookup and `{placeholder}` interpolation against the active catalog.

use crate::i18n::{Catalog, CatalogMetrics};
use regex::{Captures, Regex};
use serde_json::Value;
use std::fmt::Display;
use std::sync::{Arc, OnceLock};
use tracing::warn;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

fn placeholder_regex() -> &'static Regex {
    PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"\{([^{}]*)\}").expect("valid placeholder regex"))
}

/// Translates dotted keys for one locale.
///
/// Cheap to clone; holds the catalog by `Arc`.
#[derive(Debug, Clone)]
pub struct Translator {
    locale: String,
    catalog: Arc<Catalog>,
    metrics: Arc<CatalogMetrics>,
}

impl Translator {
    pub fn new(locale: &str, catalog: Arc<Catalog>, metrics: Arc<CatalogMetrics>) -> Self {
        Self {
            locale: locale.to_string(),
            catalog,
            metrics,
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Raw value at `key`, if any.
    pub fn lookup(&self, key: &str) -> Option<&Value> {
        self.catalog.lookup(key)
    }

    /// Translate `key` without parameters.
    pub fn t(&self, key: &str) -> String {
        self.t_with::<&str>(key, &[])
    }

    /// Translate `key` and substitute `{name}` placeholders from `params`.
    ///
    /// A missing key yields the key itself. A non-string value is returned as
    /// its JSON text without interpolation.
    pub fn t_with<V: Display>(&self, key: &str, params: &[(&str, V)]) -> String {
        match self.catalog.lookup(key) {
            Some(Value::String(template)) => interpolate(template, params),
            Some(other) => other.to_string(),
            None => {
                self.metrics.record_missing_key();
                warn!("Missing translation: {} ({})", key, self.locale);
                key.to_string()
            }
        }
    }
}

/// Replace every `{name}` in `template` whose name appears in `params`.
///
/// The template is scanned once, so text produced by a substitution is never
/// itself substituted. When a name is given twice the first entry wins;
/// placeholders without a matching param are left untouched.
pub fn interpolate<V: Display>(template: &str, params: &[(&str, V)]) -> String {
    if params.is_empty() {
        return template.to_string();
    }

    placeholder_regex()
        .replace_all(template, |caps: &Captures| {
            let name = &caps[1];
            match params.iter().find(|(key, _)| *key == name) {
                Some((_, value)) => value.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
