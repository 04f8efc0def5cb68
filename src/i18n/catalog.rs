//! Message catalog: a JSON tree of string leaves addressed by dotted paths.

use crate::error::{I18nError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Translated strings for one locale.
///
/// The top level is always a JSON object; values are strings or nested
/// objects. Other JSON values are tolerated as non-string leaves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: Map<String, Value>,
}

impl Catalog {
    /// Wrap an already parsed JSON object.
    pub fn new(entries: Map<String, Value>) -> Self {
        Self { entries }
    }

    /// Parse a catalog document for `code`.
    ///
    /// # Errors
    /// `CatalogParse` if the text is not JSON or the top level is not an object.
    pub fn from_json_str(code: &str, text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| I18nError::CatalogParse {
            code: code.to_string(),
            message: e.to_string(),
        })
    }

    /// Resolve a dotted key path.
    ///
    /// Returns `None` as soon as a segment is absent or an intermediate value
    /// is not an object.
    pub fn lookup(&self, key: &str) -> Option<&Value> {
        let mut segments = key.split('.');
        let first = segments.next()?;
        let mut value = self.entries.get(first)?;

        for segment in segments {
            value = value.as_object()?.get(segment)?;
        }

        Some(value)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dotted paths of every non-object leaf, sorted by key.
    pub fn leaf_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        collect_leaf_keys(&self.entries, "", &mut keys);
        keys
    }
}

fn collect_leaf_keys(map: &Map<String, Value>, prefix: &str, keys: &mut Vec<String>) {
    for (name, value) in map {
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", prefix, name)
        };

        match value {
            Value::Object(nested) => collect_leaf_keys(nested, &path, keys),
            _ => keys.push(path),
        }
    }
}
