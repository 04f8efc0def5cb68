//! Persisted locale choice: a small key-value string store.

use crate::error::{I18nError, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::warn;

/// Storage key under which the chosen locale is persisted.
pub const LOCALE_STORAGE_KEY: &str = "page_i18n_locale";

/// Key-value string persistence.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns [`I18nError::Preferences`] when the value cannot be stored.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl<T: PreferenceStore + ?Sized> PreferenceStore for Arc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

/// Process-local store, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a JSON object file (`{"key": "value", ...}`).
///
/// A missing file reads as empty. Parent directories are created on write.
#[derive(Debug)]
pub struct FilePreferences {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FilePreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Raw file contents, `None` when the file does not exist yet.
    fn read_text(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(I18nError::Preferences(format!(
                "{}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn parse(&self, text: &str) -> Result<Map<String, Value>> {
        serde_json::from_str(text).map_err(|e| {
            I18nError::Preferences(format!("{}: {}", self.path.display(), e))
        })
    }

    fn read_all(&self) -> Result<Map<String, Value>> {
        match self.read_text()? {
            Some(text) => self.parse(&text),
            None => Ok(Map::new()),
        }
    }
}

impl PreferenceStore for FilePreferences {
    fn get(&self, key: &str) -> Option<String> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        match self.read_all() {
            Ok(values) => values.get(key).and_then(Value::as_str).map(String::from),
            Err(e) => {
                warn!("Failed to read preferences: {}", e);
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        // Only a corrupt file is replaced; IO errors abort the write
        let mut values = match self.read_text()? {
            Some(text) => self.parse(&text).unwrap_or_else(|e| {
                warn!("Replacing unreadable preferences: {}", e);
                Map::new()
            }),
            None => Map::new(),
        };
        values.insert(key.to_string(), Value::String(value.to_string()));

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| I18nError::Preferences(e.to_string()))?;
        }

        let text = serde_json::to_string_pretty(&values)
            .map_err(|e| I18nError::Preferences(e.to_string()))?;
        std::fs::write(&self.path, text).map_err(|e| I18nError::Preferences(e.to_string()))
    }
}
