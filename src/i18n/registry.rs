//! Locale registry: single source of truth for all supported locales.
//!
//! The registry is an ordered table of [`LocaleDescriptor`]s plus the code of
//! the designated default locale. The built-in table is a lazily initialized
//! process-wide instance; custom registries can be built for tests or for
//! hosts that ship a different locale set.

use crate::error::{I18nError, Result};
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Text layout direction of a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Direction {
    /// Attribute value used on the document root (`"ltr"` / `"rtl"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }

    pub fn is_rtl(&self) -> bool {
        matches!(self, Direction::Rtl)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Metadata for a supported locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocaleDescriptor {
    /// BCP-47-like tag (e.g., "en", "zh-TW")
    pub code: String,

    /// Name of the locale in its own language (e.g., "繁體中文")
    pub display_name: String,

    /// Text direction
    pub direction: Direction,
}

impl LocaleDescriptor {
    pub fn new(code: &str, display_name: &str, direction: Direction) -> Self {
        Self {
            code: code.to_string(),
            display_name: display_name.to_string(),
            direction,
        }
    }
}

/// Ordered table of supported locales.
#[derive(Debug, Clone)]
pub struct LocaleRegistry {
    locales: Vec<LocaleDescriptor>,
    default_code: String,
}

/// Global registry instance (initialized lazily)
static BUILTIN: OnceLock<Arc<LocaleRegistry>> = OnceLock::new();

impl LocaleRegistry {
    /// Build a registry from descriptors in registration order.
    ///
    /// # Errors
    /// * `DuplicateLocale` if two descriptors share a code
    /// * `UnsupportedLocale` if `default_code` is not among the descriptors
    pub fn new(locales: Vec<LocaleDescriptor>, default_code: &str) -> Result<Self> {
        for (i, locale) in locales.iter().enumerate() {
            if locales[..i].iter().any(|other| other.code == locale.code) {
                return Err(I18nError::DuplicateLocale(locale.code.clone()));
            }
        }

        if !locales.iter().any(|locale| locale.code == default_code) {
            return Err(I18nError::UnsupportedLocale(default_code.to_string()));
        }

        Ok(Self {
            locales,
            default_code: default_code.to_string(),
        })
    }

    /// Get the built-in registry shared by the whole process.
    pub fn builtin() -> Arc<LocaleRegistry> {
        BUILTIN
            .get_or_init(|| {
                Arc::new(LocaleRegistry {
                    locales: default_locales(),
                    default_code: DEFAULT_LOCALE.to_string(),
                })
            })
            .clone()
    }

    /// Check if a locale code is registered.
    pub fn has(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Get a locale descriptor by its exact code.
    pub fn get(&self, code: &str) -> Option<&LocaleDescriptor> {
        self.locales.iter().find(|locale| locale.code == code)
    }

    /// All locales in registration order.
    pub fn all(&self) -> &[LocaleDescriptor] {
        &self.locales
    }

    /// Code of the designated default locale.
    pub fn default_code(&self) -> &str {
        &self.default_code
    }

    /// Descriptor of the designated default locale.
    pub fn default_locale(&self) -> &LocaleDescriptor {
        // `new` and `builtin` both guarantee the default is registered
        self.get(&self.default_code).unwrap_or(&self.locales[0])
    }
}

/// Code of the built-in default locale.
pub const DEFAULT_LOCALE: &str = "zh-CN";

fn default_locales() -> Vec<LocaleDescriptor> {
    vec![
        LocaleDescriptor::new("en", "English", Direction::Ltr),
        LocaleDescriptor::new("zh-CN", "简体中文", Direction::Ltr),
        LocaleDescriptor::new("zh-TW", "繁體中文", Direction::Ltr),
        LocaleDescriptor::new("ru", "Русский", Direction::Ltr),
        LocaleDescriptor::new("fa", "فارسی", Direction::Rtl),
        LocaleDescriptor::new("vi", "Tiếng Việt", Direction::Ltr),
        LocaleDescriptor::new("my", "မြန်မာ", Direction::Ltr),
    ]
}
