use anyhow::{bail, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // Catalogs
    pub catalog_url: Option<String>,
    pub catalog_dir: String,

    // Locale
    pub default_locale: String,
    pub language: Option<String>,

    // Persistence
    pub preferences_file: String,

    // Request
    pub page_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let config = Self {
            // Catalogs - HTTP when a base URL is set, otherwise a local directory
            catalog_url: non_empty_var("I18N_CATALOG_URL"),
            catalog_dir: std::env::var("I18N_CATALOG_DIR")
                .unwrap_or_else(|_| "locales".to_string()),

            // Locale
            default_locale: std::env::var("I18N_DEFAULT_LOCALE")
                .unwrap_or_else(|_| crate::i18n::DEFAULT_LOCALE.to_string()),
            language: non_empty_var("I18N_LANGUAGE"),

            // Persistence
            preferences_file: std::env::var("I18N_PREFERENCES_FILE")
                .unwrap_or_else(|_| "data/preferences.json".to_string()),

            // Request
            page_url: non_empty_var("I18N_PAGE_URL"),
        };

        if config.default_locale.trim().is_empty() {
            bail!("I18N_DEFAULT_LOCALE must not be empty");
        }

        Ok(config)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
