//! Command-line front end for the i18n layer.
//!
//! Usage:
//!   page-i18n locales                      # List supported locales (* = active)
//!   page-i18n t <key> [name=value ...]     # Translate a key in the active locale
//!   page-i18n set <code>                   # Switch and persist the locale
//!   page-i18n check <code>                 # Validate a catalog against the default
//!
//! Environment variables: see `Config::from_env`.

use anyhow::{bail, Context, Result};
use page_i18n::config::Config;
use page_i18n::i18n::{
    CatalogSource, CatalogValidator, DirCatalogSource, FilePreferences, HttpCatalogSource,
    LocaleController, LocaleRegistry, MemoryDocument,
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("page_i18n=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    let args: Vec<String> = std::env::args().skip(1).collect();

    let source: Arc<dyn CatalogSource> = match &config.catalog_url {
        Some(url) => {
            info!("Loading catalogs from {}", url);
            Arc::new(HttpCatalogSource::new(url))
        }
        None => {
            info!("Loading catalogs from directory {}", config.catalog_dir);
            Arc::new(DirCatalogSource::new(&config.catalog_dir))
        }
    };

    let mut controller = LocaleController::new(
        LocaleRegistry::builtin(),
        source,
        Box::new(FilePreferences::new(&config.preferences_file)),
        MemoryDocument::new(),
    )
    .with_page_url(config.page_url.clone());

    controller = match &config.language {
        Some(language) => controller.with_environment_language(Some(language.clone())),
        None => controller.with_system_language(),
    };

    controller.init(&config.default_locale).await;

    match args.first().map(String::as_str) {
        None | Some("locales") => {
            let active = controller.current_locale().code.clone();
            for locale in controller.supported_locales() {
                let marker = if locale.code == active { "*" } else { " " };
                println!(
                    "{} {:<6} {:<4} {}",
                    marker, locale.code, locale.direction, locale.display_name
                );
            }
        }
        Some("t") => {
            let key = args.get(1).context("Usage: page-i18n t <key> [name=value ...]")?;
            let params = args[2..]
                .iter()
                .map(|arg| {
                    arg.split_once('=')
                        .with_context(|| format!("Invalid parameter '{}', expected name=value", arg))
                })
                .collect::<Result<Vec<(&str, &str)>>>()?;

            println!("{}", controller.t_with(key, &params));
        }
        Some("set") => {
            let code = args.get(1).context("Usage: page-i18n set <code>")?;
            if !controller.supported_locales().iter().any(|l| &l.code == code) {
                bail!("Unsupported locale: {}", code);
            }

            controller.set_locale(code).await;
            println!("{}", controller.current_locale().display_name);
        }
        Some("check") => {
            let code = args.get(1).context("Usage: page-i18n check <code>")?;
            let default_code = LocaleRegistry::builtin().default_code().to_string();

            let reference = controller
                .catalogs()
                .try_load(&default_code)
                .await
                .with_context(|| format!("Failed to load reference catalog {}", default_code))?;
            let candidate = controller
                .catalogs()
                .try_load(code)
                .await
                .with_context(|| format!("Failed to load catalog {}", code))?;

            let report = CatalogValidator::validate(&reference, &candidate);
            for error in &report.errors {
                println!("error: {}", error);
            }
            for warning in &report.warnings {
                println!("warning: {}", warning);
            }

            if report.has_errors() {
                bail!("{} has {} errors", code, report.errors.len());
            }
            info!("✓ {} matches {}", code, default_code);
        }
        Some(other) => bail!("Unknown command: {}", other),
    }

    let report = controller.metrics().report();
    info!(
        "Catalog metrics: {} fetches, {:.0}% cache hit rate, {} missing keys",
        report.fetches, report.cache_hit_rate, report.missing_keys
    );

    Ok(())
}
