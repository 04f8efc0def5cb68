//! Client-side internationalization: resolve the user's locale, load its
//! message catalog and translate `data-i18n*` marked documents.

pub mod config;
pub mod error;
pub mod i18n;
