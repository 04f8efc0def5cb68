//! Catalog validation module.
//!
//! Compares a locale's catalog against a reference catalog (usually the
//! default locale) to catch keys that would fall back to the raw key text and
//! placeholders that would be left unsubstituted.

use crate::i18n::Catalog;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Validation report containing errors and warnings about a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Keys that would render wrong for users
    pub errors: Vec<String>,

    /// Suspicious but harmless differences
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

/// Validator for catalog completeness.
pub struct CatalogValidator;

static PLACEHOLDER_NAME_REGEX: OnceLock<Regex> = OnceLock::new();

impl CatalogValidator {
    /// Validate `candidate` against `reference`.
    ///
    /// Errors:
    /// - key present in the reference but missing from the candidate
    /// - string whose `{placeholder}` names differ from the reference
    ///
    /// Warnings:
    /// - key only present in the candidate
    pub fn validate(reference: &Catalog, candidate: &Catalog) -> ValidationReport {
        let mut report = ValidationReport::new();

        let reference_keys: BTreeSet<String> = reference.leaf_keys().into_iter().collect();
        let candidate_keys: BTreeSet<String> = candidate.leaf_keys().into_iter().collect();

        for key in reference_keys.difference(&candidate_keys) {
            report.errors.push(format!("Missing key: {}", key));
        }

        for key in candidate_keys.difference(&reference_keys) {
            report.warnings.push(format!("Extra key: {}", key));
        }

        for key in reference_keys.intersection(&candidate_keys) {
            let (Some(Value::String(expected)), Some(Value::String(actual))) =
                (reference.lookup(key), candidate.lookup(key))
            else {
                continue;
            };

            let expected_names = Self::extract_placeholders(expected);
            let actual_names = Self::extract_placeholders(actual);
            if expected_names != actual_names {
                report.errors.push(format!(
                    "Placeholder mismatch in {}: expected {:?}, found {:?}",
                    key, expected_names, actual_names
                ));
            }
        }

        report
    }

    /// Extract the distinct `{name}` placeholders of a string
    fn extract_placeholders(text: &str) -> BTreeSet<String> {
        let regex =
            PLACEHOLDER_NAME_REGEX.get_or_init(|| Regex::new(r"\{([^{}]*)\}").unwrap());

        regex
            .captures_iter(text)
            .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
            .collect()
    }
}
