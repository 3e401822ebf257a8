use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::driver::DriverKind;
use crate::path::PATH_SEPARATOR;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// Path to the offending field (e.g., "default_locales[0]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file '{}': {source}", .path.display())]
    IoError { path: PathBuf, source: std::io::Error },

    #[error("Failed to parse configuration file '{}': {source}", .path.display())]
    ParseError { path: PathBuf, source: serde_json::Error },
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Global configuration for language tabs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LanguageTabsSettings {
    /// Locales used when the record does not declare its own.
    pub default_locales: Vec<String>,

    /// Locales whose cloned fields keep their declared required-ness.
    /// Clones for every other locale are optional.
    pub required_locales: Vec<String>,

    /// Tab labels by locale. Missing locales are shown upper-cased.
    pub locale_labels: BTreeMap<String, String>,

    /// Driver for translatable attributes without their own definition.
    pub default_driver: DriverKind,

    /// Column holding non-inline translations for `hybrid` and `extra_only`.
    pub storage_column: String,

    /// Application locale, the last resort when nothing else names a locale.
    pub app_locale: String,
}

impl Default for LanguageTabsSettings {
    fn default() -> Self {
        Self {
            default_locales: Vec::new(),
            required_locales: Vec::new(),
            locale_labels: BTreeMap::new(),
            default_driver: DriverKind::Plain,
            storage_column: "extra".to_string(),
            app_locale: "en".to_string(),
        }
    }
}

impl LanguageTabsSettings {
    /// # Errors
    /// - Empty or dotted storage column
    /// - Empty or dotted locale code
    /// - Empty tab label
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.storage_column.is_empty() {
            errors.push(ValidationError::new(
                "storage_column",
                "The storage column cannot be empty. Example: \"extra\"",
            ));
        } else if self.storage_column.contains(PATH_SEPARATOR) {
            errors.push(ValidationError::new(
                "storage_column",
                format!(
                    "The storage column '{}' cannot contain '{PATH_SEPARATOR}'",
                    self.storage_column
                ),
            ));
        }

        if let Some(message) = locale_problem(&self.app_locale) {
            errors.push(ValidationError::new("app_locale", message));
        }

        for (index, locale) in self.default_locales.iter().enumerate() {
            if let Some(message) = locale_problem(locale) {
                errors.push(ValidationError::new(format!("default_locales[{index}]"), message));
            }
        }

        for (index, locale) in self.required_locales.iter().enumerate() {
            if let Some(message) = locale_problem(locale) {
                errors.push(ValidationError::new(format!("required_locales[{index}]"), message));
            }
        }

        for (locale, label) in &self.locale_labels {
            if label.trim().is_empty() {
                errors.push(ValidationError::new(
                    format!("locale_labels.{locale}"),
                    "The label cannot be empty. Remove the entry to fall back to the locale code",
                ));
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Returns true if clones for `locale` keep their declared required-ness.
    #[must_use]
    pub fn is_required_locale(&self, locale: &str) -> bool {
        self.required_locales.iter().any(|l| l == locale)
    }
}

/// Locale codes become path segments, so they must be non-empty and dot-free.
fn locale_problem(locale: &str) -> Option<String> {
    if locale.trim().is_empty() {
        return Some("The locale cannot be empty. Example: \"en\"".to_string());
    }
    if locale.contains(PATH_SEPARATOR) {
        return Some(format!("The locale '{locale}' cannot contain '{PATH_SEPARATOR}'"));
    }
    None
}
