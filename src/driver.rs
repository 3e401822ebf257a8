//! Storage drivers for translatable attributes.

use serde::{
    Deserialize,
    Serialize,
};

use crate::config::LanguageTabsSettings;
use crate::record::TranslatableRecord;

/// How a translatable attribute is physically laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum DriverKind {
    /// `{attribute}.{locale}`
    #[default]
    #[serde(rename = "json")]
    Plain,
    /// Base locale inline at `{attribute}`, others at `{storage}.{locale}.{attribute}`.
    #[serde(rename = "hybrid")]
    HybridColumn,
    /// Always `{storage}.{locale}.{attribute}`.
    #[serde(rename = "extra_only")]
    ExtraOnly,
}

/// A driver together with the storage column it addresses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DriverDescriptor {
    pub kind: DriverKind,
    pub storage_column: String,
}

impl DriverDescriptor {
    #[must_use]
    pub fn new(kind: DriverKind, storage_column: impl Into<String>) -> Self {
        Self { kind, storage_column: storage_column.into() }
    }

    /// The plain driver. It never reads the storage column.
    #[must_use]
    pub fn plain(settings: &LanguageTabsSettings) -> Self {
        Self::new(DriverKind::Plain, settings.storage_column.clone())
    }
}

/// Selects the driver for `attribute`.
///
/// # Resolution
/// 1. No record, or the record does not mark the attribute translatable: `Plain`
/// 2. Attribute definition's driver, else `settings.default_driver`
///
/// The storage column comes from the attribute definition, then the record's
/// storage column, then `settings.storage_column`.
#[must_use]
pub fn resolve_driver(
    attribute: &str,
    record: Option<&dyn TranslatableRecord>,
    settings: &LanguageTabsSettings,
) -> DriverDescriptor {
    let Some(record) = record else {
        return DriverDescriptor::plain(settings);
    };

    if !record.is_translatable_attribute(attribute) {
        return DriverDescriptor::plain(settings);
    }

    let definition = record.attribute_definition(attribute).unwrap_or_default();
    let kind = definition.driver.unwrap_or(settings.default_driver);
    let storage_column = definition
        .storage
        .or_else(|| record.translation_storage_column())
        .unwrap_or_else(|| settings.storage_column.clone());

    tracing::debug!(attribute = %attribute, driver = ?kind, storage = %storage_column, "Resolved driver");

    DriverDescriptor { kind, storage_column }
}
