//! The record (model) collaborator.
//!
//! A record is optional: forms for records that do not exist yet, or hosts
//! that have no model layer at all, simply pass `None`. Every accessor on
//! [`TranslatableRecord`] is optional too and defaults to "not provided".

use std::collections::{
    BTreeMap,
    HashMap,
};

use serde::{
    Deserialize,
    Serialize,
};
use serde_json::{
    Map,
    Value,
};

use crate::driver::DriverKind;
use crate::error::RecordError;

/// Per-attribute storage overrides declared by a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AttributeDefinition {
    pub driver: Option<DriverKind>,
    /// Column holding the attribute's non-inline translations.
    pub storage: Option<String>,
}

/// Read-only view of the record being edited.
pub trait TranslatableRecord {
    /// Whether `attribute` carries translatable metadata on this record.
    fn is_translatable_attribute(&self, _attribute: &str) -> bool {
        false
    }

    /// The attribute's per-attribute definition, if the record declares one.
    ///
    /// Attributes listed as translatable without a definition should return
    /// `Some(AttributeDefinition::default())`.
    fn attribute_definition(&self, _attribute: &str) -> Option<AttributeDefinition> {
        None
    }

    /// Persisted translations for `attribute`.
    fn translations(&self, _attribute: &str) -> Result<Option<Map<String, Value>>, RecordError> {
        Ok(None)
    }

    /// Locale list computed by the record.
    fn translatable_locales(&self) -> Option<Vec<String>> {
        None
    }

    /// Locale list the record declares statically. Consulted after
    /// [`Self::translatable_locales`].
    fn declared_locales(&self) -> Option<Vec<String>> {
        None
    }

    /// Locale stored inline under the hybrid driver.
    fn base_locale(&self) -> Option<String> {
        None
    }

    /// Record-wide translation storage column.
    fn translation_storage_column(&self) -> Option<String> {
        None
    }
}

/// An attribute entry in a record's translatable metadata.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum TranslatableEntry {
    /// Listed by name only, all defaults apply.
    Bare(String),
    /// Listed with overrides.
    Defined(BTreeMap<String, AttributeDefinition>),
}

/// A record held entirely in memory.
///
/// Suitable for hosts that already loaded the model into JSON, and for tests.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct InMemoryRecord {
    /// Translatable metadata, as declared on the model.
    pub translatable: Vec<TranslatableEntry>,
    /// Persisted translations by attribute.
    pub translations: HashMap<String, Value>,
    pub locales: Option<Vec<String>>,
    pub declared_locales: Option<Vec<String>>,
    pub base_locale: Option<String>,
    pub storage_column: Option<String>,
}

impl InMemoryRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `attribute` translatable with default storage.
    #[must_use]
    pub fn with_translatable(mut self, attribute: impl Into<String>) -> Self {
        self.translatable.push(TranslatableEntry::Bare(attribute.into()));
        self
    }

    /// Marks `attribute` translatable with its own driver and storage column.
    #[must_use]
    pub fn with_definition(
        mut self,
        attribute: impl Into<String>,
        definition: AttributeDefinition,
    ) -> Self {
        let mut defined = BTreeMap::new();
        defined.insert(attribute.into(), definition);
        self.translatable.push(TranslatableEntry::Defined(defined));
        self
    }

    #[must_use]
    pub fn with_translations(mut self, attribute: impl Into<String>, translations: Value) -> Self {
        self.translations.insert(attribute.into(), translations);
        self
    }

    #[must_use]
    pub fn with_locales<I, S>(mut self, locales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.locales = Some(locales.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_base_locale(mut self, locale: impl Into<String>) -> Self {
        self.base_locale = Some(locale.into());
        self
    }

    #[must_use]
    pub fn with_storage_column(mut self, column: impl Into<String>) -> Self {
        self.storage_column = Some(column.into());
        self
    }
}

impl TranslatableRecord for InMemoryRecord {
    fn is_translatable_attribute(&self, attribute: &str) -> bool {
        self.attribute_definition(attribute).is_some()
    }

    fn attribute_definition(&self, attribute: &str) -> Option<AttributeDefinition> {
        self.translatable.iter().find_map(|entry| match entry {
            TranslatableEntry::Bare(name) if name == attribute => {
                Some(AttributeDefinition::default())
            }
            TranslatableEntry::Bare(_) => None,
            TranslatableEntry::Defined(defined) => defined.get(attribute).cloned(),
        })
    }

    /// Records without translatable metadata serve any attribute; records
    /// with metadata only serve the attributes it lists.
    fn translations(&self, attribute: &str) -> Result<Option<Map<String, Value>>, RecordError> {
        if !self.translatable.is_empty() && !self.is_translatable_attribute(attribute) {
            return Err(RecordError::NotTranslatable(attribute.to_string()));
        }
        match self.translations.get(attribute) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map.clone())),
            Some(other) => Err(RecordError::Decode {
                attribute: attribute.to_string(),
                message: format!("expected an object keyed by locale, found {other}"),
            }),
        }
    }

    fn translatable_locales(&self) -> Option<Vec<String>> {
        self.locales.clone()
    }

    fn declared_locales(&self) -> Option<Vec<String>> {
        self.declared_locales.clone()
    }

    fn base_locale(&self) -> Option<String> {
        self.base_locale.clone()
    }

    fn translation_storage_column(&self) -> Option<String> {
        self.storage_column.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;
    use serde_json::json;

    use super::*;

    #[rstest]
    fn bare_attribute_has_default_definition() {
        let record = InMemoryRecord::new().with_translatable("title");

        assert_that!(record.is_translatable_attribute("title"), eq(true));
        assert_that!(record.is_translatable_attribute("body"), eq(false));
        assert_eq!(record.attribute_definition("title"), Some(AttributeDefinition::default()));
    }

    #[rstest]
    fn defined_attribute_keeps_overrides() {
        let definition = AttributeDefinition {
            driver: Some(DriverKind::ExtraOnly),
            storage: Some("i18n".to_string()),
        };
        let record = InMemoryRecord::new().with_definition("title", definition.clone());

        assert_eq!(record.attribute_definition("title"), Some(definition));
    }

    #[rstest]
    fn deserialize_mixed_translatable_metadata() {
        let record: InMemoryRecord = serde_json::from_value(json!({
            "translatable": ["title", {"body": {"driver": "hybrid", "storage": "extra"}}],
            "base_locale": "de"
        }))
        .unwrap();

        assert_that!(record.is_translatable_attribute("title"), eq(true));
        assert_eq!(
            record.attribute_definition("body").and_then(|d| d.driver),
            Some(DriverKind::HybridColumn)
        );
        assert_that!(record.base_locale(), some(eq("de")));
    }

    #[rstest]
    fn translations_reject_non_object() {
        let record = InMemoryRecord::new().with_translations("title", json!("Hello"));

        assert!(matches!(record.translations("title"), Err(RecordError::Decode { .. })));
    }

    #[rstest]
    fn translations_of_unlisted_attribute_are_refused() {
        let record = InMemoryRecord::new()
            .with_translatable("title")
            .with_translations("title", json!({"en": "Hello"}))
            .with_translations("slug", json!({"en": "hello"}));

        assert_eq!(
            record.translations("slug"),
            Err(RecordError::NotTranslatable("slug".to_string()))
        );
        assert_that!(record.translations("title").unwrap().is_some(), eq(true));
    }

    #[rstest]
    fn translations_missing_is_none() {
        let record = InMemoryRecord::new();

        assert_eq!(record.translations("title"), Ok(None));
    }
}
