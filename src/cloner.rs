//! Per-locale field cloning.

use serde_json::Value;

use crate::config::LanguageTabsSettings;
use crate::cycle::RenderCycle;
use crate::driver::resolve_driver;
use crate::field::{
    ClonedField,
    FieldDefinition,
    FieldPhase,
    HydrateStep,
};
use crate::lifecycle;
use crate::locale::{
    LocaleSet,
    locale_label,
    tab_key,
};
use crate::path::{
    resolve_field_path,
    split_last,
};
use crate::record::TranslatableRecord;

/// One locale's tab with its cloned fields.
#[derive(Debug, Clone)]
pub struct LocaleTab {
    /// `tab_{locale}`
    pub key: String,
    pub label: String,
    pub locale: String,
    pub fields: Vec<ClonedField>,
}

impl LocaleTab {
    /// Looks a clone up by its declared (unsuffixed) name.
    #[must_use]
    pub fn field(&self, declared_name: &str) -> Option<&ClonedField> {
        let name = clone_name(declared_name, &self.locale);
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn field_mut(&mut self, declared_name: &str) -> Option<&mut ClonedField> {
        let name = clone_name(declared_name, &self.locale);
        self.fields.iter_mut().find(|field| field.name == name)
    }
}

/// `{name}_{locale}`
#[must_use]
pub fn clone_name(name: &str, locale: &str) -> String {
    format!("{name}_{locale}")
}

/// Clones declared fields once per locale and rebinds each clone.
#[derive(Clone, Copy)]
pub struct FieldCloner<'a> {
    /// Required locales, labels and driver defaults
    settings: &'a LanguageTabsSettings,
    /// Record consulted for per-attribute drivers
    record: Option<&'a dyn TranslatableRecord>,
    /// One tab is produced per locale, in this order
    locales: &'a LocaleSet,
    /// Locale stored inline under the hybrid driver
    base_locale: &'a str,
}

impl std::fmt::Debug for FieldCloner<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldCloner")
            .field("record", &self.record.map(|_| "<TranslatableRecord>"))
            .field("locales", &self.locales)
            .field("base_locale", &self.base_locale)
            .finish_non_exhaustive()
    }
}

impl<'a> FieldCloner<'a> {
    #[must_use]
    pub fn new(
        settings: &'a LanguageTabsSettings,
        record: Option<&'a dyn TranslatableRecord>,
        locales: &'a LocaleSet,
        base_locale: &'a str,
    ) -> Self {
        Self { settings, record, locales, base_locale }
    }

    /// One tab per locale, in locale order, each holding a clone of every
    /// declared field in declaration order.
    pub fn clone_tabs(&self, schema: &[FieldDefinition], cycle: &mut RenderCycle) -> Vec<LocaleTab> {
        self.locales
            .iter()
            .map(|locale| LocaleTab {
                key: tab_key(locale),
                label: locale_label(locale, self.settings),
                locale: locale.to_string(),
                fields: schema.iter().map(|definition| self.clone_field(definition, locale, cycle)).collect(),
            })
            .collect()
    }

    /// Clones `definition` for `locale`.
    ///
    /// The clone gets a fresh identity, the `{name}_{locale}` name and its
    /// locale-specific state path, then has its locale hook installed.
    pub fn clone_field(
        &self,
        definition: &FieldDefinition,
        locale: &str,
        cycle: &mut RenderCycle,
    ) -> ClonedField {
        let declared_path = definition.declared_path();
        let (_, attribute) = split_last(declared_path);
        let driver = resolve_driver(attribute, self.record, self.settings);
        let state_path = resolve_field_path(declared_path, locale, &driver, self.base_locale);
        let required = definition.required && self.settings.is_required_locale(locale);

        let mut field = ClonedField {
            id: cycle.allocate_id(),
            name: clone_name(&definition.name, locale),
            attribute: attribute.to_string(),
            attribute_path: declared_path.to_string(),
            locale: locale.to_string(),
            state_path,
            kind: definition.kind,
            required,
            hidden: definition.hidden,
            steps: definition.observers.iter().cloned().map(HydrateStep::Observer).collect(),
            meta: None,
            working_value: Value::Null,
            phase: FieldPhase::Unbound,
        };
        lifecycle::bind(&mut field, cycle);

        tracing::debug!(
            field = %field.name,
            locale = %locale,
            state_path = %field.state_path,
            "Cloned field"
        );
        field
    }
}
