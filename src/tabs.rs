//! The language tabs component.
//!
//! [`LanguageTabs`] owns the declared schema and drives one render cycle at a
//! time: resolve locales, clone the schema into per-locale tabs, hydrate the
//! clones from the host state, then route user edits and locale switches
//! back into it.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::cloner::{
    FieldCloner,
    LocaleTab,
};
use crate::config::LanguageTabsSettings;
use crate::cycle::RenderCycle;
use crate::error::TabsError;
use crate::field::{
    ClonedField,
    FieldDefinition,
};
use crate::lifecycle;
use crate::locale::{
    LocaleSet,
    resolve_base_locale,
    resolve_locales,
};
use crate::normalizer::Normalizer;
use crate::record::TranslatableRecord;
use crate::state::StateContainer;

/// Per-locale tabs over a declared field schema.
pub struct LanguageTabs {
    /// Fields as declared, cloned once per locale on every render
    schema: Vec<FieldDefinition>,
    /// Global configuration
    settings: LanguageTabsSettings,
    /// Record being edited, if any
    record: Option<Arc<dyn TranslatableRecord>>,
    /// Bookkeeping for the current render
    cycle: RenderCycle,
    /// Tabs of the last render, in locale order
    tabs: Vec<LocaleTab>,
    /// Locales resolved by the last render
    locales: LocaleSet,
    /// Base locale resolved by the last render
    base_locale: String,
    /// Locale of the tab the user is looking at
    current_locale: Option<String>,
    /// Whether the last render produced a collection clone
    has_collections: bool,
}

impl fmt::Debug for LanguageTabs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageTabs")
            .field("schema", &self.schema)
            .field("record", &self.record.as_ref().map(|_| "<TranslatableRecord>"))
            .field("locales", &self.locales)
            .field("base_locale", &self.base_locale)
            .field("current_locale", &self.current_locale)
            .field("has_collections", &self.has_collections)
            .finish_non_exhaustive()
    }
}

impl LanguageTabs {
    #[must_use]
    pub fn new(schema: Vec<FieldDefinition>, settings: LanguageTabsSettings) -> Self {
        Self {
            schema,
            settings,
            record: None,
            cycle: RenderCycle::new(),
            tabs: Vec::new(),
            locales: LocaleSet::default(),
            base_locale: String::new(),
            current_locale: None,
            has_collections: false,
        }
    }

    /// Sets the record being edited. Takes effect on the next render.
    #[must_use]
    pub fn with_record(mut self, record: Arc<dyn TranslatableRecord>) -> Self {
        self.record = Some(record);
        self
    }

    /// Starts a new render cycle and rebuilds every tab.
    ///
    /// The active locale is kept if it is still configured, otherwise it
    /// moves to the first locale.
    pub fn render(&mut self) {
        self.cycle.begin();

        let record = self.record.as_deref();
        self.locales = resolve_locales(record, &self.settings);
        self.base_locale = resolve_base_locale(record, &self.locales, &self.settings);

        let cloner = FieldCloner::new(&self.settings, record, &self.locales, &self.base_locale);
        self.tabs = cloner.clone_tabs(&self.schema, &mut self.cycle);
        self.has_collections =
            self.tabs.iter().flat_map(|tab| &tab.fields).any(|field| field.kind.is_collection());

        let keep_current =
            self.current_locale.as_deref().is_some_and(|locale| self.locales.contains(locale));
        if !keep_current {
            self.current_locale = self.locales.first().map(str::to_string);
        }

        tracing::debug!(
            locales = ?self.locales.as_slice(),
            base_locale = %self.base_locale,
            fields = self.schema.len(),
            "Rendered language tabs"
        );
    }

    /// Hydrates every clone from `state`, tab by tab.
    pub fn hydrate(&mut self, state: &mut dyn StateContainer) {
        let normalizer = Normalizer::new(self.record.as_deref(), &self.locales, &self.base_locale);
        for field in self.tabs.iter_mut().flat_map(|tab| tab.fields.iter_mut()) {
            lifecycle::hydrate(field, state, &normalizer, &mut self.cycle);
        }
    }

    /// Applies a user edit to the `field` clone in `locale`'s tab.
    ///
    /// # Errors
    /// [`TabsError`] if there is no such tab or field.
    pub fn update(
        &mut self,
        locale: &str,
        field: &str,
        value: Value,
        state: &mut dyn StateContainer,
    ) -> Result<(), TabsError> {
        let tab = self
            .tabs
            .iter_mut()
            .find(|tab| tab.locale == locale)
            .ok_or_else(|| TabsError::UnknownLocale(locale.to_string()))?;
        let clone = tab.field_mut(field).ok_or_else(|| TabsError::UnknownField {
            locale: locale.to_string(),
            field: field.to_string(),
        })?;

        lifecycle::update(clone, value, state);
        Ok(())
    }

    /// Switches the active tab and refreshes its collection clones.
    ///
    /// Returns how many clones were refreshed.
    ///
    /// # Errors
    /// [`TabsError::UnknownLocale`] if `locale` has no tab.
    pub fn change_locale(
        &mut self,
        locale: &str,
        state: &mut dyn StateContainer,
    ) -> Result<usize, TabsError> {
        if !self.locales.contains(locale) {
            return Err(TabsError::UnknownLocale(locale.to_string()));
        }
        self.current_locale = Some(locale.to_string());
        tracing::debug!(locale = %locale, "Changed active locale");

        Ok(self.refresh_collections(state))
    }

    /// Re-applies the active locale's slice to every visible collection
    /// clone tagged with that locale, then runs its update hook.
    ///
    /// Every tab is walked, hidden clones included; only visible ones are
    /// refreshed. Returns how many clones were refreshed.
    pub fn refresh_collections(&mut self, state: &mut dyn StateContainer) -> usize {
        let Some(active) = self.current_locale.as_deref() else {
            return 0;
        };

        let mut refreshed = 0;
        for field in self.tabs.iter_mut().flat_map(|tab| tab.fields.iter_mut()) {
            let tagged_active = field.meta.as_ref().is_some_and(|meta| meta.locale == active);
            if !tagged_active || !field.is_visible() {
                continue;
            }
            let working = locale_slice(field, state);
            field.working_value = working.clone();
            lifecycle::update(field, working, state);
            refreshed += 1;
        }

        tracing::debug!(locale = %active, refreshed, "Refreshed collection fields");
        refreshed
    }

    #[must_use]
    pub fn tabs(&self) -> &[LocaleTab] {
        &self.tabs
    }

    #[must_use]
    pub fn tab(&self, locale: &str) -> Option<&LocaleTab> {
        self.tabs.iter().find(|tab| tab.locale == locale)
    }

    /// The `name` clone in `locale`'s tab.
    #[must_use]
    pub fn field(&self, locale: &str, name: &str) -> Option<&ClonedField> {
        self.tab(locale).and_then(|tab| tab.field(name))
    }

    #[must_use]
    pub const fn locales(&self) -> &LocaleSet {
        &self.locales
    }

    #[must_use]
    pub fn base_locale(&self) -> &str {
        &self.base_locale
    }

    #[must_use]
    pub fn current_locale(&self) -> Option<&str> {
        self.current_locale.as_deref()
    }

    #[must_use]
    pub const fn has_collections(&self) -> bool {
        self.has_collections
    }

    #[must_use]
    pub const fn settings(&self) -> &LanguageTabsSettings {
        &self.settings
    }
}

/// The clone's working value for its locale's current slice.
fn locale_slice(field: &ClonedField, state: &dyn StateContainer) -> Value {
    let translations = state.get(&field.attribute_path);
    field.kind.binding().working_value(translations.get(&field.locale))
}
