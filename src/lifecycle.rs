//! Hydrate and update hooks for cloned fields.
//!
//! Every clone reads and writes its attribute's whole locale map through the
//! host [`StateContainer`]. The field kind only decides how a locale slice
//! becomes a working value and back, see [`SlotBinding`].

use serde_json::{
    Map,
    Value,
};

use crate::cycle::RenderCycle;
use crate::field::{
    ClonedField,
    FieldKind,
    FieldPhase,
    HydrateStep,
    LocaleMeta,
};
use crate::normalizer::{
    Normalizer,
    TranslationMap,
};
use crate::path::PATH_SEPARATOR;
use crate::state::StateContainer;

/// Conversion between a stored locale slice and a field's working value.
pub trait SlotBinding {
    /// Working value for a hydrated locale slice (`None` when the locale has no key).
    fn working_value(&self, slice: Option<&Value>) -> Value;

    /// Value stored under the locale after the user edited the field.
    fn stored_value(&self, edited: Value) -> Value;
}

/// Single-valued fields. An emptied input is stored as null.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarSlot;

impl SlotBinding for ScalarSlot {
    fn working_value(&self, slice: Option<&Value>) -> Value {
        slice.cloned().unwrap_or(Value::Null)
    }

    fn stored_value(&self, edited: Value) -> Value {
        match edited {
            Value::String(s) if s.is_empty() => Value::Null,
            other => other,
        }
    }
}

/// Repeaters and builders. Their working value is always a collection.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionSlot;

impl SlotBinding for CollectionSlot {
    fn working_value(&self, slice: Option<&Value>) -> Value {
        match slice {
            Some(value @ (Value::Array(_) | Value::Object(_))) => value.clone(),
            _ => empty_collection(),
        }
    }

    fn stored_value(&self, edited: Value) -> Value {
        if edited.is_null() { empty_collection() } else { edited }
    }
}

/// The empty value a collection field starts from.
fn empty_collection() -> Value {
    Value::Array(Vec::new())
}

impl FieldKind {
    #[must_use]
    pub fn binding(self) -> &'static dyn SlotBinding {
        if self.is_collection() { &CollectionSlot } else { &ScalarSlot }
    }
}

/// Installs the locale hook on a clone.
///
/// The hook is appended after the clone's existing observers so those run
/// first, and never twice. A collection clone is wired at most once per
/// cycle for a given locale and gets tagged with its `{attribute, locale}`.
///
/// Returns false when the clone was skipped.
pub fn bind(field: &mut ClonedField, cycle: &mut RenderCycle) -> bool {
    if field.kind.is_collection() {
        if !cycle.mark_processed(field.id, &field.locale) {
            tracing::debug!(id = %field.id, locale = %field.locale, "Collection already wired");
            return false;
        }
        field.meta =
            Some(LocaleMeta { attribute: field.attribute.clone(), locale: field.locale.clone() });
    } else if field.is_bound() {
        return false;
    }

    if !field.is_bound() {
        field.steps.push(HydrateStep::LocaleSlice);
    }
    true
}

/// Populates the clone's working value from the host state.
///
/// Runs the clone's hydrate steps in order. The locale step normalises the
/// attribute state if it is not a map yet, writing it back without
/// notifications, then takes this locale's slice.
pub fn hydrate(
    field: &mut ClonedField,
    state: &mut dyn StateContainer,
    normalizer: &Normalizer<'_>,
    cycle: &mut RenderCycle,
) {
    let steps = field.steps.clone();
    for step in &steps {
        match step {
            HydrateStep::Observer(observer) => observer(&field.context(), &field.working_value),
            HydrateStep::LocaleSlice => {
                let translations = attribute_map(field, state, normalizer, cycle);
                field.working_value = field.kind.binding().working_value(translations.get(&field.locale));
            }
        }
    }

    field.phase = FieldPhase::Hydrated;
    tracing::debug!(field = %field.name, locale = %field.locale, "Hydrated field");
}

/// Reads the attribute map, normalising and storing it first when needed.
fn attribute_map(
    field: &ClonedField,
    state: &mut dyn StateContainer,
    normalizer: &Normalizer<'_>,
    cycle: &mut RenderCycle,
) -> TranslationMap {
    match state.get(&field.attribute_path) {
        Value::Object(map) => map,
        raw => {
            let normalized = normalizer.normalize(cycle, &field.attribute, &raw);
            state.set(&field.attribute_path, Value::Object(normalized.clone()), false);
            normalized
        }
    }
}

/// Writes an edited working value back into the attribute's locale slot.
///
/// The whole map is written in one `set` with notifications, then the host
/// is asked to refresh `{attribute}.{locale}` and `{attribute}`.
///
/// Reads and writes always target the locale map at `attribute_path`, for
/// every driver. Under `HybridColumn` and `ExtraOnly` the clone's
/// `state_path` is only its binding label: nothing is written to
/// `{storage}.{locale}.{attribute}`, and under `HybridColumn` the base-locale
/// clone's `state_path` is the attribute path holding the map itself. Hosts
/// persisting those layouts split the map on save.
pub fn update(field: &mut ClonedField, edited: Value, state: &mut dyn StateContainer) {
    field.phase = FieldPhase::Updating;

    if field.is_bound() {
        let mut translations = match state.get(&field.attribute_path) {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let stored = field.kind.binding().stored_value(edited.clone());
        translations.insert(field.locale.clone(), stored);

        state.set(&field.attribute_path, Value::Object(translations), true);
        state.refresh(&[
            format!("{}{PATH_SEPARATOR}{}", field.attribute_path, field.locale),
            field.attribute_path.clone(),
        ]);
        tracing::debug!(field = %field.name, locale = %field.locale, "Updated translation");
    }

    field.working_value = edited;
    field.phase = FieldPhase::Idle;
}
