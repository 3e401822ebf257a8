//! Declared fields and their per-locale clones.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::cycle::ComponentId;

/// What a field's working value looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// A single value (text input, toggle, select, ...)
    Scalar,
    /// A repeating group of identical sub-records
    Repeater,
    /// A polymorphic block set
    Builder,
}

impl FieldKind {
    /// Collection fields hold nested lists of sub-records.
    #[must_use]
    pub const fn is_collection(self) -> bool {
        matches!(self, Self::Repeater | Self::Builder)
    }
}

/// What a hydrate observer sees of the field it runs on.
#[derive(Debug, Clone, Copy)]
pub struct HookContext<'a> {
    pub id: ComponentId,
    pub name: &'a str,
    pub attribute: &'a str,
    pub locale: &'a str,
    pub state_path: &'a str,
}

/// Callback run when a field is hydrated, with the working value at that point.
pub type HydrateObserver = Arc<dyn Fn(&HookContext<'_>, &Value) + Send + Sync>;

/// A field as the user declared it, before cloning.
#[derive(Clone)]
pub struct FieldDefinition {
    pub name: String,
    /// Declared state path. Defaults to the name.
    pub state_path: Option<String>,
    pub kind: FieldKind,
    pub required: bool,
    pub hidden: bool,
    /// Hydrate observers attached before the field reached the tabs.
    pub observers: Vec<HydrateObserver>,
}

impl fmt::Debug for FieldDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDefinition")
            .field("name", &self.name)
            .field("state_path", &self.state_path)
            .field("kind", &self.kind)
            .field("required", &self.required)
            .field("hidden", &self.hidden)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl FieldDefinition {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            state_path: None,
            kind,
            required: false,
            hidden: false,
            observers: Vec::new(),
        }
    }

    #[must_use]
    pub fn scalar(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Scalar)
    }

    #[must_use]
    pub fn repeater(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Repeater)
    }

    #[must_use]
    pub fn builder(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Builder)
    }

    #[must_use]
    pub fn state_path(mut self, path: impl Into<String>) -> Self {
        self.state_path = Some(path.into());
        self
    }

    #[must_use]
    pub const fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub const fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    #[must_use]
    pub fn after_state_hydrated<F>(mut self, observer: F) -> Self
    where
        F: Fn(&HookContext<'_>, &Value) + Send + Sync + 'static,
    {
        self.observers.push(Arc::new(observer));
        self
    }

    /// The declared path, falling back to the name.
    #[must_use]
    pub fn declared_path(&self) -> &str {
        self.state_path.as_deref().unwrap_or(&self.name)
    }
}

/// `{attribute, locale}` tag carried by collection clones for bulk refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleMeta {
    pub attribute: String,
    pub locale: String,
}

/// One entry of a clone's ordered hydrate list.
#[derive(Clone)]
pub enum HydrateStep {
    /// A pre-existing observer, run as is
    Observer(HydrateObserver),
    /// Pull the clone's locale slice out of the attribute map
    LocaleSlice,
}

impl fmt::Debug for HydrateStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Observer(_) => f.write_str("Observer(<fn>)"),
            Self::LocaleSlice => f.write_str("LocaleSlice"),
        }
    }
}

/// Lifecycle of a cloned field within one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldPhase {
    #[default]
    Unbound,
    Hydrated,
    Updating,
    Idle,
}

/// A per-locale copy of a declared field.
#[derive(Debug, Clone)]
pub struct ClonedField {
    pub id: ComponentId,
    /// `{name}_{locale}`
    pub name: String,
    /// Logical attribute used for driver and path resolution
    pub attribute: String,
    /// Where the attribute's locale map lives in the host state
    pub attribute_path: String,
    pub locale: String,
    /// Locale-specific path this clone is bound to
    pub state_path: String,
    pub kind: FieldKind,
    pub required: bool,
    pub hidden: bool,
    pub steps: Vec<HydrateStep>,
    pub meta: Option<LocaleMeta>,
    pub working_value: Value,
    pub phase: FieldPhase,
}

impl ClonedField {
    #[must_use]
    pub fn context(&self) -> HookContext<'_> {
        HookContext {
            id: self.id,
            name: &self.name,
            attribute: &self.attribute,
            locale: &self.locale,
            state_path: &self.state_path,
        }
    }

    /// Whether the locale synchronisation hook is installed.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.steps.iter().any(|step| matches!(step, HydrateStep::LocaleSlice))
    }

    #[must_use]
    pub const fn is_visible(&self) -> bool {
        !self.hidden
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    #[rstest]
    #[case(FieldKind::Scalar, false)]
    #[case(FieldKind::Repeater, true)]
    #[case(FieldKind::Builder, true)]
    fn collection_kinds(#[case] kind: FieldKind, #[case] expected: bool) {
        assert_that!(kind.is_collection(), eq(expected));
    }

    #[rstest]
    fn declared_path_defaults_to_name() {
        let plain = FieldDefinition::scalar("title");
        let nested = FieldDefinition::scalar("title").state_path("meta.title");

        assert_that!(plain.declared_path(), eq("title"));
        assert_that!(nested.declared_path(), eq("meta.title"));
    }

    #[rstest]
    fn builder_methods_collect_observers() {
        let field = FieldDefinition::builder("content")
            .required(true)
            .hidden(true)
            .after_state_hydrated(|_, _| {})
            .after_state_hydrated(|_, _| {});

        assert_that!(field.observers.len(), eq(2));
        assert_that!(field.required, eq(true));
        assert_that!(format!("{field:?}"), contains_substring("observers: 2"));
    }
}
