//! The host state container.
//!
//! Synchronisation never holds a reference into storage; it reads and writes
//! the form's working values only through [`StateContainer`].

use serde_json::{
    Map,
    Value,
};

use crate::path::PATH_SEPARATOR;

/// Dotted-path access to the host form's working-value tree.
pub trait StateContainer {
    /// Value at `path`, `Value::Null` when absent.
    fn get(&self, path: &str) -> Value;

    /// Writes `value` at `path`.
    ///
    /// With `notify = false` the host must skip its update-triggered side
    /// effects (used for hydration-time normalisation writes).
    fn set(&mut self, path: &str, value: Value, notify: bool);

    /// Targeted display refresh. Hosts without one ignore it.
    fn refresh(&mut self, _paths: &[String]) {}
}

/// A write recorded by [`JsonState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateWrite {
    pub path: String,
    pub notify: bool,
}

/// [`StateContainer`] over an in-memory JSON tree.
///
/// Records every write and refresh request so the side effects of a
/// hydrate/update sequence can be inspected.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonState {
    /// Root of the working-value tree
    root: Value,
    /// Every `set`, in order
    writes: Vec<StateWrite>,
    /// Every `refresh` request, in order
    refreshes: Vec<Vec<String>>,
}

impl Default for JsonState {
    fn default() -> Self {
        Self { root: Value::Object(Map::new()), writes: Vec::new(), refreshes: Vec::new() }
    }
}

impl JsonState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing tree. Non-object roots are replaced by an empty object.
    #[must_use]
    pub fn from_value(root: Value) -> Self {
        if root.is_object() { Self { root, ..Self::default() } } else { Self::default() }
    }

    #[must_use]
    pub const fn root(&self) -> &Value {
        &self.root
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.root
    }

    #[must_use]
    pub fn writes(&self) -> &[StateWrite] {
        &self.writes
    }

    /// Paths written with `notify = true`.
    pub fn notified_paths(&self) -> impl Iterator<Item = &str> {
        self.writes.iter().filter(|w| w.notify).map(|w| w.path.as_str())
    }

    #[must_use]
    pub fn refreshes(&self) -> &[Vec<String>] {
        &self.refreshes
    }

    /// Forgets recorded writes and refreshes, keeping the tree.
    pub fn clear_history(&mut self) {
        self.writes.clear();
        self.refreshes.clear();
    }
}

impl StateContainer for JsonState {
    fn get(&self, path: &str) -> Value {
        lookup(&self.root, path).cloned().unwrap_or(Value::Null)
    }

    fn set(&mut self, path: &str, value: Value, notify: bool) {
        tracing::trace!(path = %path, notify, "State write");
        assign(&mut self.root, path, value);
        self.writes.push(StateWrite { path: path.to_string(), notify });
    }

    fn refresh(&mut self, paths: &[String]) {
        tracing::trace!(?paths, "State refresh");
        self.refreshes.push(paths.to_vec());
    }
}

/// Follows `path` through nested objects. Array segments are numeric indices.
#[must_use]
pub fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(root);
    }
    path.split(PATH_SEPARATOR).try_fold(root, |node, segment| match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Writes `value` at `path`.
///
/// Objects and arrays on the way are kept; an array segment must be an
/// in-bounds index, otherwise nothing is written. Any other node on the way
/// is replaced with an object.
pub fn assign(root: &mut Value, path: &str, value: Value) {
    if path.is_empty() {
        *root = value;
        return;
    }

    let mut node = root;
    let mut segments = path.split(PATH_SEPARATOR).peekable();
    while let Some(segment) = segments.next() {
        if !node.is_object() && !node.is_array() {
            *node = Value::Object(Map::new());
        }
        let slot = match node {
            Value::Array(items) => {
                let Some(item) = segment.parse::<usize>().ok().and_then(|i| items.get_mut(i)) else {
                    tracing::warn!(path = %path, segment = %segment, "No array element, write skipped");
                    return;
                };
                item
            }
            Value::Object(map) => map.entry(segment.to_string()).or_insert(Value::Null),
            _ => return,
        };
        if segments.peek().is_none() {
            *slot = value;
            return;
        }
        node = slot;
    }
}
