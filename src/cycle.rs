//! Per-render-cycle bookkeeping.

use std::collections::HashSet;
use std::fmt;

/// Opaque identity of a cloned field, assigned when the clone is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(
    /// Allocation order within a `RenderCycle`
    u64,
);

impl ComponentId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// State that lives for one render cycle.
///
/// `begin` clears both sets; identities keep increasing across cycles so a
/// stale clone never collides with a fresh one.
#[derive(Debug, Default)]
pub struct RenderCycle {
    /// Next identity to hand out
    next_id: u64,
    /// `(component, locale)` pairs whose hooks are already installed
    processed: HashSet<(ComponentId, String)>,
    /// Attributes already coerced to a locale map
    normalized: HashSet<String>,
}

impl RenderCycle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new cycle.
    pub fn begin(&mut self) {
        tracing::trace!(
            processed = self.processed.len(),
            normalized = self.normalized.len(),
            "Starting render cycle"
        );
        self.processed.clear();
        self.normalized.clear();
    }

    pub fn allocate_id(&mut self) -> ComponentId {
        let id = ComponentId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Marks `(id, locale)` processed. Returns false if it already was.
    pub fn mark_processed(&mut self, id: ComponentId, locale: &str) -> bool {
        self.processed.insert((id, locale.to_string()))
    }

    #[must_use]
    pub fn is_processed(&self, id: ComponentId, locale: &str) -> bool {
        self.processed.contains(&(id, locale.to_string()))
    }

    pub fn mark_normalized(&mut self, attribute: &str) {
        self.normalized.insert(attribute.to_string());
    }

    #[must_use]
    pub fn is_normalized(&self, attribute: &str) -> bool {
        self.normalized.contains(attribute)
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    #[googletest::test]
    fn ids_are_unique_across_cycles() {
        let mut cycle = RenderCycle::new();

        let first = cycle.allocate_id();
        cycle.begin();
        let second = cycle.allocate_id();

        expect_that!(first == second, eq(false));
        expect_that!(second.get(), eq(1));
    }

    #[googletest::test]
    fn mark_processed_is_once_per_locale() {
        let mut cycle = RenderCycle::new();
        let id = cycle.allocate_id();

        expect_that!(cycle.mark_processed(id, "en"), eq(true));
        expect_that!(cycle.mark_processed(id, "en"), eq(false));
        expect_that!(cycle.mark_processed(id, "fr"), eq(true));
        expect_that!(cycle.is_processed(id, "fr"), eq(true));
    }

    #[googletest::test]
    fn begin_clears_sets() {
        let mut cycle = RenderCycle::new();
        let id = cycle.allocate_id();
        cycle.mark_processed(id, "en");
        cycle.mark_normalized("title");

        cycle.begin();

        expect_that!(cycle.is_processed(id, "en"), eq(false));
        expect_that!(cycle.is_normalized("title"), eq(false));
    }
}
