//! State path resolution.
//!
//! Every function here is pure: the same attribute, locale and driver always
//! produce the same path, so cloned fields keep a stable identity across
//! re-renders.

use crate::driver::{
    DriverDescriptor,
    DriverKind,
};

/// Separator between segments of a dotted state path.
pub const PATH_SEPARATOR: char = '.';

/// Path of `locale`'s value for `attribute`, relative to the attribute's parent.
///
/// # Examples
/// ```
/// use language_tabs::driver::{DriverDescriptor, DriverKind};
/// use language_tabs::path::resolve_path;
///
/// let hybrid = DriverDescriptor::new(DriverKind::HybridColumn, "extra");
///
/// assert_eq!(resolve_path("title", "en", &hybrid, "en"), "title");
/// assert_eq!(resolve_path("title", "fr", &hybrid, "en"), "extra.fr.title");
/// ```
#[must_use]
pub fn resolve_path(
    attribute: &str,
    locale: &str,
    driver: &DriverDescriptor,
    base_locale: &str,
) -> String {
    let storage = &driver.storage_column;
    match driver.kind {
        DriverKind::Plain => format!("{attribute}{PATH_SEPARATOR}{locale}"),
        DriverKind::HybridColumn if locale == base_locale => attribute.to_string(),
        DriverKind::HybridColumn | DriverKind::ExtraOnly => {
            format!("{storage}{PATH_SEPARATOR}{locale}{PATH_SEPARATOR}{attribute}")
        }
    }
}

/// Splits a field's declared path into its parent prefix and its last segment.
///
/// A path without a separator has no prefix.
#[must_use]
pub fn split_last(path: &str) -> (Option<&str>, &str) {
    path.rsplit_once(PATH_SEPARATOR)
        .map_or((None, path), |(prefix, last)| (Some(prefix), last))
}

/// Joins `relative` under an optional parent prefix.
#[must_use]
pub fn join(prefix: Option<&str>, relative: &str) -> String {
    match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}{PATH_SEPARATOR}{relative}"),
        _ => relative.to_string(),
    }
}

/// Full state path for a cloned field.
///
/// The declared path (or the field name when none is declared) keeps its
/// prefix up to the last separator; the locale-specific relative path replaces
/// the last segment.
#[must_use]
pub fn resolve_field_path(
    declared_path: &str,
    locale: &str,
    driver: &DriverDescriptor,
    base_locale: &str,
) -> String {
    let (prefix, attribute) = split_last(declared_path);
    join(prefix, &resolve_path(attribute, locale, driver, base_locale))
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    fn driver(kind: DriverKind) -> DriverDescriptor {
        DriverDescriptor::new(kind, "extra")
    }

    #[rstest]
    #[case::plain_base(DriverKind::Plain, "en", "title.en")]
    #[case::plain_other(DriverKind::Plain, "fr", "title.fr")]
    #[case::hybrid_base(DriverKind::HybridColumn, "en", "title")]
    #[case::hybrid_other(DriverKind::HybridColumn, "fr", "extra.fr.title")]
    #[case::extra_base(DriverKind::ExtraOnly, "en", "extra.en.title")]
    #[case::extra_other(DriverKind::ExtraOnly, "fr", "extra.fr.title")]
    fn resolve_path_by_driver(#[case] kind: DriverKind, #[case] locale: &str, #[case] expected: &str) {
        assert_that!(resolve_path("title", locale, &driver(kind), "en"), eq(expected));
    }

    #[rstest]
    fn resolve_path_hybrid_follows_base_locale() {
        let hybrid = driver(DriverKind::HybridColumn);

        assert_that!(resolve_path("title", "de", &hybrid, "de"), eq("title"));
        assert_that!(resolve_path("title", "en", &hybrid, "de"), eq("extra.en.title"));
    }

    #[rstest]
    fn resolve_path_uses_storage_column() {
        let extra = DriverDescriptor::new(DriverKind::ExtraOnly, "i18n");

        assert_that!(resolve_path("title", "fr", &extra, "en"), eq("i18n.fr.title"));
    }

    #[rstest]
    #[case("title", None, "title")]
    #[case("meta.title", Some("meta"), "title")]
    #[case("a.b.title", Some("a.b"), "title")]
    fn split_last_cases(
        #[case] path: &str,
        #[case] prefix: Option<&str>,
        #[case] last: &str,
    ) {
        let (actual_prefix, actual_last) = split_last(path);

        assert_eq!(actual_prefix, prefix);
        assert_that!(actual_last, eq(last));
    }

    #[rstest]
    #[case::flat("title", DriverKind::Plain, "fr", "title.fr")]
    #[case::nested_plain("meta.title", DriverKind::Plain, "fr", "meta.title.fr")]
    #[case::nested_hybrid_base("meta.title", DriverKind::HybridColumn, "en", "meta.title")]
    #[case::nested_hybrid("meta.title", DriverKind::HybridColumn, "fr", "meta.extra.fr.title")]
    #[case::nested_extra("a.b.title", DriverKind::ExtraOnly, "en", "a.b.extra.en.title")]
    fn resolve_field_path_keeps_prefix(
        #[case] declared: &str,
        #[case] kind: DriverKind,
        #[case] locale: &str,
        #[case] expected: &str,
    ) {
        assert_that!(resolve_field_path(declared, locale, &driver(kind), "en"), eq(expected));
    }

    #[rstest]
    fn resolve_path_is_deterministic() {
        let hybrid = driver(DriverKind::HybridColumn);

        let first = resolve_field_path("meta.title", "fr", &hybrid, "en");
        let second = resolve_field_path("meta.title", "fr", &hybrid, "en");

        assert_eq!(first, second);
    }
}
