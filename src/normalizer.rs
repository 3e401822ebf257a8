//! Attribute state normalisation.
//!
//! Before any locale-scoped read or write, an attribute's working state must
//! be a map from locale to value. This module coerces whatever the host holds
//! into that shape.

use serde_json::{
    Map,
    Value,
};

use crate::cycle::RenderCycle;
use crate::locale::LocaleSet;
use crate::record::TranslatableRecord;

/// Locale → value. Once normalised, every configured locale has a key.
pub type TranslationMap = Map<String, Value>;

/// Coerces raw attribute state into a [`TranslationMap`].
#[derive(Clone, Copy)]
pub struct Normalizer<'a> {
    /// Source of persisted translations
    record: Option<&'a dyn TranslatableRecord>,
    /// Configured locales; the map is restricted to and backfilled with these
    locales: &'a LocaleSet,
    /// Locale a bare scalar is seeded under
    base_locale: &'a str,
}

impl std::fmt::Debug for Normalizer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Normalizer")
            .field("record", &self.record.map(|_| "<TranslatableRecord>"))
            .field("locales", &self.locales)
            .field("base_locale", &self.base_locale)
            .finish()
    }
}

impl<'a> Normalizer<'a> {
    #[must_use]
    pub fn new(
        record: Option<&'a dyn TranslatableRecord>,
        locales: &'a LocaleSet,
        base_locale: &'a str,
    ) -> Self {
        Self { record, locales, base_locale }
    }

    /// Normalises `raw` for `attribute`.
    ///
    /// # Algorithm
    /// 1. Already normalised this cycle and `raw` is a map: return `raw` as is
    /// 2. Persisted translations from the record, if any (errors count as none)
    /// 3. Else `raw` if it is a map, a non-empty scalar seeded under the base
    ///    locale, or an empty map
    /// 4. Drop locales outside the configured set, backfill missing ones with null
    ///
    /// Normalising an already normalised map returns an equal map.
    #[must_use]
    pub fn normalize(
        &self,
        cycle: &mut RenderCycle,
        attribute: &str,
        raw: &Value,
    ) -> TranslationMap {
        if let Value::Object(map) = raw
            && cycle.is_normalized(attribute)
        {
            return map.clone();
        }

        let translations = self
            .persisted_translations(attribute)
            .filter(|map| !map.is_empty())
            .unwrap_or_else(|| self.seed(raw));

        let mut normalized = TranslationMap::new();
        for locale in self.locales.iter() {
            let value = translations.get(locale).cloned().unwrap_or(Value::Null);
            normalized.insert(locale.to_string(), value);
        }

        cycle.mark_normalized(attribute);
        tracing::debug!(attribute = %attribute, locales = normalized.len(), "Normalized attribute state");

        normalized
    }

    /// Translations the record already holds for `attribute`.
    fn persisted_translations(&self, attribute: &str) -> Option<TranslationMap> {
        let record = self.record?;
        match record.translations(attribute) {
            Ok(translations) => translations,
            Err(error) => {
                tracing::warn!(attribute = %attribute, %error, "Ignoring unreadable translations");
                None
            }
        }
    }

    /// Starting map when the record has nothing for the attribute.
    fn seed(&self, raw: &Value) -> TranslationMap {
        match raw {
            Value::Object(map) => map.clone(),
            Value::Null | Value::Array(_) => TranslationMap::new(),
            Value::String(s) if s.is_empty() => TranslationMap::new(),
            scalar => {
                let mut map = TranslationMap::new();
                map.insert(self.base_locale.to_string(), scalar.clone());
                map
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;
    use serde_json::json;

    use super::*;
    use crate::error::RecordError;
    use crate::record::InMemoryRecord;

    fn to_value(map: TranslationMap) -> Value {
        Value::Object(map)
    }

    #[fixture]
    fn locales() -> LocaleSet {
        LocaleSet::new(["en", "fr", "de"])
    }

    #[rstest]
    #[case::string(&["en", "fr", "de"], json!("Hello"))]
    #[case::number(&["en", "fr", "de"], json!(42))]
    #[case::boolean(&["en", "fr", "de"], json!(true))]
    #[case::single_locale(&["en"], json!("Hello"))]
    #[case::reordered(&["de", "en", "fr"], json!("Hallo"))]
    #[case::region_codes(&["pt-br", "pt", "es"], json!("Olá"))]
    fn scalar_seed_goes_to_base_locale(#[case] codes: &[&str], #[case] seed: Value) {
        let locales = LocaleSet::new(codes.iter().copied());
        let base_locale = locales.first().unwrap();
        let normalizer = Normalizer::new(None, &locales, base_locale);
        let mut cycle = RenderCycle::new();

        let map = normalizer.normalize(&mut cycle, "title", &seed);

        let mut expected = TranslationMap::new();
        for locale in codes {
            let value = if *locale == base_locale { seed.clone() } else { Value::Null };
            expected.insert((*locale).to_string(), value);
        }
        assert_eq!(to_value(map), Value::Object(expected));
    }

    #[rstest]
    #[case::null(json!(null))]
    #[case::empty_string(json!(""))]
    #[case::list(json!(["a", "b"]))]
    fn empty_seed_backfills_nulls(locales: LocaleSet, #[case] seed: Value) {
        let normalizer = Normalizer::new(None, &locales, "en");
        let mut cycle = RenderCycle::new();

        let map = normalizer.normalize(&mut cycle, "title", &seed);

        assert_eq!(to_value(map), json!({"en": null, "fr": null, "de": null}));
    }

    #[rstest]
    fn raw_map_is_restricted_and_backfilled(locales: LocaleSet) {
        let normalizer = Normalizer::new(None, &locales, "en");
        let mut cycle = RenderCycle::new();

        let map = normalizer.normalize(&mut cycle, "title", &json!({"fr": "Salut", "xx": "?"}));

        assert_eq!(to_value(map), json!({"en": null, "fr": "Salut", "de": null}));
        assert_that!(cycle.is_normalized("title"), eq(true));
    }

    #[rstest]
    fn record_translations_win_over_raw(locales: LocaleSet) {
        let record = InMemoryRecord::new().with_translations("title", json!({"en": "Hello"}));
        let normalizer = Normalizer::new(Some(&record), &locales, "en");
        let mut cycle = RenderCycle::new();

        let map = normalizer.normalize(&mut cycle, "title", &json!("ignored"));

        assert_eq!(to_value(map), json!({"en": "Hello", "fr": null, "de": null}));
    }

    #[rstest]
    fn empty_record_translations_fall_back_to_raw(locales: LocaleSet) {
        let record = InMemoryRecord::new().with_translations("title", json!({}));
        let normalizer = Normalizer::new(Some(&record), &locales, "fr");
        let mut cycle = RenderCycle::new();

        let map = normalizer.normalize(&mut cycle, "title", &json!("Salut"));

        assert_eq!(to_value(map), json!({"en": null, "fr": "Salut", "de": null}));
    }

    /// A record whose translations accessor always fails.
    struct FailingRecord;

    impl TranslatableRecord for FailingRecord {
        fn translations(
            &self,
            attribute: &str,
        ) -> std::result::Result<Option<TranslationMap>, RecordError> {
            Err(RecordError::NotTranslatable(attribute.to_string()))
        }
    }

    #[rstest]
    fn record_errors_are_treated_as_empty(locales: LocaleSet) {
        let record = FailingRecord;
        let normalizer = Normalizer::new(Some(&record), &locales, "en");
        let mut cycle = RenderCycle::new();

        let map = normalizer.normalize(&mut cycle, "title", &json!("Hello"));

        assert_eq!(to_value(map), json!({"en": "Hello", "fr": null, "de": null}));
    }

    #[rstest]
    fn normalize_is_idempotent(locales: LocaleSet) {
        let normalizer = Normalizer::new(None, &locales, "en");
        let mut cycle = RenderCycle::new();

        let once = to_value(normalizer.normalize(&mut cycle, "title", &json!("Hello")));
        let twice = to_value(normalizer.normalize(&mut cycle, "title", &once));

        assert_eq!(once, twice);
    }

    #[rstest]
    fn normalize_is_idempotent_across_cycles(locales: LocaleSet) {
        let normalizer = Normalizer::new(None, &locales, "en");
        let mut cycle = RenderCycle::new();

        let once = to_value(normalizer.normalize(&mut cycle, "title", &json!("Hello")));
        cycle.begin();
        let twice = to_value(normalizer.normalize(&mut cycle, "title", &once));

        assert_eq!(once, twice);
    }

    #[rstest]
    fn normalized_attribute_short_circuits(locales: LocaleSet) {
        let record = InMemoryRecord::new().with_translations("title", json!({"en": "Stored"}));
        let normalizer = Normalizer::new(Some(&record), &locales, "en");
        let mut cycle = RenderCycle::new();
        let _ = normalizer.normalize(&mut cycle, "title", &Value::Null);

        let edited = json!({"en": "Edited", "fr": null, "de": null});
        let map = normalizer.normalize(&mut cycle, "title", &edited);

        assert_eq!(to_value(map), edited);
    }
}
