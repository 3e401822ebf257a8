//! ロケール解決モジュール
//!
//! 編集中のレコードと設定から、タブとして表示するロケールの一覧を決定します。

use std::collections::HashSet;

use crate::config::LanguageTabsSettings;
use crate::record::TranslatableRecord;

/// 重複のない、順序付きのロケール一覧
///
/// 先頭のロケールがベースロケールのフォールバックになります。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocaleSet {
    /// 最初の出現順に並んだロケール
    locales: Vec<String>,
}

impl LocaleSet {
    /// 重複を最初の出現位置で取り除いて作成する
    pub fn new<I, S>(locales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let locales = locales
            .into_iter()
            .map(Into::into)
            .filter(|locale: &String| seen.insert(locale.clone()))
            .collect();
        Self { locales }
    }

    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.locales.first().map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, locale: &str) -> bool {
        self.locales.iter().any(|l| l == locale)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.locales.iter().map(String::as_str)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.locales
    }
}

/// 空でないロケール一覧だけを採用する
fn non_empty(locales: Option<Vec<String>>) -> Option<LocaleSet> {
    locales.filter(|l| !l.is_empty()).map(LocaleSet::new)
}

/// 有効なロケール一覧を解決する
///
/// # 優先度
/// 1. レコードの `translatable_locales()`
/// 2. レコードの `declared_locales()`
/// 3. 設定の `default_locales`
/// 4. 設定の `app_locale` のみ
///
/// 失敗することはなく、最低でも 1 件のロケールを返します。
#[must_use]
pub fn resolve_locales(
    record: Option<&dyn TranslatableRecord>,
    settings: &LanguageTabsSettings,
) -> LocaleSet {
    let from_record = record.and_then(|record| {
        non_empty(record.translatable_locales()).or_else(|| non_empty(record.declared_locales()))
    });

    from_record
        .or_else(|| non_empty(Some(settings.default_locales.clone())))
        .unwrap_or_else(|| LocaleSet::new([settings.app_locale.clone()]))
}

/// ベースロケールを解決する
///
/// レコードの `base_locale()` → ロケール一覧の先頭 → `app_locale` の順。
#[must_use]
pub fn resolve_base_locale(
    record: Option<&dyn TranslatableRecord>,
    locales: &LocaleSet,
    settings: &LanguageTabsSettings,
) -> String {
    record
        .and_then(|record| record.base_locale())
        .or_else(|| locales.first().map(str::to_string))
        .unwrap_or_else(|| settings.app_locale.clone())
}

/// タブのラベル（設定にない場合はロケールを大文字化）
#[must_use]
pub fn locale_label(locale: &str, settings: &LanguageTabsSettings) -> String {
    settings.locale_labels.get(locale).cloned().unwrap_or_else(|| locale.to_uppercase())
}

/// タブのキー
#[must_use]
pub fn tab_key(locale: &str) -> String {
    format!("tab_{locale}")
}
