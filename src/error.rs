use thiserror::Error;

/// Errors a record may report while reading its persisted translations.
///
/// The normalizer never propagates these; they are logged and treated as
/// "no existing translations".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The attribute is not known to the record
    #[error("Attribute '{0}' is not translatable on this record")]
    NotTranslatable(String),
    /// The stored value could not be decoded into a translation map
    #[error("Failed to decode translations for '{attribute}': {message}")]
    Decode { attribute: String, message: String },
}

/// Caller mistakes when driving a `LanguageTabs` component.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TabsError {
    /// No tab was rendered for the requested locale
    #[error("No tab for locale '{0}'")]
    UnknownLocale(String),
    /// The tab has no cloned field with this name
    #[error("No field '{field}' in tab for locale '{locale}'")]
    UnknownField { locale: String, field: String },
}
