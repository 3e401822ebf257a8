//! language-tabs
//!
//! フォームのフィールドをロケールごとのタブに複製し、翻訳値を状態コンテナと同期するライブラリ

pub mod cloner;
pub mod config;
pub mod cycle;
pub mod driver;
pub mod error;
pub mod field;
pub mod lifecycle;
pub mod locale;
pub mod logging;
pub mod normalizer;
pub mod path;
pub mod record;
pub mod state;
pub mod tabs;

// 主要な型を再エクスポート
pub use config::LanguageTabsSettings;
pub use driver::{
    DriverDescriptor,
    DriverKind,
};
pub use error::{
    RecordError,
    TabsError,
};
pub use field::{
    ClonedField,
    FieldDefinition,
    FieldKind,
};
pub use record::{
    InMemoryRecord,
    TranslatableRecord,
};
pub use state::{
    JsonState,
    StateContainer,
};
pub use tabs::LanguageTabs;
