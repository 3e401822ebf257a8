//! `.language-tabs.json` の読み込み

use std::io::ErrorKind;
use std::path::Path;

use super::{
    ConfigError,
    LanguageTabsSettings,
};

/// 設定ファイル名
pub(super) const CONFIG_FILE_NAME: &str = ".language-tabs.json";

/// ワークスペース直下の `.language-tabs.json` を読み込む
///
/// ファイルがなければ `Ok(None)`。読み込み・パースに失敗した場合は
/// 対象ファイルのパスをエラーに含めます。
pub(super) fn load_from_workspace(
    workspace_root: &Path,
) -> Result<Option<LanguageTabsSettings>, ConfigError> {
    let path = workspace_root.join(CONFIG_FILE_NAME);

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(error) if error.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "No language tabs configuration");
            return Ok(None);
        }
        Err(source) => return Err(ConfigError::IoError { path, source }),
    };

    match serde_json::from_str(&content) {
        Ok(settings) => {
            tracing::debug!(path = %path.display(), "Loaded language tabs configuration");
            Ok(Some(settings))
        }
        Err(source) => Err(ConfigError::ParseError { path, source }),
    }
}
