//! tracing の初期化

use tracing_subscriber::EnvFilter;

/// フィルタ指定を読む環境変数
pub const LOG_ENV_VAR: &str = "LANGUAGE_TABS_LOG";

/// fmt サブスクライバーをグローバルに登録する
///
/// `LANGUAGE_TABS_LOG` が設定されていればそれを、なければ `default_filter`
/// （例: `"language_tabs=debug"`）を使います。
/// 既にサブスクライバーが登録済みの場合は何もしません。
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(default_filter));

    if tracing_subscriber::fmt().with_env_filter(filter).try_init().is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
