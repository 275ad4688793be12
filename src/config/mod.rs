//! サイト設定 (`.hotel-guide.json`)
/// 設定ファイルの読み込み
mod loader;
/// 設定の保持と更新
mod manager;
/// 設定の型定義
mod types;

pub use manager::ConfigManager;
pub use types::{
    ConfigError,
    SiteSettings,
    ValidationError,
};
