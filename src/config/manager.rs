//! 設定管理を行うモジュール

use std::path::PathBuf;

use super::{
    ConfigError,
    SiteSettings,
    loader,
};

/// 設定管理を行う
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定
    current_settings: SiteSettings,

    /// サイトのルートパス
    site_root: Option<PathBuf>,
}

impl ConfigManager {
    /// デフォルト設定のマネージャーを作成
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 設定を読み込む
    ///
    /// 設定ファイルがない場合はデフォルト値を使う。
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load_settings(&mut self, site_root: Option<PathBuf>) -> Result<(), ConfigError> {
        let settings = site_root
            .as_deref()
            .map(loader::load_from_site)
            .transpose()?
            .flatten()
            .unwrap_or_default();

        self.apply(settings)?;
        tracing::debug!(site_root = ?site_root, settings = ?self.current_settings, "Site settings loaded");
        self.site_root = site_root;
        Ok(())
    }

    /// 設定を差し替える（サイトルートは変えない）
    pub fn update_settings(&mut self, new_settings: SiteSettings) -> Result<(), ConfigError> {
        self.apply(new_settings)?;
        tracing::debug!("Site settings replaced");
        Ok(())
    }

    /// 検証に通った設定だけを反映する
    fn apply(&mut self, settings: SiteSettings) -> Result<(), ConfigError> {
        if let Err(errors) = settings.validate() {
            for error in &errors {
                tracing::warn!(field = %error.field_path, "Invalid site setting: {}", error.message);
            }
            return Err(ConfigError::ValidationErrors(errors));
        }
        self.current_settings = settings;
        Ok(())
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn get_settings(&self) -> &SiteSettings {
        &self.current_settings
    }

    /// サイトルートを取得
    #[must_use]
    pub const fn site_root(&self) -> Option<&PathBuf> {
        self.site_root.as_ref()
    }
}
