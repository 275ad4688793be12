//! 言語設定の永続化
//!
//! 選択された言語コードを 1 つのスロットに文字列として保存する。
//! 起動時の読み戻しは行わない（常にデフォルト言語で開始する）。

use std::collections::HashMap;
use std::path::PathBuf;

use serde_json::{
    Map,
    Value,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreferenceError {
    #[error("Failed to access preference file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Preference file is corrupted: {0}")]
    Parse(#[from] serde_json::Error),
}

/// キー・バリュー形式の永続ストレージ
pub trait PreferenceStore {
    /// 値を書き込む
    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError>;

    /// 値を読み込む
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError>;
}

/// メモリ上のストレージ
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    /// キー → 値
    values: HashMap<String, String>,
}

impl MemoryPreferences {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.values.get(key).cloned())
    }
}

/// JSON ファイルに保存するストレージ
///
/// ファイルは `{ "hotelMaerkliLang": "en" }` の形式。
#[derive(Debug, Clone)]
pub struct FilePreferences {
    /// 保存先のパス
    path: PathBuf,
}

impl FilePreferences {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// ファイル全体を読み込む（存在しない場合は空）
    fn read_all(&self) -> Result<Map<String, Value>, PreferenceError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl PreferenceStore for FilePreferences {
    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let mut values = self.read_all()?;
        values.insert(key.to_string(), Value::String(value.to_string()));

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&values)?)?;
        tracing::debug!(key, value, path = ?self.path, "Preference saved");
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.read_all()?.get(key).and_then(Value::as_str).map(str::to_string))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    #[rstest]
    fn memory_preferences_overwrite() {
        let mut preferences = MemoryPreferences::new();

        preferences.set("hotelMaerkliLang", "en").unwrap();
        preferences.set("hotelMaerkliLang", "es").unwrap();

        assert_eq!(preferences.get("hotelMaerkliLang").unwrap().as_deref(), Some("es"));
        assert_eq!(preferences.get("other").unwrap(), None);
    }

    /// 既存の他のキーは保持される
    #[rstest]
    fn file_preferences_create_and_keep_other_keys() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state/preferences.json");
        std::fs::create_dir_all(temp_dir.path().join("state")).unwrap();
        std::fs::write(&path, r#"{"theme": "dark"}"#).unwrap();
        let mut preferences = FilePreferences::new(&path);

        preferences.set("hotelMaerkliLang", "en").unwrap();

        let reopened = FilePreferences::new(&path);
        assert_eq!(reopened.get("hotelMaerkliLang").unwrap().as_deref(), Some("en"));
        assert_eq!(reopened.get("theme").unwrap().as_deref(), Some("dark"));
    }

    #[rstest]
    fn file_preferences_missing_file_reads_none() {
        let temp_dir = TempDir::new().unwrap();
        let preferences = FilePreferences::new(temp_dir.path().join("preferences.json"));

        assert_eq!(preferences.get("hotelMaerkliLang").unwrap(), None);
    }

    #[rstest]
    fn file_preferences_corrupted_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("preferences.json");
        std::fs::write(&path, "not json").unwrap();
        let mut preferences = FilePreferences::new(&path);

        assert!(matches!(preferences.set("hotelMaerkliLang", "pt"), Err(PreferenceError::Parse(_))));
    }
}
