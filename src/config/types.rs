use std::time::Duration;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "defaultExpanded[0]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// 検証エラーを番号付きの行に整形する
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteSettings {
    /// Content Store document, relative to the site root.
    pub content_path: String,

    /// Language applied at startup and substituted for unsupported codes.
    pub default_language: String,

    /// Accordion sections that start expanded.
    pub default_expanded: Vec<String>,

    /// Slot name of the persisted language preference.
    pub preference_key: String,

    /// Delay before scrolling a freshly expanded section into view.
    pub scroll_delay_ms: u64,

    /// How long the error banner stays on screen.
    pub banner_timeout_ms: u64,

    /// Two touch ends closer than this are treated as a double tap.
    pub double_tap_window_ms: u64,

    /// Disables the post-expand scroll entirely.
    pub reduced_motion: bool,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            content_path: "data/content.json".to_string(),
            default_language: "pt".to_string(),
            default_expanded: vec![
                "checkin".to_string(),
                "wifi".to_string(),
                "parking".to_string(),
            ],
            preference_key: "hotelMaerkliLang".to_string(),
            scroll_delay_ms: 100,
            banner_timeout_ms: 5000,
            double_tap_window_ms: 300,
            reduced_motion: false,
        }
    }
}

impl SiteSettings {
    #[must_use]
    pub const fn scroll_delay(&self) -> Duration {
        Duration::from_millis(self.scroll_delay_ms)
    }

    #[must_use]
    pub const fn banner_timeout(&self) -> Duration {
        Duration::from_millis(self.banner_timeout_ms)
    }

    #[must_use]
    pub const fn double_tap_window(&self) -> Duration {
        Duration::from_millis(self.double_tap_window_ms)
    }

    /// # Errors
    /// - Required field is empty
    /// - Content path escapes the site root
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.content_path.is_empty() {
            errors.push(ValidationError::new(
                "contentPath",
                "The path cannot be empty. Example: \"data/content.json\"",
            ));
        } else if self.content_path.split('/').any(|part| part == "..") {
            errors.push(ValidationError::new(
                "contentPath",
                format!("The path '{}' must stay inside the site root", self.content_path),
            ));
        }

        if self.default_language.is_empty() {
            errors.push(ValidationError::new(
                "defaultLanguage",
                "The language cannot be empty. Example: \"pt\"",
            ));
        }

        if self.preference_key.is_empty() {
            errors.push(ValidationError::new(
                "preferenceKey",
                "The key cannot be empty. Example: \"hotelMaerkliLang\"",
            ));
        }

        for (index, section) in self.default_expanded.iter().enumerate() {
            if section.is_empty() {
                errors.push(ValidationError::new(
                    format!("defaultExpanded[{index}]"),
                    "Section names cannot be empty",
                ));
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
