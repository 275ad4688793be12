//! hotel-guide
//!
//! 多言語対応のホテル案内ページ。コンテンツのローカライズ、アコーディオン、
//! キャッシュをすべて削除して自身を登録解除するワーカーから成る。

pub mod accordion;
pub mod analytics;
pub mod app;
pub mod config;
pub mod content;
pub mod display;
pub mod localizer;
pub mod preference;
pub mod worker;

#[cfg(test)]
mod test_utils;

// HotelApp を再エクスポート
pub use app::HotelApp;
