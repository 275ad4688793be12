//! テスト用ユーティリティ
//!
//! 複数のテストモジュールで使用される共通のヘルパーを提供します。
#![cfg(test)]

use std::collections::HashMap;

use crate::content::{
    ContentStore,
    ContentTable,
    FetchError,
    Request,
    ResourceFetcher,
};

/// メモリ上のファイルを返す `ResourceFetcher`
#[derive(Debug, Default)]
pub(crate) struct StaticFetcher {
    /// パス → 内容
    files: HashMap<String, Vec<u8>>,
}

impl StaticFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(mut self, path: &str, body: &str) -> Self {
        self.files.insert(path.to_string(), body.as_bytes().to_vec());
        self
    }
}

impl ResourceFetcher for StaticFetcher {
    async fn fetch(&self, request: &Request) -> Result<Vec<u8>, FetchError> {
        self.files.get(&request.path).cloned().ok_or_else(|| FetchError::Io {
            path: request.path.clone(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        })
    }
}

/// テスト用の `ContentStore` を作成する
///
/// 各言語の `hotel_name` / `welcome` / `breakfast_items` を含む。
pub(crate) fn hotel_store() -> ContentStore {
    let mut pt = ContentTable::new();
    pt.insert("hotel_name", "Hotel Maerkli");
    pt.insert("welcome", "Seja muito bem-vindo!");
    pt.insert("breakfast_items", items(&["Café", "Pão", "Suco"]));

    let mut en = ContentTable::new();
    en.insert("hotel_name", "Hotel Maerkli");
    en.insert("welcome", "Welcome!");
    en.insert("breakfast_items", items(&["Coffee", "Bread", "Juice"]));

    let mut es = ContentTable::new();
    es.insert("hotel_name", "Hotel Maerkli");
    es.insert("welcome", "¡Bienvenido!");

    [("pt", pt), ("en", en), ("es", es)].into_iter().collect()
}

/// 文字列スライスからリスト値を作成する
pub(crate) fn items(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}
