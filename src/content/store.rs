//! Content Store data model

use std::collections::BTreeMap;

use serde::{
    Deserialize,
    Serialize,
};

/// A single translated entry: plain text or an ordered list of items.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ContentValue {
    Text(String),
    List(Vec<String>),
}

impl From<&str> for ContentValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Vec<String>> for ContentValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

/// Translations of one language, keyed by content key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ContentTable(BTreeMap<String, ContentValue>);

impl ContentTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ContentValue> {
        self.0.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ContentValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContentValue)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for ContentTable
where
    K: Into<String>,
    V: Into<ContentValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(key, value)| (key.into(), value.into())).collect())
    }
}

/// Every language's Content Table, keyed by language code.
///
/// Mirrors `{ "pt": { "hotel_name": "...", "breakfast_items": ["..."] }, ... }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ContentStore(BTreeMap<String, ContentTable>);

impl ContentStore {
    /// Parse a Content Store document.
    ///
    /// # Errors
    /// Returns error if the document is not a mapping of mappings of
    /// string-or-string-list values.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Built-in store used when the document cannot be loaded.
    #[must_use]
    pub fn fallback() -> Self {
        [
            ("pt", "Seja muito bem-vindo!"),
            ("en", "Welcome!"),
            ("es", "¡Bienvenido!"),
        ]
        .into_iter()
        .map(|(language, welcome)| {
            let table: ContentTable =
                [("hotel_name", "Hotel Maerkli"), ("welcome", welcome)].into_iter().collect();
            (language, table)
        })
        .collect()
    }

    #[must_use]
    pub fn table(&self, language: &str) -> Option<&ContentTable> {
        self.0.get(language)
    }

    #[must_use]
    pub fn supports(&self, language: &str) -> bool {
        self.0.contains_key(language)
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn tables(&self) -> impl Iterator<Item = (&str, &ContentTable)> {
        self.0.iter().map(|(language, table)| (language.as_str(), table))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, ContentTable)> for ContentStore {
    fn from_iter<I: IntoIterator<Item = (K, ContentTable)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(language, table)| (language.into(), table)).collect())
    }
}
