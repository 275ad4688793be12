//! Translation coverage audit
//!
//! Every language is expected to define the same keys. Missing keys never
//! break rendering (the element keeps its previous text), so this is only
//! reported, never enforced.

use std::collections::BTreeSet;

use super::ContentStore;

/// A key defined by some language but absent from `language`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MissingKey {
    pub language: String,
    pub key: String,
}

/// Collect the keys each language is missing relative to the union of all languages.
#[must_use]
pub fn find_missing_keys(store: &ContentStore) -> Vec<MissingKey> {
    let all_keys: BTreeSet<&str> = store.tables().flat_map(|(_, table)| table.keys()).collect();

    let mut missing = Vec::new();
    for (language, table) in store.tables() {
        for key in &all_keys {
            if !table.contains_key(key) {
                missing.push(MissingKey { language: language.to_string(), key: (*key).to_string() });
            }
        }
    }

    missing
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;
    use crate::content::ContentTable;

    fn table(keys: &[&str]) -> ContentTable {
        keys.iter().map(|key| (*key, "text")).collect()
    }

    #[googletest::test]
    fn complete_store_has_no_missing_keys() {
        let store: ContentStore = [
            ("pt", table(&["hotel_name", "welcome"])),
            ("en", table(&["hotel_name", "welcome"])),
        ]
        .into_iter()
        .collect();

        expect_that!(find_missing_keys(&store).is_empty(), eq(true));
    }

    #[googletest::test]
    fn reports_keys_missing_per_language() {
        let store: ContentStore = [
            ("pt", table(&["hotel_name", "welcome", "wifi_password"])),
            ("en", table(&["hotel_name"])),
            ("es", table(&["hotel_name", "welcome"])),
        ]
        .into_iter()
        .collect();

        let missing = find_missing_keys(&store);

        let pairs: Vec<(&str, &str)> =
            missing.iter().map(|m| (m.language.as_str(), m.key.as_str())).collect();
        assert_eq!(
            pairs,
            [("en", "welcome"), ("en", "wifi_password"), ("es", "wifi_password")]
        );
        expect_that!(missing.len(), eq(3));
    }
}
