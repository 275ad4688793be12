//! Content Localizer
//!
//! Owns the current language and the loaded [`ContentStore`], and projects
//! the selected [`ContentTable`] onto every Display Binding of the page.

use std::sync::LazyLock;

use crate::content::{
    ContentStore,
    ContentTable,
    ContentValue,
};
use crate::display::{
    ACTIVE_CLASS,
    DisplayTree,
    Role,
};
use crate::preference::PreferenceStore;

/// Language used when the requested one is not in the store.
pub const DEFAULT_LANGUAGE: &str = "pt";

/// Slot name of the persisted language preference.
pub const PREFERENCE_KEY: &str = "hotelMaerkliLang";

/// Locale tag declared on the document when nothing else matches.
const DEFAULT_LOCALE_TAG: &str = "pt-BR";

/// Returned when neither the current nor the default language is loaded.
static EMPTY_TABLE: LazyLock<ContentTable> = LazyLock::new(ContentTable::new);

/// Locale tag for the document language attribute.
#[must_use]
pub fn locale_tag(language: &str) -> &'static str {
    match language {
        "pt" => "pt-BR",
        "en" => "en-US",
        "es" => "es-ES",
        _ => DEFAULT_LOCALE_TAG,
    }
}

/// `requested` if the store has it, else `pt`, else the store's first language.
fn supported_default(store: &ContentStore, requested: &str) -> String {
    let language = if store.supports(requested) {
        requested
    } else if store.supports(DEFAULT_LANGUAGE) {
        DEFAULT_LANGUAGE
    } else {
        store.languages().next().unwrap_or(requested)
    };
    if language != requested {
        tracing::warn!("Default language {requested} not in content, using {language}");
    }
    language.to_string()
}

/// Current language plus the translations it is rendered from.
///
/// The default language is always one the store supports (when the store
/// has any language at all), so every switch ends on rendered content.
#[derive(Debug)]
pub struct Localizer<P> {
    /// Loaded translations, immutable after startup.
    store: ContentStore,
    /// Language last applied to the page.
    current_language: String,
    /// Fallback for unsupported codes.
    default_language: String,
    /// Slot the applied language is written to.
    preference_key: String,
    /// Where the applied language is persisted.
    preferences: P,
}

impl<P: PreferenceStore> Localizer<P> {
    /// Create a localizer positioned on the default language.
    ///
    /// Nothing is rendered until [`Self::apply_language`] is called.
    pub fn new(store: ContentStore, preferences: P) -> Self {
        let default_language = supported_default(&store, DEFAULT_LANGUAGE);
        Self {
            store,
            current_language: default_language.clone(),
            default_language,
            preference_key: PREFERENCE_KEY.to_string(),
            preferences,
        }
    }

    /// Use `language` as the default, if the store supports it.
    #[must_use]
    pub fn with_default_language(mut self, language: &str) -> Self {
        self.default_language = supported_default(&self.store, language);
        self.current_language.clone_from(&self.default_language);
        self
    }

    #[must_use]
    pub fn with_preference_key(mut self, key: &str) -> Self {
        key.clone_into(&mut self.preference_key);
        self
    }

    /// Switch the page to `code` and re-render every binding.
    ///
    /// Unsupported codes fall back to the default language. Returns the
    /// language actually applied.
    pub fn apply_language<T>(&mut self, tree: &mut T, code: &str) -> &str
    where
        T: DisplayTree + ?Sized,
    {
        let language = if self.store.supports(code) {
            code
        } else {
            tracing::warn!("Language {code} not found, using {}", self.default_language);
            self.default_language.as_str()
        }
        .to_string();

        self.current_language.clone_from(&language);
        let content = self.current_content();

        for binding in tree.find_by_content_key() {
            match content.get(&binding.key) {
                None => {}
                Some(ContentValue::List(items)) => tree.replace_with_items(binding.element, items),
                Some(ContentValue::Text(text)) => tree.set_text(binding.element, text),
            }
        }

        for button in tree.find_by_role(Role::LanguageSelector) {
            tree.remove_class(button, ACTIVE_CLASS);
            if tree.data(button, "lang").as_deref() == Some(language.as_str()) {
                tree.add_class(button, ACTIVE_CLASS);
            }
        }

        tree.set_document_language(locale_tag(&language));

        if let Err(error) = self.preferences.set(&self.preference_key, &language) {
            tracing::error!("Failed to save language preference: {error}");
        }

        tracing::debug!(language = %language, "Language applied");
        &self.current_language
    }

    /// Content Table of the current language, or of the default language if
    /// the current one is somehow missing.
    #[must_use]
    pub fn current_content(&self) -> &ContentTable {
        self.store
            .table(&self.current_language)
            .or_else(|| self.store.table(&self.default_language))
            .unwrap_or(&EMPTY_TABLE)
    }

    #[must_use]
    pub fn current_language(&self) -> &str {
        &self.current_language
    }

    /// Language unsupported codes fall back to.
    #[must_use]
    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    #[must_use]
    pub const fn preferences(&self) -> &P {
        &self.preferences
    }
}
