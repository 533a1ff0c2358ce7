//! Translation resolver with language fallback.

use super::dictionary::Dictionary;
use crate::error::{AmigoError, Result};
use crate::language::Language;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Source of per-language dictionaries (embedded files, a locales
/// directory, a remote bundle).
#[async_trait]
pub trait DictionarySource: Send + Sync {
    /// Fetches the dictionary for `language`. `Ok(None)` means the language
    /// has no dictionary.
    async fn load(&self, language: Language) -> Result<Option<Dictionary>>;
}

/// Resolves dotted keys against the active language.
///
/// Lookups never fail: a miss in the active language retries the default
/// language, then falls back to the caller's fallback text, then to the key
/// itself. Languages whose dictionary has not been loaded yet behave like a
/// miss.
pub struct TranslationResolver {
    default_language: Language,
    active: RwLock<Language>,
    dictionaries: RwLock<HashMap<Language, Arc<Dictionary>>>,
}

impl TranslationResolver {
    pub fn new(default_language: Language) -> Self {
        Self {
            default_language,
            active: RwLock::new(default_language),
            dictionaries: RwLock::new(HashMap::new()),
        }
    }

    pub fn default_language(&self) -> Language {
        self.default_language
    }

    pub fn active_language(&self) -> Language {
        *self.active.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Switches the active language. Takes effect on the next lookup.
    pub fn set_language(&self, language: Language) {
        *self.active.write().unwrap_or_else(PoisonError::into_inner) = language;
    }

    /// Installs (or replaces) the dictionary for `language`.
    pub fn install(&self, language: Language, dictionary: Dictionary) {
        self.dictionaries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(language, Arc::new(dictionary));
    }

    pub fn is_loaded(&self, language: Language) -> bool {
        self.dictionaries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&language)
    }

    /// Drops every loaded dictionary.
    pub fn clear(&self) {
        self.dictionaries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Loads the dictionary for `language` from `source` unless it is
    /// already present. Failures are logged and leave the language unloaded.
    pub async fn ensure_loaded(&self, language: Language, source: &dyn DictionarySource) {
        if self.is_loaded(language) {
            return;
        }
        match source.load(language).await {
            Ok(Some(dictionary)) => {
                tracing::debug!(language = %language, "Loaded translation dictionary");
                self.install(language, dictionary);
            }
            Ok(None) => {
                tracing::debug!(language = %language, "No dictionary for language");
            }
            Err(e) => {
                tracing::warn!(language = %language, error = %e, "Failed to load dictionary");
            }
        }
    }

    /// Makes `language` active and loads it together with the default
    /// language.
    pub async fn activate(&self, language: Language, source: &dyn DictionarySource) {
        self.set_language(language);
        self.ensure_loaded(language, source).await;
        if language != self.default_language {
            self.ensure_loaded(self.default_language, source).await;
        }
    }

    /// Resolves `key`, returning `fallback` or the key itself on a miss.
    pub fn resolve(&self, key: &str, fallback: Option<&str>) -> String {
        match self.try_resolve(key) {
            Ok(text) => text,
            Err(_) => fallback.unwrap_or(key).to_string(),
        }
    }

    /// Shorthand for [`resolve`](Self::resolve) without a fallback.
    pub fn t(&self, key: &str) -> String {
        self.resolve(key, None)
    }

    /// Resolves `key`, reporting a miss as [`AmigoError::TranslationMissing`].
    pub fn try_resolve(&self, key: &str) -> Result<String> {
        let dictionaries = self.dictionaries.read().unwrap_or_else(PoisonError::into_inner);
        self.search_order()
            .into_iter()
            .filter_map(|language| dictionaries.get(&language))
            .find_map(|dictionary| dictionary.lookup(key).text().map(str::to_string))
            .ok_or_else(|| AmigoError::TranslationMissing(key.to_string()))
    }

    /// Resolves a list-valued key (e.g. reflection prompts). Empty on a miss.
    pub fn resolve_list(&self, key: &str) -> Vec<String> {
        let dictionaries = self.dictionaries.read().unwrap_or_else(PoisonError::into_inner);
        self.search_order()
            .into_iter()
            .filter_map(|language| dictionaries.get(&language))
            .find_map(|dictionary| dictionary.lookup(key).list().map(<[String]>::to_vec))
            .unwrap_or_default()
    }

    fn search_order(&self) -> Vec<Language> {
        let active = self.active_language();
        if active == self.default_language {
            vec![active]
        } else {
            vec![active, self.default_language]
        }
    }
}

impl Default for TranslationResolver {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn en() -> Dictionary {
        Dictionary::from_json(
            r#"{ "home": { "decoder": "Decoder", "practice": "Practice" },
                 "journal": { "prompts": ["Best part?"] } }"#,
        )
        .unwrap()
    }

    fn mk() -> Dictionary {
        Dictionary::from_json(r#"{ "home": { "decoder": "Декодер" } }"#).unwrap()
    }

    struct CountingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DictionarySource for CountingSource {
        async fn load(&self, language: Language) -> Result<Option<Dictionary>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match language {
                Language::En => Ok(Some(en())),
                Language::Mk => Ok(Some(mk())),
                Language::Tr => Err(AmigoError::io("offline")),
            }
        }
    }

    #[test]
    fn test_missing_everywhere_returns_fallback() {
        let resolver = TranslationResolver::default();
        resolver.install(Language::En, en());
        assert_eq!(resolver.resolve("a.b.c", Some("F")), "F");
        assert_eq!(resolver.resolve("a.b.c", None), "a.b.c");
    }

    #[test]
    fn test_before_loading_behaves_like_miss() {
        let resolver = TranslationResolver::default();
        assert_eq!(resolver.resolve("home.decoder", Some("…")), "…");
        assert!(resolver.try_resolve("home.decoder").is_err());
    }

    #[test]
    fn test_active_then_default_language() {
        let resolver = TranslationResolver::default();
        resolver.install(Language::En, en());
        resolver.install(Language::Mk, mk());
        resolver.set_language(Language::Mk);
        assert_eq!(resolver.t("home.decoder"), "Декодер");
        assert_eq!(resolver.t("home.practice"), "Practice");
        assert_eq!(resolver.t("home.unknown"), "home.unknown");
    }

    #[test]
    fn test_language_switch_takes_effect_immediately() {
        let resolver = TranslationResolver::default();
        resolver.install(Language::En, en());
        resolver.install(Language::Mk, mk());
        assert_eq!(resolver.t("home.decoder"), "Decoder");
        resolver.set_language(Language::Mk);
        assert_eq!(resolver.t("home.decoder"), "Декодер");
    }

    #[test]
    fn test_resolve_list_falls_back() {
        let resolver = TranslationResolver::default();
        resolver.install(Language::En, en());
        resolver.install(Language::Mk, mk());
        resolver.set_language(Language::Mk);
        assert_eq!(resolver.resolve_list("journal.prompts"), vec!["Best part?"]);
        assert!(resolver.resolve_list("journal.nothing").is_empty());
    }

    #[tokio::test]
    async fn test_activate_loads_once() {
        let resolver = TranslationResolver::default();
        let source = CountingSource {
            calls: AtomicUsize::new(0),
        };
        resolver.activate(Language::Mk, &source).await;
        resolver.activate(Language::Mk, &source).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 2); // mk + en
        assert_eq!(resolver.t("home.practice"), "Practice");
    }

    #[tokio::test]
    async fn test_failed_load_is_not_fatal() {
        let resolver = TranslationResolver::default();
        let source = CountingSource {
            calls: AtomicUsize::new(0),
        };
        resolver.activate(Language::Tr, &source).await;
        assert!(!resolver.is_loaded(Language::Tr));
        assert_eq!(resolver.t("home.decoder"), "Decoder");
    }
}
