//! Dictionary sources: the bundled English and Macedonian dictionaries and
//! optional per-language JSON overrides on disk.

use amigo_core::Language;
use amigo_core::error::Result;
use amigo_core::i18n::{Dictionary, DictionarySource};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, warn};

const EN_DICTIONARY: &str = include_str!("../locales/en.json");
const MK_DICTIONARY: &str = include_str!("../locales/mk.json");

/// Dictionaries compiled into the binary. Turkish has none and resolves
/// through the default language.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedDictionarySource;

impl EmbeddedDictionarySource {
    fn raw(language: Language) -> Option<&'static str> {
        match language {
            Language::En => Some(EN_DICTIONARY),
            Language::Mk => Some(MK_DICTIONARY),
            Language::Tr => None,
        }
    }
}

#[async_trait]
impl DictionarySource for EmbeddedDictionarySource {
    async fn load(&self, language: Language) -> Result<Option<Dictionary>> {
        Self::raw(language).map(Dictionary::from_json).transpose()
    }
}

/// Bundled dictionaries overlaid with `<dir>/<code>.json` when present.
#[derive(Debug, Clone)]
pub struct LocalesDirSource {
    dir: PathBuf,
    embedded: EmbeddedDictionarySource,
}

impl LocalesDirSource {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            embedded: EmbeddedDictionarySource,
        }
    }

    async fn read_override(&self, language: Language) -> Option<Dictionary> {
        let path = self.dir.join(format!("{}.json", language.code()));
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read dictionary override");
                return None;
            }
        };
        match Dictionary::from_json(&content) {
            Ok(dictionary) => {
                debug!(path = %path.display(), "Loaded dictionary override");
                Some(dictionary)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring malformed dictionary override");
                None
            }
        }
    }
}

#[async_trait]
impl DictionarySource for LocalesDirSource {
    async fn load(&self, language: Language) -> Result<Option<Dictionary>> {
        let base = self.embedded.load(language).await?;
        let overlay = self.read_override(language).await;
        Ok(match (base, overlay) {
            (Some(mut base), Some(overlay)) => {
                base.merge(overlay);
                Some(base)
            }
            (base, overlay) => base.or(overlay),
        })
    }
}
