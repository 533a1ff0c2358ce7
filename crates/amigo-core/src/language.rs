//! Supported interface languages and input-based language detection.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

static MK_LATIN_PHRASES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(zdravo|kako si|sto pravis|fala|blagodaram|dobro)")
        .expect("Macedonian phrase pattern is valid")
});

/// Languages the application can be displayed in.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    /// English, the process default.
    #[default]
    En,
    /// Macedonian.
    Mk,
    /// Turkish.
    Tr,
}

impl Language {
    /// ISO 639-1 code used as the storage value and dictionary name.
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Mk => "mk",
            Language::Tr => "tr",
        }
    }

    /// English name of the language, used when instructing the model.
    pub fn english_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Mk => "Macedonian",
            Language::Tr => "Turkish",
        }
    }
}

/// Guesses the language of free-form user input.
///
/// Cyrillic script or a handful of common Latin-script Macedonian phrases
/// select Macedonian. Everything else is treated as English.
pub fn detect_language(input: &str) -> Language {
    let has_cyrillic = input.chars().any(|c| ('\u{0400}'..='\u{04FF}').contains(&c));
    if has_cyrillic || MK_LATIN_PHRASES.is_match(input) {
        Language::Mk
    } else {
        Language::En
    }
}
