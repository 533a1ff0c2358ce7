//! Detection of replies where the model stepped out to point the user at a
//! trusted adult.

use crate::language::Language;
use std::collections::HashMap;

const EN_MARKERS: &[&str] = &[
    "trusted adult",
    "adult you trust",
    "talk to a parent",
    "talk to your parents",
    "talk to a teacher",
    "school counselor",
    "helpline",
    "emergency services",
];

const MK_MARKERS: &[&str] = &[
    "возрасен на кој му веруваш",
    "доверлив возрасен",
    "разговарај со родител",
    "разговарај со наставник",
    "училишен психолог",
    "линија за помош",
];

const TR_MARKERS: &[&str] = &[
    "güvendiğin bir yetişkin",
    "ailenle konuş",
    "öğretmeninle konuş",
    "okul psikolojik danışmanı",
    "yardım hattı",
];

/// A marker found in a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetyMatch {
    pub language: Language,
    pub marker: String,
}

/// Fixed, per-language list of escalation phrases.
///
/// A reply is checked against the markers of its session language and the
/// English markers, since the model sometimes falls back to English when it
/// breaks character.
#[derive(Debug, Clone)]
pub struct SafetyScanner {
    markers: HashMap<Language, Vec<String>>,
}

impl SafetyScanner {
    pub fn new() -> Self {
        let mut markers = HashMap::new();
        markers.insert(Language::En, lowercase_all(EN_MARKERS));
        markers.insert(Language::Mk, lowercase_all(MK_MARKERS));
        markers.insert(Language::Tr, lowercase_all(TR_MARKERS));
        Self { markers }
    }

    /// Adds a marker for `language`. Matching is case-insensitive.
    pub fn with_marker(mut self, language: Language, marker: &str) -> Self {
        self.markers
            .entry(language)
            .or_default()
            .push(marker.to_lowercase());
        self
    }

    pub fn scan(&self, language: Language, reply: &str) -> Option<SafetyMatch> {
        let haystack = reply.to_lowercase();
        let mut languages = vec![language];
        if language != Language::En {
            languages.push(Language::En);
        }
        languages.into_iter().find_map(|lang| {
            self.markers.get(&lang).and_then(|markers| {
                markers
                    .iter()
                    .find(|marker| haystack.contains(marker.as_str()))
                    .map(|marker| SafetyMatch {
                        language: lang,
                        marker: marker.clone(),
                    })
            })
        })
    }

    pub fn is_escalation(&self, language: Language, reply: &str) -> bool {
        self.scan(language, reply).is_some()
    }
}

impl Default for SafetyScanner {
    fn default() -> Self {
        Self::new()
    }
}

fn lowercase_all(markers: &[&str]) -> Vec<String> {
    markers.iter().map(|m| m.to_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_marker_any_case() {
        let scanner = SafetyScanner::new();
        let found = scanner
            .scan(Language::En, "That sounds hard. Please talk to a Trusted Adult today.")
            .unwrap();
        assert_eq!(found.marker, "trusted adult");
    }

    #[test]
    fn test_macedonian_marker() {
        let scanner = SafetyScanner::new();
        assert!(scanner.is_escalation(Language::Mk, "Те молам, разговарај со родител или наставник."));
    }

    #[test]
    fn test_english_markers_apply_to_other_languages() {
        let scanner = SafetyScanner::new();
        let found = scanner.scan(Language::Mk, "Please call a helpline.").unwrap();
        assert_eq!(found.language, Language::En);
    }

    #[test]
    fn test_plain_roleplay_reply_passes() {
        let scanner = SafetyScanner::new();
        assert!(!scanner.is_escalation(Language::En, "Sure, you can sit with us!"));
        assert!(!scanner.is_escalation(Language::Mk, "Еј, што правиш?"));
    }

    #[test]
    fn test_custom_marker() {
        let scanner = SafetyScanner::new().with_marker(Language::En, "Stop The Game");
        assert!(scanner.is_escalation(Language::En, "ok, stop the game now"));
    }
}
