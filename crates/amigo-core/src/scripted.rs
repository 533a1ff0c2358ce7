//! Canned content used whenever the generation client cannot answer.

use crate::language::Language;

/// Opening line for a roleplay that could not be generated.
pub fn opening_line(language: Language, user_name: &str) -> String {
    match language {
        Language::Mk => format!("Еј {user_name}, што правиш?"),
        Language::Tr => format!("Selam {user_name}, naber?"),
        Language::En => format!("Hey {user_name}, what's up?"),
    }
}

/// Opening line for a decoder session that could not be generated.
pub fn decoder_opening(language: Language) -> &'static str {
    match language {
        Language::Mk => "Раскажи ми повеќе. Што се случи?",
        Language::Tr => "Bana biraz daha anlat. Ne oldu?",
        Language::En => "Tell me a bit more. What happened?",
    }
}

/// Apologetic AI line appended when a turn request fails.
pub fn filler_line(language: Language) -> &'static str {
    match language {
        Language::Mk => "Извини, се загубив за момент. Можеш ли да го кажеш тоа повторно?",
        Language::Tr => "Pardon, bir anlığına kayboldum. Tekrar söyler misin?",
        Language::En => "Sorry, I lost my train of thought. Could you say that again?",
    }
}

pub fn mission(language: Language) -> &'static str {
    match language {
        Language::Mk => "Насмевни се на некого денес!",
        Language::Tr => "Bugün birine gülümse!",
        Language::En => "Give someone a high-five today!",
    }
}

pub fn calm_thought(language: Language) -> &'static str {
    match language {
        Language::Mk => "Фокусирај се на сегашниот момент.",
        Language::Tr => "Şu ana odaklan.",
        Language::En => "Focus on the present moment.",
    }
}

pub fn mood_reply(language: Language) -> &'static str {
    match language {
        Language::Mk => "Ти благодарам што ги сподели твоите чувства. Секое чувство е во ред.",
        Language::Tr => "Duygularını paylaştığın için teşekkürler. Her duygu normaldir.",
        Language::En => "Thanks for sharing how you feel. Every feeling is okay.",
    }
}

/// Journal prompt used when no localized prompt list is loaded.
pub fn reflection_prompt(language: Language) -> &'static str {
    match language {
        Language::Mk => "Кој беше најдобриот дел од твојот ден?",
        Language::Tr => "Bugünün en güzel anı neydi?",
        Language::En => "What was the best part of your day?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_opening_line_uses_name() {
        assert_eq!(opening_line(Language::En, "Ana"), "Hey Ana, what's up?");
        assert_eq!(opening_line(Language::Mk, "Ана"), "Еј Ана, што правиш?");
    }

    #[test]
    fn test_every_language_has_content() {
        for language in Language::iter() {
            assert!(!filler_line(language).is_empty());
            assert!(!mission(language).is_empty());
            assert!(!calm_thought(language).is_empty());
            assert!(!mood_reply(language).is_empty());
            assert!(!decoder_opening(language).is_empty());
            assert!(!reflection_prompt(language).is_empty());
        }
    }
}
