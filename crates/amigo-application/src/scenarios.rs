//! Built-in practice room scenarios.

use amigo_core::Language;
use amigo_core::session::{Scenario, ScenarioKind};

struct ScenarioText {
    id: &'static str,
    category: &'static str,
    icon: &'static str,
    en: (&'static str, &'static str),
    mk: (&'static str, &'static str),
}

const CATALOG: &[ScenarioText] = &[
    ScenarioText {
        id: "lunch-table",
        category: "school",
        icon: "🍎",
        en: (
            "Joining a lunch table",
            "You want to sit with a group of classmates at lunch who are already talking.",
        ),
        mk: (
            "Приклучување на маса за ручек",
            "Сакаш да седнеш со група соученици на ручек кои веќе разговараат.",
        ),
    },
    ScenarioText {
        id: "new-classmate",
        category: "school",
        icon: "👋",
        en: (
            "Meeting a new classmate",
            "A new student just joined your class and is sitting alone.",
        ),
        mk: (
            "Запознавање нов соученик",
            "Нов ученик штотуку дојде во твоето одделение и седи сам.",
        ),
    },
    ScenarioText {
        id: "join-game",
        category: "play",
        icon: "⚽",
        en: (
            "Asking to join a game",
            "Some kids are playing football in the park and you want to join.",
        ),
        mk: (
            "Барање да се приклучиш во игра",
            "Неколку деца играат фудбал во паркот и сакаш да се приклучиш.",
        ),
    },
    ScenarioText {
        id: "disagree-friend",
        category: "friends",
        icon: "🤝",
        en: (
            "Disagreeing with a friend",
            "Your friend wants to play a game you don't like and you want to suggest something else.",
        ),
        mk: (
            "Несогласување со пријател",
            "Твојот пријател сака да игра игра што не ти се допаѓа, а ти сакаш да предложиш нешто друго.",
        ),
    },
    ScenarioText {
        id: "ask-teacher",
        category: "school",
        icon: "✋",
        en: (
            "Asking the teacher for help",
            "You did not understand the homework and want to ask your teacher after class.",
        ),
        mk: (
            "Барање помош од наставник",
            "Не ја разбра домашната задача и сакаш да го прашаш наставникот по часот.",
        ),
    },
];

/// Practice scenarios with text in `language`. Languages without their own
/// text use English.
pub fn practice_scenarios(language: Language) -> Vec<Scenario> {
    CATALOG
        .iter()
        .map(|entry| {
            let (title, prompt) = match language {
                Language::Mk => entry.mk,
                Language::En | Language::Tr => entry.en,
            };
            Scenario {
                id: entry.id.to_string(),
                title: title.to_string(),
                prompt: prompt.to_string(),
                category: Some(entry.category.to_string()),
                icon: Some(entry.icon.to_string()),
                kind: ScenarioKind::Roleplay,
            }
        })
        .collect()
}

pub fn find_scenario(id: &str, language: Language) -> Option<Scenario> {
    practice_scenarios(language).into_iter().find(|s| s.id == id)
}
