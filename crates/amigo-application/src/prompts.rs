//! One-shot prompts for missions, calm thoughts, mood replies and the
//! structured decoder request.

use amigo_core::Language;
use amigo_core::error::{AmigoError, Result};
use amigo_core::journal::Mood;
use minijinja::{Environment, Value, context};
use serde_json::json;

pub const MISSION_THEMES: &[&str] = &[
    "greeting someone",
    "eye contact",
    "helping",
    "sharing a smile",
    "joining a group",
    "giving a compliment",
];

const MISSION_TEMPLATE: &str = "Generate ONE small, safe and positive social mission \
{% if age %}for a {{ age }}-year-old {% endif %}about {{ theme }}. \
Example: \"Say hi to someone new today\" or \"Hold the door for a classmate\". \
Keep it to 1 short sentence. Reply only in {{ language }}.";

const CALM_TEMPLATE: &str = "One minimalist calming sentence\
{% if age_group %} for a {{ age_group }} year old{% endif %} in {{ language }}. No fluff.";

const MOOD_TEMPLATE: &str = "You are Buddy, a supportive friend\
{% if age %} for a {{ age }}-year-old{% endif %}. \
User feels: {{ moods | join(\", \") }}.\
{% if note %} Note: \"{{ note }}\".{% endif %} \
Respond in {{ language }}. Max 2 sentences.";

const DECODER_SYSTEM_TEMPLATE: &str =
    "You are Amigo. Help decode a social situation for a young person. Reply in {{ language }}.";

const DECODER_MESSAGE_TEMPLATE: &str = "Analyze for {{ user_name }}: \"{{ description }}\"";

pub fn mission(theme: &str, age: Option<u32>, language: Language) -> Result<String> {
    render(
        MISSION_TEMPLATE,
        context! { theme, age, language => language.english_name() },
    )
}

pub fn calm_thought(age_group: Option<&str>, language: Language) -> Result<String> {
    render(
        CALM_TEMPLATE,
        context! { age_group, language => language.english_name() },
    )
}

pub fn mood_reply(moods: &[Mood], note: &str, age: Option<u32>, language: Language) -> Result<String> {
    let moods: Vec<String> = moods.iter().map(ToString::to_string).collect();
    let note = Some(note.trim()).filter(|n| !n.is_empty());
    render(
        MOOD_TEMPLATE,
        context! { moods, note, age, language => language.english_name() },
    )
}

pub fn decoder_system(language: Language) -> Result<String> {
    render(
        DECODER_SYSTEM_TEMPLATE,
        context! { language => language.english_name() },
    )
}

pub fn decoder_message(user_name: &str, description: &str) -> Result<String> {
    render(DECODER_MESSAGE_TEMPLATE, context! { user_name, description })
}

/// Response schema of a structured decoder request.
pub fn decoder_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "insights": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "label": { "type": "STRING" },
                        "text": { "type": "STRING" },
                        "icon": { "type": "STRING" }
                    },
                    "required": ["label", "text", "icon"]
                }
            },
            "victory": { "type": "STRING" }
        },
        "required": ["insights", "victory"]
    })
}

fn render(template: &str, ctx: Value) -> Result<String> {
    Environment::new()
        .render_str(template, ctx)
        .map_err(|e| AmigoError::internal(format!("prompt template failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mission_prompt() {
        let text = mission("eye contact", Some(11), Language::Mk).unwrap();
        assert!(text.contains("for a 11-year-old about eye contact."));
        assert!(text.ends_with("Reply only in Macedonian."));

        let no_age = mission("helping", None, Language::En).unwrap();
        assert!(no_age.contains("mission about helping."));
    }

    #[test]
    fn test_calm_prompt() {
        assert_eq!(
            calm_thought(Some("7-9"), Language::En).unwrap(),
            "One minimalist calming sentence for a 7-9 year old in English. No fluff."
        );
        assert_eq!(
            calm_thought(None, Language::Mk).unwrap(),
            "One minimalist calming sentence in Macedonian. No fluff."
        );
    }

    #[test]
    fn test_mood_prompt_lists_moods_and_note() {
        let text = mood_reply(&[Mood::Happy, Mood::Tired], " long day ", Some(12), Language::En).unwrap();
        assert!(text.contains("for a 12-year-old."));
        assert!(text.contains("User feels: Happy, Tired."));
        assert!(text.contains("Note: \"long day\"."));

        let without_note = mood_reply(&[Mood::Sad], "  ", None, Language::En).unwrap();
        assert!(!without_note.contains("Note:"));
    }

    #[test]
    fn test_decoder_prompts() {
        assert!(decoder_system(Language::Mk).unwrap().ends_with("Reply in Macedonian."));
        assert_eq!(
            decoder_message("Ana", "Nobody sat with me").unwrap(),
            "Analyze for Ana: \"Nobody sat with me\""
        );
        assert_eq!(decoder_schema()["required"][1], "victory");
    }
}
