//! System instructions and opening messages sent to the generation client.

use super::model::{Scenario, ScenarioKind};
use crate::error::{AmigoError, Result};
use crate::language::Language;
use crate::profile::AgeGroup;
use minijinja::{Environment, context};
use serde::{Deserialize, Serialize};

const ROLEPLAY_TEMPLATE: &str = "Roleplay: {{ scenario }}. \
The user is {{ user_name }}{% if age_group %}, age {{ age_group }}{% endif %}. \
Act as the other person in the situation. Max 2 sentences per reply. \
Use friendly, relatable language for their age. \
If the user mentions danger, self-harm, bullying or abuse, step out of the roleplay \
and kindly tell them to talk to a trusted adult. \
Reply only in {{ language }}.";

const DECODER_TEMPLATE: &str = "You are {{ persona }}, a calm helper for a young person \
{% if age_group %}aged {{ age_group }} {% endif %}named {{ user_name }}. \
They describe a social situation: {{ scenario }}. \
Ask short questions and help them notice what the other people might think or feel. \
Max 2 sentences per reply. \
If they mention danger, self-harm, bullying or abuse, tell them to talk to a trusted adult. \
Reply only in {{ language }}.";

const OPENING_TEMPLATE: &str = "Hi, I am {{ user_name }}. Start the conversation.";

/// Persona configuration shared by every session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaConfig {
    pub name: String,
    pub temperature: f32,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            name: "Amigo".to_string(),
            temperature: 0.8,
        }
    }
}

/// Who the session is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub user_name: String,
    pub language: Language,
    pub age_group: Option<AgeGroup>,
}

impl SessionContext {
    pub fn new(user_name: impl Into<String>, language: Language) -> Self {
        Self {
            user_name: user_name.into(),
            language,
            age_group: None,
        }
    }

    pub fn with_age_group(mut self, age_group: Option<AgeGroup>) -> Self {
        self.age_group = age_group;
        self
    }
}

/// Renders prompt text for a scenario.
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    persona: PersonaConfig,
}

impl PromptBuilder {
    pub fn new(persona: PersonaConfig) -> Self {
        Self { persona }
    }

    pub fn persona(&self) -> &PersonaConfig {
        &self.persona
    }

    pub fn system_instruction(&self, scenario: &Scenario, ctx: &SessionContext) -> Result<String> {
        let template = match scenario.kind {
            ScenarioKind::Roleplay => ROLEPLAY_TEMPLATE,
            ScenarioKind::Decoder => DECODER_TEMPLATE,
        };
        render(
            template,
            context! {
                persona => self.persona.name,
                scenario => scenario.prompt,
                user_name => ctx.user_name,
                age_group => ctx.age_group.map(|g| g.label()),
                language => ctx.language.english_name(),
            },
        )
    }

    pub fn opening_message(&self, ctx: &SessionContext) -> Result<String> {
        render(OPENING_TEMPLATE, context! { user_name => ctx.user_name })
    }
}

fn render(template: &str, ctx: minijinja::Value) -> Result<String> {
    Environment::new()
        .render_str(template, ctx)
        .map_err(|e| AmigoError::internal(format!("prompt template failed: {e}")))
}
