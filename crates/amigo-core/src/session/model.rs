//! Conversation session domain model.

use crate::journal::ReflectionEntry;
use crate::language::Language;
use crate::ledger::RewardCategory;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of one conversation session.
///
/// Responses are matched against the active session by this id; a response
/// carrying any other id belongs to an abandoned session and is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// What kind of exchange a scenario drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioKind {
    /// The model plays the other person in a social situation.
    Roleplay,
    /// The model helps the user read a situation they describe.
    Decoder,
}

impl ScenarioKind {
    pub fn reward_category(&self) -> RewardCategory {
        match self {
            ScenarioKind::Roleplay => RewardCategory::Practice,
            ScenarioKind::Decoder => RewardCategory::Decoder,
        }
    }
}

/// A situation the user can practice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub title: String,
    /// Description handed to the model.
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub kind: ScenarioKind,
}

impl Scenario {
    pub fn roleplay(id: impl Into<String>, title: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            prompt: prompt.into(),
            category: None,
            icon: None,
            kind: ScenarioKind::Roleplay,
        }
    }

    pub fn decoder(description: impl Into<String>) -> Self {
        Self {
            id: "decoder".to_string(),
            title: "Social Decoder".to_string(),
            prompt: description.into(),
            category: None,
            icon: None,
            kind: ScenarioKind::Decoder,
        }
    }
}

/// Author of a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    Ai,
    User,
}

/// One transcript line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub text: String,
}

impl Turn {
    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Ai,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
        }
    }
}

/// States of the conversation state machine.
///
/// ```text
/// Idle -> AwaitingOpening -> ActiveTurn <-> ActiveTurn -> SafetyHold | Completed -> Idle
///              |
///              +-> Aborted -> Idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    Idle,
    AwaitingOpening,
    ActiveTurn,
    SafetyHold,
    Completed,
    Aborted,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionState::Idle => "Idle",
            SessionState::AwaitingOpening => "AwaitingOpening",
            SessionState::ActiveTurn => "ActiveTurn",
            SessionState::SafetyHold => "SafetyHold",
            SessionState::Completed => "Completed",
            SessionState::Aborted => "Aborted",
        };
        f.write_str(label)
    }
}

/// A transient roleplay or decoding exchange. Never persisted as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationSession {
    pub id: SessionId,
    pub scenario: Scenario,
    pub language: Language,
    pub transcript: Vec<Turn>,
    pub state: SessionState,
    /// Number of user turns the model answered.
    pub turn_count: u32,
    pub started_at: DateTime<Utc>,
    rewarded: bool,
}

impl ConversationSession {
    pub fn new(scenario: Scenario, language: Language) -> Self {
        Self {
            id: SessionId::new(),
            scenario,
            language,
            transcript: Vec::new(),
            state: SessionState::AwaitingOpening,
            turn_count: 0,
            started_at: Utc::now(),
            rewarded: false,
        }
    }

    pub fn rewarded(&self) -> bool {
        self.rewarded
    }

    /// Sets the one-shot reward flag. Returns true only for the call that
    /// flipped it; the flag is never cleared.
    pub fn mark_rewarded(&mut self) -> bool {
        !std::mem::replace(&mut self.rewarded, true)
    }

    /// The last line spoken by the model, if any.
    pub fn last_ai_line(&self) -> Option<&str> {
        self.transcript
            .iter()
            .rev()
            .find(|turn| turn.role == TurnRole::Ai)
            .map(|turn| turn.text.as_str())
    }

    /// Converts the transcript into a journal reflection the caller can
    /// persist before ending the session.
    pub fn to_reflection(&self) -> ReflectionEntry {
        let text = self
            .transcript
            .iter()
            .map(|turn| match turn.role {
                TurnRole::Ai => format!("Amigo: {}", turn.text),
                TurnRole::User => format!("Me: {}", turn.text),
            })
            .collect::<Vec<_>>()
            .join("\n");
        ReflectionEntry::new(self.scenario.title.clone(), text, "social")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_rewarded_is_one_shot() {
        let mut session = ConversationSession::new(Scenario::decoder("x"), Language::En);
        assert!(!session.rewarded());
        assert!(session.mark_rewarded());
        assert!(!session.mark_rewarded());
        assert!(session.rewarded());
    }

    #[test]
    fn test_session_ids_are_unique() {
        assert_ne!(SessionId::new(), SessionId::new());
    }

    #[test]
    fn test_to_reflection() {
        let mut session =
            ConversationSession::new(Scenario::roleplay("lunch", "Lunch table", "Join a table"), Language::En);
        session.transcript.push(Turn::ai("Hey!"));
        session.transcript.push(Turn::user("Can I sit here?"));
        let reflection = session.to_reflection();
        assert_eq!(reflection.prompt, "Lunch table");
        assert_eq!(reflection.category, "social");
        assert_eq!(reflection.text, "Amigo: Hey!\nMe: Can I sit here?");
        assert_eq!(session.last_ai_line(), Some("Hey!"));
    }

    #[test]
    fn test_reward_category_by_kind() {
        assert_eq!(ScenarioKind::Roleplay.reward_category(), RewardCategory::Practice);
        assert_eq!(ScenarioKind::Decoder.reward_category(), RewardCategory::Decoder);
    }
}
