//! AI-moderated roleplay and decoding sessions.

pub mod engine;
pub mod generation;
pub mod model;
pub mod prompts;
pub mod safety;

pub use engine::{ConversationEngine, EngineOptions, StartOutcome, TurnOutcome};
pub use generation::{GenerationClient, GenerationRequest, GenerationResponse};
pub use model::{
    ConversationSession, Scenario, ScenarioKind, SessionId, SessionState, Turn, TurnRole,
};
pub use prompts::{PersonaConfig, PromptBuilder, SessionContext};
pub use safety::{SafetyMatch, SafetyScanner};
