//! Generation client contract.

use super::model::Turn;
use crate::error::{AmigoError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A request to the hosted generative model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub system_instruction: String,
    /// Transcript so far, oldest first, not including `new_message`.
    pub prior_turns: Vec<Turn>,
    pub new_message: String,
    /// JSON schema the response must match, for structured requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl GenerationRequest {
    pub fn new(system_instruction: impl Into<String>, new_message: impl Into<String>) -> Self {
        Self {
            system_instruction: system_instruction.into(),
            prior_turns: Vec::new(),
            new_message: new_message.into(),
            response_schema: None,
            temperature: None,
        }
    }

    pub fn with_prior_turns(mut self, turns: Vec<Turn>) -> Self {
        self.prior_turns = turns;
        self
    }

    pub fn with_schema(mut self, schema: Value) -> Self {
        self.response_schema = Some(schema);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// The model's answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub text: String,
}

impl GenerationResponse {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Parses a structured response. Markdown code fences around the JSON
    /// are tolerated; anything else that does not match `T` is a
    /// [`AmigoError::GenerationRequestFailed`].
    pub fn parse_json<T: DeserializeOwned>(&self) -> Result<T> {
        let trimmed = self.text.trim();
        let body = trimmed
            .strip_prefix("```json")
            .or_else(|| trimmed.strip_prefix("```"))
            .and_then(|rest| rest.strip_suffix("```"))
            .unwrap_or(trimmed)
            .trim();
        serde_json::from_str(body)
            .map_err(|e| AmigoError::generation(format!("response did not match schema: {e}")))
    }
}

/// The external collaborator that talks to the hosted model.
///
/// Implementations report every failure (transport, timeout, empty or
/// invalid response) as [`AmigoError::GenerationRequestFailed`].
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse>;
}
