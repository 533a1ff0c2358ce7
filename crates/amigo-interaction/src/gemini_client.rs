//! Generation client backed by the Gemini REST API.

use amigo_core::config::GenerationSettings;
use amigo_core::error::{AmigoError, Result};
use amigo_core::session::{GenerationClient, GenerationRequest, GenerationResponse, Turn, TurnRole};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, header::HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Calls `models/{model}:generateContent` for every request.
#[derive(Clone)]
pub struct GeminiGenerationClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiGenerationClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Builds a client from config, reading the API key from the environment
    /// variable named in `settings.api_key_env`.
    pub fn from_settings(settings: &GenerationSettings) -> Result<Self> {
        let api_key = std::env::var(&settings.api_key_env).map_err(|_| {
            AmigoError::config(format!(
                "environment variable {} is not set",
                settings.api_key_env
            ))
        })?;
        Self::new(api_key, settings.model.clone())
            .with_timeout(Duration::from_secs(settings.timeout_secs))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AmigoError::config(format!("failed to build HTTP client: {e}")))?;
        Ok(self)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send_request(&self, body: &GenerateContentRequest) -> Result<String> {
        let url = format!("{}/{}:generateContent", self.base_url, self.model);

        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let retry_after = parse_retry_after(response.headers().get("retry-after"));
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, &body_text, retry_after));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| AmigoError::generation(format!("Failed to parse Gemini response: {err}")))?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl GenerationClient for GeminiGenerationClient {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse> {
        debug!(
            model = %self.model,
            prior_turns = request.prior_turns.len(),
            structured = request.response_schema.is_some(),
            "Sending Gemini request"
        );
        let body = build_request(request);
        let text = self.send_request(&body).await?;
        Ok(GenerationResponse::new(text))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&'static str>, text: String) -> Self {
        Self {
            role,
            parts: vec![Part { text }],
        }
    }
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

fn role_of(turn: &Turn) -> &'static str {
    match turn.role {
        TurnRole::User => "user",
        TurnRole::Ai => "model",
    }
}

fn build_request(request: GenerationRequest) -> GenerateContentRequest {
    let mut contents: Vec<Content> = request
        .prior_turns
        .iter()
        .map(|turn| Content::text(Some(role_of(turn)), turn.text.clone()))
        .collect();
    contents.push(Content::text(Some("user"), request.new_message));

    let system_instruction = Some(request.system_instruction)
        .filter(|text| !text.trim().is_empty())
        .map(|text| Content::text(None, text));

    let generation_config = if request.temperature.is_some() || request.response_schema.is_some() {
        Some(GenerationConfig {
            temperature: request.temperature,
            response_mime_type: request.response_schema.as_ref().map(|_| "application/json"),
            response_schema: request.response_schema,
        })
    } else {
        None
    };

    GenerateContentRequest {
        contents,
        system_instruction,
        generation_config,
    }
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// Maps a transport failure without its request URL.
fn transport_error(err: reqwest::Error) -> AmigoError {
    let kind = if err.is_timeout() { "timed out" } else { "failed" };
    let err = err.without_url();
    AmigoError::generation(format!("Gemini API request {kind}: {err}"))
}

fn extract_text_response(response: GenerateContentResponse) -> Result<String> {
    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| AmigoError::generation("Gemini API returned no text in the response candidates"))
}

fn map_http_error(status: StatusCode, body: &str, retry_after: Option<Duration>) -> AmigoError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.to_string());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.to_string());

    let mut text = format!("Gemini API returned {}: {message}", status.as_u16());
    if let Some(delay) = retry_after {
        text.push_str(&format!(" (retry after {}s)", delay.as_secs()));
    }
    AmigoError::generation(text)
}

fn parse_retry_after(header: Option<&HeaderValue>) -> Option<Duration> {
    let value = header?.to_str().ok()?;
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}
