//! Application configuration.
//!
//! Every field has a default so a missing or partial `config.toml` still
//! produces a usable configuration.

use crate::language::Language;
use serde::{Deserialize, Serialize};

/// Root of `config.toml`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AmigoConfig {
    pub general: GeneralSettings,
    pub engine: EngineSettings,
    pub rewards: RewardSettings,
    pub generation: GenerationSettings,
}

impl AmigoConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> crate::error::Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(toml::from_str(content)?)
    }

    /// Serializes the configuration back to TOML.
    pub fn to_toml_string(&self) -> crate::error::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Language used when the active language has no translation.
    pub default_language: Language,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            default_language: Language::En,
        }
    }
}

/// Conversation engine policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Number of answered user turns that completes a session.
    pub completion_threshold: u32,
    /// When false, a failed opening request aborts the session instead of
    /// starting it with a scripted line.
    pub allow_degraded_start: bool,
    /// Points credited when a practice roleplay completes.
    pub practice_reward: u32,
    /// Points credited when a decoder exchange completes.
    pub decoder_reward: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            completion_threshold: 3,
            allow_degraded_start: true,
            practice_reward: 20,
            decoder_reward: 10,
        }
    }
}

/// Points awarded by the non-conversational activities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardSettings {
    pub activity_points: u32,
    pub mission_points: u32,
}

impl Default for RewardSettings {
    fn default() -> Self {
        Self {
            activity_points: 10,
            mission_points: 15,
        }
    }
}

/// Settings for the hosted generation model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            temperature: 0.8,
            timeout_secs: 30,
            api_key_env: "GEMINI_API_KEY".to_string(),
        }
    }
}
