//! One-shot social decoder.

use crate::context::ServiceContext;
use crate::prompts;
use amigo_core::error::{AmigoError, Result};
use amigo_core::i18n::TranslationResolver;
use amigo_core::journal::ReflectionEntry;
use amigo_core::ledger::{RewardCategory, RewardSink};
use amigo_core::session::GenerationRequest;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

const RETRY_KEY: &str = "decoder.retry";
const RETRY_FALLBACK: &str = "Please try again in a moment.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub label: String,
    pub text: String,
    pub icon: String,
}

/// Structured reading of a social situation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoding {
    pub insights: Vec<Insight>,
    /// Something the user did well, saved to the journal.
    pub victory: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOutcome {
    Decoded { decoding: Decoding, points: u32 },
    /// Nothing was credited or saved; show `retry_message`.
    Failed {
        error: AmigoError,
        retry_message: String,
    },
}

pub struct DecoderService {
    ctx: ServiceContext,
    resolver: Arc<TranslationResolver>,
    reward: u32,
}

impl DecoderService {
    pub fn new(ctx: ServiceContext, resolver: Arc<TranslationResolver>, reward: u32) -> Self {
        Self {
            ctx,
            resolver,
            reward,
        }
    }

    pub async fn decode_situation(&self, description: &str) -> Result<DecodeOutcome> {
        let description = description.trim();
        if description.is_empty() {
            return Err(AmigoError::invalid_input("describe what happened first"));
        }

        let language = self.ctx.language();
        let profile = self.ctx.profile();
        let request = GenerationRequest::new(
            prompts::decoder_system(language)?,
            prompts::decoder_message(profile.display_name(), description)?,
        )
        .with_schema(prompts::decoder_schema());

        let decoded = self
            .ctx
            .client
            .generate(request)
            .await
            .and_then(|response| response.parse_json::<Decoding>())
            .and_then(|decoding| {
                if decoding.victory.trim().is_empty() {
                    Err(AmigoError::generation("decoder response has no victory"))
                } else {
                    Ok(decoding)
                }
            });

        match decoded {
            Ok(decoding) => {
                self.ctx.store.credit(RewardCategory::Decoder, self.reward)?;
                self.ctx.store.append_reflection(ReflectionEntry::new(
                    description,
                    decoding.victory.trim(),
                    "social",
                ))?;
                info!(insights = decoding.insights.len(), "Situation decoded");
                Ok(DecodeOutcome::Decoded {
                    decoding,
                    points: self.reward,
                })
            }
            Err(e) => {
                let error = if e.is_generation_failure() {
                    e
                } else {
                    AmigoError::generation(e.to_string())
                };
                warn!(error = %error, "Decoder request failed");
                Ok(DecodeOutcome::Failed {
                    error,
                    retry_message: self.resolver.resolve(RETRY_KEY, Some(RETRY_FALLBACK)),
                })
            }
        }
    }
}
