//! Collaborators shared by the use case services.

use amigo_core::Language;
use amigo_core::profile::Profile;
use amigo_core::session::{GenerationClient, GenerationRequest};
use amigo_core::store::ProfileStore;
use std::sync::Arc;
use tracing::warn;

/// Where a piece of generated content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSource {
    Generated,
    /// Canned content used because generation failed.
    Scripted,
    /// Previously generated content read back from the store.
    Stored,
}

#[derive(Clone)]
pub struct ServiceContext {
    pub store: Arc<ProfileStore>,
    pub client: Arc<dyn GenerationClient>,
    pub default_language: Language,
}

impl ServiceContext {
    pub fn new(
        store: Arc<ProfileStore>,
        client: Arc<dyn GenerationClient>,
        default_language: Language,
    ) -> Self {
        Self {
            store,
            client,
            default_language,
        }
    }

    pub fn profile(&self) -> Profile {
        self.store.profile()
    }

    /// Stored language, or the configured default before onboarding.
    pub fn language(&self) -> Language {
        self.profile().language.unwrap_or(self.default_language)
    }

    /// Generates text, substituting `fallback` on any failure.
    pub async fn generate_or(
        &self,
        request: GenerationRequest,
        fallback: &str,
        purpose: &'static str,
    ) -> (String, ContentSource) {
        match self.client.generate(request).await {
            Ok(response) if !response.text.trim().is_empty() => {
                (response.text.trim().to_string(), ContentSource::Generated)
            }
            Ok(_) => {
                warn!(purpose, "Empty generation response, using scripted content");
                (fallback.to_string(), ContentSource::Scripted)
            }
            Err(e) => {
                warn!(purpose, error = %e, "Generation failed, using scripted content");
                (fallback.to_string(), ContentSource::Scripted)
            }
        }
    }
}
