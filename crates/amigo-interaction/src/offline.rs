//! Generation client used when no model is configured.

use amigo_core::error::{AmigoError, Result};
use amigo_core::session::{GenerationClient, GenerationRequest, GenerationResponse};
use async_trait::async_trait;

/// Fails every request, so callers serve their scripted content.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineGenerationClient;

#[async_trait]
impl GenerationClient for OfflineGenerationClient {
    async fn generate(&self, _request: GenerationRequest) -> Result<GenerationResponse> {
        Err(AmigoError::generation("no generation model configured"))
    }
}
