//! Chill zone calming thoughts.

use crate::context::{ContentSource, ServiceContext};
use crate::prompts;
use amigo_core::error::Result;
use amigo_core::scripted;
use amigo_core::session::GenerationRequest;

const CALM_TEMPERATURE: f32 = 0.7;

pub struct CalmService {
    ctx: ServiceContext,
}

impl CalmService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// One short calming sentence for the user's age band.
    pub async fn calm_thought(&self) -> Result<(String, ContentSource)> {
        let language = self.ctx.language();
        let age_group = self.ctx.profile().age_group().map(|group| group.label());
        let request = GenerationRequest::new("", prompts::calm_thought(age_group, language)?)
            .with_temperature(CALM_TEMPERATURE);
        Ok(self
            .ctx
            .generate_or(request, scripted::calm_thought(language), "calm_thought")
            .await)
    }
}
