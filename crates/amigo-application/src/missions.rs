//! Daily social missions.

use crate::context::{ContentSource, ServiceContext};
use crate::prompts::{self, MISSION_THEMES};
use amigo_core::error::{AmigoError, Result};
use amigo_core::ledger::{RewardCategory, RewardSink};
use amigo_core::scripted;
use amigo_core::session::GenerationRequest;
use amigo_core::tasks::DAILY_MISSION;
use rand::seq::SliceRandom;
use tracing::info;

const MISSION_TEMPERATURE: f32 = 1.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mission {
    pub text: String,
    pub source: ContentSource,
}

pub struct MissionService {
    ctx: ServiceContext,
    reward: u32,
}

impl MissionService {
    pub fn new(ctx: ServiceContext, reward: u32) -> Self {
        Self { ctx, reward }
    }

    /// The pending daily mission, generating a new one when none is pending
    /// or `force_refresh` is set. The result becomes the pending mission.
    pub async fn current_mission(&self, force_refresh: bool) -> Result<Mission> {
        if !force_refresh {
            if let Some(text) = self.ctx.store.active_tasks().get(DAILY_MISSION) {
                return Ok(Mission {
                    text: text.to_string(),
                    source: ContentSource::Stored,
                });
            }
        }

        let profile = self.ctx.profile();
        let language = self.ctx.language();
        let theme = MISSION_THEMES
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or("greeting someone");
        let request = GenerationRequest::new("", prompts::mission(theme, profile.age(), language)?)
            .with_temperature(MISSION_TEMPERATURE);

        let (text, source) = self
            .ctx
            .generate_or(request, scripted::mission(language), "mission")
            .await;
        self.ctx
            .store
            .set_active_task(DAILY_MISSION, Some(text.clone()))?;
        info!(theme, ?source, "New daily mission");
        Ok(Mission { text, source })
    }

    /// Credits the mission reward and clears the pending mission.
    pub fn complete_mission(&self) -> Result<u32> {
        if self.ctx.store.active_tasks().get(DAILY_MISSION).is_none() {
            return Err(AmigoError::invalid_state("complete_mission", "no pending mission"));
        }
        self.ctx.store.credit(RewardCategory::Mission, self.reward)?;
        self.ctx.store.set_active_task(DAILY_MISSION, None)?;
        info!(points = self.reward, "Daily mission completed");
        Ok(self.reward)
    }
}
