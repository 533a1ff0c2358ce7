//! Mood check-ins.

use crate::context::{ContentSource, ServiceContext};
use crate::prompts;
use amigo_core::error::{AmigoError, Result};
use amigo_core::journal::{Mood, MoodEntry};
use amigo_core::ledger::{RewardCategory, RewardSink};
use amigo_core::scripted;
use amigo_core::session::GenerationRequest;
use std::collections::BTreeSet;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodCheckIn {
    pub entry: MoodEntry,
    pub points: u32,
    pub reply: String,
    pub reply_source: ContentSource,
}

pub struct MoodService {
    ctx: ServiceContext,
    reward: u32,
}

impl MoodService {
    pub fn new(ctx: ServiceContext, reward: u32) -> Self {
        Self { ctx, reward }
    }

    /// Records a check-in, credits activity points and fetches a short
    /// supportive reply.
    pub async fn log_mood(
        &self,
        moods: impl IntoIterator<Item = Mood>,
        note: &str,
    ) -> Result<MoodCheckIn> {
        let moods: BTreeSet<Mood> = moods.into_iter().collect();
        if moods.is_empty() {
            return Err(AmigoError::invalid_input("select at least one mood"));
        }

        let entry = MoodEntry::new(moods.iter().copied(), note.trim());
        self.ctx.store.append_mood(entry.clone())?;
        self.ctx.store.credit(RewardCategory::Activity, self.reward)?;
        info!(moods = moods.len(), "Mood logged");

        let language = self.ctx.language();
        let tags: Vec<Mood> = moods.into_iter().collect();
        let prompt = prompts::mood_reply(&tags, note, self.ctx.profile().age(), language)?;
        let (reply, reply_source) = self
            .ctx
            .generate_or(GenerationRequest::new("", prompt), scripted::mood_reply(language), "mood_reply")
            .await;

        Ok(MoodCheckIn {
            entry,
            points: self.reward,
            reply,
            reply_source,
        })
    }
}
