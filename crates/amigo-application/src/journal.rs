//! Journal timeline, reflections and stories.

use amigo_core::error::{AmigoError, Result};
use amigo_core::i18n::TranslationResolver;
use amigo_core::journal::{
    JournalEntry, MoodShare, ReflectionEntry, StoryEntry, aggregate_moods, timeline,
};
use amigo_core::scripted;
use amigo_core::store::ProfileStore;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::sync::Arc;

const DEFAULT_CATEGORY: &str = "general";
const PROMPTS_KEY: &str = "journal.reflection_prompts";

/// Everything the journal screen renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalView {
    /// Newest first.
    pub entries: Vec<JournalEntry>,
    pub mood_chart: Vec<MoodShare>,
}

pub struct JournalService {
    store: Arc<ProfileStore>,
    resolver: Arc<TranslationResolver>,
}

impl JournalService {
    pub fn new(store: Arc<ProfileStore>, resolver: Arc<TranslationResolver>) -> Self {
        Self { store, resolver }
    }

    /// A random reflection prompt from the active dictionary, or the
    /// scripted prompt when the list is missing or empty.
    pub fn reflection_prompt(&self) -> String {
        self.resolver
            .resolve_list(PROMPTS_KEY)
            .choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_else(|| {
                scripted::reflection_prompt(self.resolver.active_language()).to_string()
            })
    }

    pub fn journal(&self) -> JournalView {
        let snapshot = self.store.snapshot();
        JournalView {
            entries: timeline(&snapshot.mood_history, &snapshot.reflections, &snapshot.stories),
            mood_chart: aggregate_moods(&snapshot.mood_history),
        }
    }

    pub fn add_reflection(&self, prompt: &str, text: &str, category: &str) -> Result<ReflectionEntry> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AmigoError::invalid_input("reflection text must not be empty"));
        }
        let category = match category.trim() {
            "" => DEFAULT_CATEGORY,
            other => other,
        };
        let entry = ReflectionEntry::new(prompt.trim(), text, category);
        self.store.append_reflection(entry.clone())?;
        Ok(entry)
    }

    pub fn add_story(&self, title: &str, paragraphs: Vec<String>) -> Result<StoryEntry> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AmigoError::invalid_input("story title must not be empty"));
        }
        let content: Vec<String> = paragraphs
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        if content.is_empty() {
            return Err(AmigoError::invalid_input("story must have at least one paragraph"));
        }
        let entry = StoryEntry::new(title, content);
        self.store.append_story(entry.clone())?;
        Ok(entry)
    }
}
