//! Journal entry types: moods, reflections and stories.
//!
//! All entries are immutable once created; histories only grow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum::{Display, EnumIter, EnumString};

/// Fixed set of mood tags.
///
/// The declaration order is the canonical order used to break ties when
/// moods are ranked: Happy, Sad, Angry, Worried, Tired.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
pub enum Mood {
    Happy,
    Sad,
    Angry,
    Worried,
    Tired,
}

impl Mood {
    pub fn emoji(&self) -> &'static str {
        match self {
            Mood::Happy => "😊",
            Mood::Sad => "😢",
            Mood::Angry => "😠",
            Mood::Worried => "😟",
            Mood::Tired => "😴",
        }
    }

    /// Translation key of the mood's display name.
    pub fn translation_key(&self) -> String {
        format!("moods.{self}")
    }
}

/// A single mood check-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub moods: BTreeSet<Mood>,
    pub note: String,
    pub date: DateTime<Utc>,
}

impl MoodEntry {
    pub fn new(moods: impl IntoIterator<Item = Mood>, note: impl Into<String>) -> Self {
        Self {
            moods: moods.into_iter().collect(),
            note: note.into(),
            date: Utc::now(),
        }
    }
}

/// A free-text answer to a reflection prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectionEntry {
    pub prompt: String,
    pub text: String,
    pub date: DateTime<Utc>,
    /// "general" for journal prompts, "social" for decoder victories and
    /// saved practice transcripts.
    pub category: String,
}

impl ReflectionEntry {
    pub fn new(
        prompt: impl Into<String>,
        text: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            text: text.into(),
            date: Utc::now(),
            category: category.into(),
        }
    }
}

/// A story written in the story creator, one string per paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryEntry {
    pub title: String,
    pub content: Vec<String>,
    pub date: DateTime<Utc>,
}

impl StoryEntry {
    pub fn new(title: impl Into<String>, content: Vec<String>) -> Self {
        Self {
            title: title.into(),
            content,
            date: Utc::now(),
        }
    }
}

/// Any entry shown in the combined journal timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum JournalEntry {
    Mood(MoodEntry),
    Reflection(ReflectionEntry),
    Story(StoryEntry),
}

impl JournalEntry {
    pub fn date(&self) -> DateTime<Utc> {
        match self {
            JournalEntry::Mood(entry) => entry.date,
            JournalEntry::Reflection(entry) => entry.date,
            JournalEntry::Story(entry) => entry.date,
        }
    }
}

/// Merges the three histories into one newest-first timeline.
pub fn timeline(
    moods: &[MoodEntry],
    reflections: &[ReflectionEntry],
    stories: &[StoryEntry],
) -> Vec<JournalEntry> {
    let mut entries: Vec<JournalEntry> = moods
        .iter()
        .cloned()
        .map(JournalEntry::Mood)
        .chain(reflections.iter().cloned().map(JournalEntry::Reflection))
        .chain(stories.iter().cloned().map(JournalEntry::Story))
        .collect();
    // Stable sort keeps insertion order for identical timestamps.
    entries.sort_by(|a, b| b.date().cmp(&a.date()));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_mood_entry_deduplicates_tags() {
        let entry = MoodEntry::new([Mood::Sad, Mood::Happy, Mood::Sad], "");
        assert_eq!(entry.moods.len(), 2);
    }

    #[test]
    fn test_mood_serializes_as_name() {
        assert_eq!(serde_json::to_string(&Mood::Worried).unwrap(), "\"Worried\"");
        assert_eq!(Mood::Tired.translation_key(), "moods.Tired");
    }

    #[test]
    fn test_timeline_is_newest_first() {
        let now = Utc::now();
        let mut old_mood = MoodEntry::new([Mood::Tired], "zzz");
        old_mood.date = now - Duration::hours(2);
        let mut reflection = ReflectionEntry::new("Best part?", "Recess", "general");
        reflection.date = now;
        let mut story = StoryEntry::new("Dragon", vec!["Once".into()]);
        story.date = now - Duration::hours(1);

        let entries = timeline(&[old_mood], &[reflection], &[story]);
        assert!(matches!(entries[0], JournalEntry::Reflection(_)));
        assert!(matches!(entries[1], JournalEntry::Story(_)));
        assert!(matches!(entries[2], JournalEntry::Mood(_)));
    }
}
