//! In-memory image of everything the profile store holds.

use super::keys::StoreKey;
use crate::error::{AmigoError, Result};
use crate::journal::{MoodEntry, ReflectionEntry, StoryEntry};
use crate::language::Language;
use crate::ledger::ProgressLedger;
use crate::profile::{BirthInfo, Profile};
use crate::tasks::ActiveTaskSet;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// All durable data, one field per [`StoreKey`].
///
/// Histories are stored oldest-first and only ever appended to.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfileSnapshot {
    pub user_name: Option<String>,
    pub birth_info: Option<BirthInfo>,
    pub language: Option<Language>,
    pub active_tasks: ActiveTaskSet,
    pub mood_history: Vec<MoodEntry>,
    pub reflections: Vec<ReflectionEntry>,
    pub stories: Vec<StoryEntry>,
    pub progress: ProgressLedger,
}

impl ProfileSnapshot {
    pub fn profile(&self) -> Profile {
        Profile {
            user_name: self.user_name.clone(),
            birth_info: self.birth_info.clone(),
            language: self.language,
        }
    }

    /// Mood history for display, newest first.
    pub fn mood_history_newest_first(&self) -> Vec<MoodEntry> {
        self.mood_history.iter().rev().cloned().collect()
    }

    /// JSON value currently held under `key`.
    pub fn value_of(&self, key: StoreKey) -> Result<Value> {
        let value = match key {
            StoreKey::UserName => serde_json::to_value(&self.user_name)?,
            StoreKey::BirthInfo => serde_json::to_value(&self.birth_info)?,
            StoreKey::Language => serde_json::to_value(self.language)?,
            StoreKey::ActiveTasks => serde_json::to_value(&self.active_tasks)?,
            StoreKey::MoodHistory => serde_json::to_value(&self.mood_history)?,
            StoreKey::Reflections => serde_json::to_value(&self.reflections)?,
            StoreKey::Stories => serde_json::to_value(&self.stories)?,
            StoreKey::Progress => serde_json::to_value(&self.progress)?,
        };
        Ok(value)
    }

    /// Serialized form of `key` as written to the durable medium.
    pub fn encode(&self, key: StoreKey) -> Result<String> {
        Ok(serde_json::to_string(&self.value_of(key)?)?)
    }

    /// Replaces the field for `key` with `value`.
    ///
    /// The value is parsed against the field's type first; on a mismatch the
    /// snapshot is left untouched and [`AmigoError::MalformedStoredData`] is
    /// returned.
    pub fn apply(&mut self, key: StoreKey, value: Value) -> Result<()> {
        match key {
            StoreKey::UserName => self.user_name = parse(key, value)?,
            StoreKey::BirthInfo => self.birth_info = parse(key, value)?,
            StoreKey::Language => self.language = parse(key, value)?,
            StoreKey::ActiveTasks => self.active_tasks = parse(key, value)?,
            StoreKey::MoodHistory => self.mood_history = parse(key, value)?,
            StoreKey::Reflections => self.reflections = parse(key, value)?,
            StoreKey::Stories => self.stories = parse(key, value)?,
            StoreKey::Progress => self.progress = parse(key, value)?,
        }
        Ok(())
    }

    /// Parses raw medium text for `key` and applies it.
    pub fn apply_raw(&mut self, key: StoreKey, raw: &str) -> Result<()> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| AmigoError::malformed(key.as_str(), e.to_string()))?;
        self.apply(key, value)
    }

    /// Restores the documented default of `key`.
    pub fn reset_key(&mut self, key: StoreKey) {
        let defaults = ProfileSnapshot::default();
        match key {
            StoreKey::UserName => self.user_name = defaults.user_name,
            StoreKey::BirthInfo => self.birth_info = defaults.birth_info,
            StoreKey::Language => self.language = defaults.language,
            StoreKey::ActiveTasks => self.active_tasks = defaults.active_tasks,
            StoreKey::MoodHistory => self.mood_history = defaults.mood_history,
            StoreKey::Reflections => self.reflections = defaults.reflections,
            StoreKey::Stories => self.stories = defaults.stories,
            StoreKey::Progress => self.progress.reset_all(),
        }
    }
}

fn parse<T: DeserializeOwned>(key: StoreKey, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| AmigoError::malformed(key.as_str(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::Mood;
    use crate::ledger::RewardCategory;
    use serde_json::json;

    #[test]
    fn test_apply_valid_values() {
        let mut snapshot = ProfileSnapshot::default();
        snapshot.apply(StoreKey::Language, json!("mk")).unwrap();
        snapshot.apply(StoreKey::UserName, json!("Ana")).unwrap();
        snapshot.apply(StoreKey::BirthInfo, json!("11")).unwrap();
        assert_eq!(snapshot.language, Some(Language::Mk));
        assert_eq!(snapshot.profile().age(), Some(11));
    }

    #[test]
    fn test_apply_malformed_leaves_field_untouched() {
        let mut snapshot = ProfileSnapshot::default();
        snapshot.apply(StoreKey::Language, json!("mk")).unwrap();
        let err = snapshot.apply(StoreKey::Language, json!("klingon")).unwrap_err();
        assert!(err.is_malformed());
        assert_eq!(snapshot.language, Some(Language::Mk));
    }

    #[test]
    fn test_apply_raw_rejects_broken_json() {
        let mut snapshot = ProfileSnapshot::default();
        let err = snapshot.apply_raw(StoreKey::MoodHistory, "[{").unwrap_err();
        assert!(matches!(err, AmigoError::MalformedStoredData { ref key, .. } if key == "moodHistory"));
        assert!(snapshot.mood_history.is_empty());
    }

    #[test]
    fn test_encode_then_apply_raw_restores_history() {
        let mut snapshot = ProfileSnapshot::default();
        snapshot.mood_history.push(MoodEntry::new([Mood::Happy], "sun"));
        let raw = snapshot.encode(StoreKey::MoodHistory).unwrap();

        let mut restored = ProfileSnapshot::default();
        restored.apply_raw(StoreKey::MoodHistory, &raw).unwrap();
        assert_eq!(restored.mood_history, snapshot.mood_history);
    }

    #[test]
    fn test_reset_key_only_touches_that_key() {
        let mut snapshot = ProfileSnapshot::default();
        snapshot.user_name = Some("Ana".into());
        snapshot.language = Some(Language::Mk);
        snapshot.reset_key(StoreKey::Language);
        assert_eq!(snapshot.language, None);
        assert_eq!(snapshot.user_name.as_deref(), Some("Ana"));
    }

    #[test]
    fn test_reset_progress_zeroes_ledger() {
        let mut snapshot = ProfileSnapshot::default();
        snapshot.progress.add(RewardCategory::Decoder, 10).unwrap();
        snapshot.user_name = Some("Ana".into());
        snapshot.reset_key(StoreKey::Progress);
        assert_eq!(snapshot.progress.total(), 0);
        assert_eq!(snapshot.progress, ProgressLedger::default());
        assert_eq!(snapshot.user_name.as_deref(), Some("Ana"));
    }

    #[test]
    fn test_newest_first() {
        let mut snapshot = ProfileSnapshot::default();
        snapshot.mood_history.push(MoodEntry::new([Mood::Sad], "first"));
        snapshot.mood_history.push(MoodEntry::new([Mood::Happy], "second"));
        let display = snapshot.mood_history_newest_first();
        assert_eq!(display[0].note, "second");
    }
}
