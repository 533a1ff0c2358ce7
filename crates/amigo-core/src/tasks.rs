//! Pending tasks that must survive reloads.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Category of the daily social mission.
pub const DAILY_MISSION: &str = "daily-mission";

/// Map from task category to the pending task text, if any.
///
/// Keeping the pending text means an unfinished mission is shown again after
/// a reload instead of being silently regenerated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActiveTaskSet(BTreeMap<String, Option<String>>);

impl ActiveTaskSet {
    pub fn get(&self, category: &str) -> Option<&str> {
        self.0.get(category).and_then(|task| task.as_deref())
    }

    pub fn set(&mut self, category: impl Into<String>, task: impl Into<String>) {
        self.0.insert(category.into(), Some(task.into()));
    }

    /// Marks the category as having no pending task.
    pub fn clear(&mut self, category: &str) {
        self.0.insert(category.to_string(), None);
    }

    /// Categories that currently hold a pending task.
    pub fn pending(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .filter_map(|(category, task)| task.as_deref().map(|t| (category.as_str(), t)))
    }
}

impl Default for ActiveTaskSet {
    fn default() -> Self {
        let mut tasks = BTreeMap::new();
        tasks.insert(DAILY_MISSION.to_string(), None);
        Self(tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_empty_mission_slot() {
        let tasks = ActiveTaskSet::default();
        assert_eq!(tasks.get(DAILY_MISSION), None);
        assert_eq!(
            serde_json::to_value(&tasks).unwrap(),
            serde_json::json!({ "daily-mission": null })
        );
    }

    #[test]
    fn test_set_and_clear() {
        let mut tasks = ActiveTaskSet::default();
        tasks.set(DAILY_MISSION, "Say hi to someone new");
        assert_eq!(tasks.get(DAILY_MISSION), Some("Say hi to someone new"));
        assert_eq!(tasks.pending().count(), 1);
        tasks.clear(DAILY_MISSION);
        assert_eq!(tasks.get(DAILY_MISSION), None);
        assert_eq!(tasks.pending().count(), 0);
    }
}
