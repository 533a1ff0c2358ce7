//! Keys of the profile store.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{EnumIter, IntoEnumIterator};

/// Every key the profile store persists. Each key is loaded, parsed and
/// defaulted independently of the others.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter,
)]
pub enum StoreKey {
    UserName,
    BirthInfo,
    Language,
    ActiveTasks,
    MoodHistory,
    Reflections,
    Stories,
    Progress,
}

impl StoreKey {
    /// Name of the key in the durable medium.
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::UserName => "userName",
            StoreKey::BirthInfo => "birthDate",
            StoreKey::Language => "language",
            StoreKey::ActiveTasks => "activeTasks",
            StoreKey::MoodHistory => "moodHistory",
            StoreKey::Reflections => "reflections",
            StoreKey::Stories => "stories",
            StoreKey::Progress => "progress",
        }
    }

    /// Looks a key up by its medium name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::iter().find(|key| key.as_str() == name)
    }

    pub fn all() -> impl Iterator<Item = StoreKey> {
        Self::iter()
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
