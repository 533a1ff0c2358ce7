//! Journal domain module: mood check-ins, reflections, stories and the
//! mood chart aggregation.

mod aggregator;
mod model;

pub use aggregator::{MoodShare, aggregate_moods};
pub use model::{JournalEntry, Mood, MoodEntry, ReflectionEntry, StoryEntry, timeline};
