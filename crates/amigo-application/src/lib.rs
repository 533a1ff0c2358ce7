//! Application layer for Amigo.
//!
//! Use cases that coordinate the profile store, translations, the
//! conversation engine and the generation client.

pub mod bootstrap;
pub mod calm;
pub mod context;
pub mod decoder;
pub mod journal;
pub mod missions;
pub mod mood;
pub mod prompts;
pub mod scenarios;
pub mod state_manager;
pub mod telemetry;

pub use bootstrap::{AppBootstrap, bootstrap};
pub use context::ContentSource;
pub use decoder::{DecodeOutcome, Decoding, Insight};
pub use journal::JournalView;
pub use missions::Mission;
pub use mood::MoodCheckIn;
pub use state_manager::AppStateManager;
