//! Profile store persistence through the file medium, across restarts.

use amigo_core::Language;
use amigo_core::journal::{Mood, MoodEntry};
use amigo_core::ledger::{RewardCategory, RewardSink};
use amigo_core::store::{ProfileStore, StoreKey};
use amigo_infrastructure::{FileMedium, UnavailableMedium};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_profile_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let store_dir = temp_dir.path().join("store");

    {
        let store = ProfileStore::initialize(Arc::new(FileMedium::new(store_dir.clone()))).await;
        store.set_user_name("Ana").unwrap();
        store.set_language(Language::Mk).unwrap();
        store
            .append_mood(MoodEntry::new([Mood::Happy, Mood::Tired], "long day"))
            .unwrap();
        store.credit(RewardCategory::Mission, 15).unwrap();
        store.flush().await;
    }

    let store = ProfileStore::initialize(Arc::new(FileMedium::new(store_dir))).await;
    let snapshot = store.snapshot();
    assert_eq!(snapshot.user_name.as_deref(), Some("Ana"));
    assert_eq!(store.language(), Language::Mk);
    assert_eq!(snapshot.mood_history.len(), 1);
    assert_eq!(store.ledger().get(RewardCategory::Mission), 15);
    assert!(store.load_report().malformed.is_empty());
}

#[tokio::test]
async fn test_corrupt_key_file_resets_only_that_key() {
    let temp_dir = TempDir::new().unwrap();
    let store_dir = temp_dir.path().to_path_buf();
    fs::write(store_dir.join("userName.json"), "\"Leo\"").unwrap();
    fs::write(store_dir.join("moodHistory.json"), "[{\"moods\": 42}]").unwrap();

    let store = ProfileStore::initialize(Arc::new(FileMedium::new(store_dir))).await;
    assert_eq!(store.profile().user_name.as_deref(), Some("Leo"));
    assert!(store.snapshot().mood_history.is_empty());
    assert_eq!(store.load_report().malformed, vec![StoreKey::MoodHistory]);
}

#[tokio::test]
async fn test_reset_clears_files_and_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let store_dir = temp_dir.path().to_path_buf();
    let store = ProfileStore::initialize(Arc::new(FileMedium::new(store_dir.clone()))).await;
    store.set_user_name("Ana").unwrap();
    store.flush().await;
    assert!(store_dir.join("userName.json").exists());

    store.reset_all();
    store.reset_all();
    store.flush().await;
    assert!(!store_dir.join("userName.json").exists());

    let reopened = ProfileStore::initialize(Arc::new(FileMedium::new(store_dir))).await;
    assert_eq!(reopened.profile().user_name, None);
    assert_eq!(reopened.ledger().total(), 0);
}

#[tokio::test]
async fn test_unavailable_medium_keeps_working_in_memory() {
    let store = ProfileStore::initialize(Arc::new(UnavailableMedium)).await;
    assert!(store.persistence_degraded());
    store.set_language(Language::Mk).unwrap();
    store.flush().await;
    assert_eq!(store.language(), Language::Mk);
}
