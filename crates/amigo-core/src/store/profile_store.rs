//! The persistent profile store.
//!
//! Reads are always served from the in-memory snapshot. Writes update the
//! snapshot synchronously and queue the new value for a background writer
//! task, which persists keys in the order they were written. A key whose
//! write fails is switched to memory-only mode and reported through
//! [`ProfileStore::persistence_degraded`].

use super::keys::StoreKey;
use super::medium::DurableMedium;
use super::snapshot::ProfileSnapshot;
use crate::error::{AmigoError, Result};
use crate::journal::{MoodEntry, ReflectionEntry, StoryEntry};
use crate::language::Language;
use crate::ledger::{ProgressLedger, RewardCategory, RewardSink};
use crate::profile::{BirthInfo, Profile};
use crate::tasks::ActiveTaskSet;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::{broadcast, mpsc, oneshot};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Change notifications for observers (UI re-render hooks).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// The value under a key changed in memory.
    Changed(StoreKey),
    /// Every key was reset to its default; observers should reload.
    Reset,
    /// Writes for this key now stay in memory only.
    PersistenceDegraded(StoreKey),
}

/// Outcome of [`ProfileStore::initialize`], per key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Keys found in the medium and parsed successfully.
    pub loaded: Vec<StoreKey>,
    /// Keys whose stored text did not parse and were reset to defaults.
    pub malformed: Vec<StoreKey>,
    /// Keys the medium could not read; these run memory-only.
    pub unavailable: Vec<StoreKey>,
}

enum PersistCommand {
    Write { key: StoreKey, payload: String },
    Clear,
    Flush(oneshot::Sender<()>),
}

type DegradedKeys = Arc<RwLock<BTreeSet<StoreKey>>>;

/// Single source of truth for all durable user data.
pub struct ProfileStore {
    snapshot: RwLock<ProfileSnapshot>,
    degraded: DegradedKeys,
    events: broadcast::Sender<StoreEvent>,
    writer: mpsc::UnboundedSender<PersistCommand>,
    load_report: LoadReport,
}

impl ProfileStore {
    /// Loads every known key from `medium` and starts the background writer.
    ///
    /// Must be called from within a tokio runtime. Never fails: unreadable or
    /// malformed keys fall back to their defaults individually.
    pub async fn initialize(medium: Arc<dyn DurableMedium>) -> Arc<Self> {
        let mut snapshot = ProfileSnapshot::default();
        let mut report = LoadReport::default();
        let mut degraded = BTreeSet::new();

        for key in StoreKey::all() {
            match medium.get(key.as_str()).await {
                Ok(Some(raw)) => match snapshot.apply_raw(key, &raw) {
                    Ok(()) => report.loaded.push(key),
                    Err(e) => {
                        tracing::warn!(key = %key, error = %e, "Stored value is malformed, using default");
                        snapshot.reset_key(key);
                        report.malformed.push(key);
                    }
                },
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Durable medium unavailable, key is memory-only");
                    degraded.insert(key);
                    report.unavailable.push(key);
                }
            }
        }

        let degraded = Arc::new(RwLock::new(degraded));
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (writer, receiver) = mpsc::unbounded_channel();

        tokio::spawn(run_writer(
            medium,
            receiver,
            degraded.clone(),
            events.clone(),
        ));

        tracing::debug!(
            loaded = report.loaded.len(),
            malformed = report.malformed.len(),
            unavailable = report.unavailable.len(),
            "Profile store initialized"
        );

        Arc::new(Self {
            snapshot: RwLock::new(snapshot),
            degraded,
            events,
            writer,
            load_report: report,
        })
    }

    /// Per-key outcome of the initial load.
    pub fn load_report(&self) -> &LoadReport {
        &self.load_report
    }

    /// Subscribes to change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    // ============================================================================
    // Reads
    // ============================================================================

    /// Current JSON value under `key`.
    pub fn read(&self, key: StoreKey) -> Value {
        self.with_snapshot(|snapshot| snapshot.value_of(key))
            .unwrap_or(Value::Null)
    }

    /// Clone of the whole in-memory snapshot.
    pub fn snapshot(&self) -> ProfileSnapshot {
        self.with_snapshot(Clone::clone)
    }

    pub fn profile(&self) -> Profile {
        self.with_snapshot(ProfileSnapshot::profile)
    }

    pub fn language(&self) -> Language {
        self.with_snapshot(|s| s.language.unwrap_or_default())
    }

    pub fn active_tasks(&self) -> ActiveTaskSet {
        self.with_snapshot(|s| s.active_tasks.clone())
    }

    pub fn ledger(&self) -> ProgressLedger {
        self.with_snapshot(|s| s.progress.clone())
    }

    /// True when at least one key is running memory-only.
    pub fn persistence_degraded(&self) -> bool {
        !self
            .degraded
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    pub fn degraded_keys(&self) -> Vec<StoreKey> {
        self.degraded
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .copied()
            .collect()
    }

    // ============================================================================
    // Writes
    // ============================================================================

    /// Replaces the value under `key`.
    ///
    /// The value must match the key's shape; a mismatch is rejected with
    /// [`AmigoError::MalformedStoredData`] and nothing changes.
    pub fn write(&self, key: StoreKey, value: Value) -> Result<()> {
        self.update(key, |snapshot| snapshot.apply(key, value))
    }

    pub fn set_user_name(&self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        self.update(StoreKey::UserName, |s| {
            s.user_name = Some(name);
            Ok(())
        })
    }

    pub fn set_birth_info(&self, birth_info: BirthInfo) -> Result<()> {
        self.update(StoreKey::BirthInfo, |s| {
            s.birth_info = Some(birth_info);
            Ok(())
        })
    }

    pub fn set_language(&self, language: Language) -> Result<()> {
        self.update(StoreKey::Language, |s| {
            s.language = Some(language);
            Ok(())
        })
    }

    pub fn set_active_task(&self, category: &str, task: Option<String>) -> Result<()> {
        self.update(StoreKey::ActiveTasks, |s| {
            match task {
                Some(task) => s.active_tasks.set(category, task),
                None => s.active_tasks.clear(category),
            }
            Ok(())
        })
    }

    pub fn append_mood(&self, entry: MoodEntry) -> Result<()> {
        self.update(StoreKey::MoodHistory, |s| {
            s.mood_history.push(entry);
            Ok(())
        })
    }

    pub fn append_reflection(&self, entry: ReflectionEntry) -> Result<()> {
        self.update(StoreKey::Reflections, |s| {
            s.reflections.push(entry);
            Ok(())
        })
    }

    pub fn append_story(&self, entry: StoryEntry) -> Result<()> {
        self.update(StoreKey::Stories, |s| {
            s.stories.push(entry);
            Ok(())
        })
    }

    /// Clears every key back to its default, wipes the medium and tells
    /// observers to reload. Safe to call repeatedly.
    pub fn reset_all(&self) {
        {
            let mut snapshot = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
            for key in StoreKey::all() {
                snapshot.reset_key(key);
            }
        }
        if self.writer.send(PersistCommand::Clear).is_err() {
            tracing::warn!("Persistence writer stopped, reset applied in memory only");
        }
        tracing::info!("Profile store reset to defaults");
        let _ = self.events.send(StoreEvent::Reset);
    }

    /// Waits until every write queued so far has reached the medium (or
    /// failed).
    pub async fn flush(&self) {
        let (tx, rx) = oneshot::channel();
        if self.writer.send(PersistCommand::Flush(tx)).is_ok() {
            let _ = rx.await;
        }
    }

    /// Applies `mutate` to the snapshot and queues `key` for persistence.
    fn update<R>(
        &self,
        key: StoreKey,
        mutate: impl FnOnce(&mut ProfileSnapshot) -> Result<R>,
    ) -> Result<R> {
        let (result, payload) = {
            let mut snapshot = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
            let result = mutate(&mut snapshot)?;
            (result, snapshot.encode(key)?)
        };

        if self
            .writer
            .send(PersistCommand::Write { key, payload })
            .is_err()
        {
            mark_degraded(&self.degraded, &self.events, key, "writer stopped");
        }
        let _ = self.events.send(StoreEvent::Changed(key));
        Ok(result)
    }

    fn with_snapshot<R>(&self, f: impl FnOnce(&ProfileSnapshot) -> R) -> R {
        let snapshot = self.snapshot.read().unwrap_or_else(PoisonError::into_inner);
        f(&snapshot)
    }
}

impl RewardSink for ProfileStore {
    fn credit(&self, category: RewardCategory, amount: u32) -> Result<u32> {
        let total = self.update(StoreKey::Progress, |s| {
            s.progress.add(category, i64::from(amount))
        })?;
        tracing::info!(category = %category, amount, total, "Reward credited");
        Ok(total)
    }
}

async fn run_writer(
    medium: Arc<dyn DurableMedium>,
    mut receiver: mpsc::UnboundedReceiver<PersistCommand>,
    degraded: DegradedKeys,
    events: broadcast::Sender<StoreEvent>,
) {
    while let Some(command) = receiver.recv().await {
        match command {
            PersistCommand::Write { key, payload } => {
                if is_degraded(&degraded, key) {
                    continue;
                }
                if let Err(e) = medium.set(key.as_str(), payload).await {
                    mark_degraded(&degraded, &events, key, &e.to_string());
                }
            }
            PersistCommand::Clear => match medium.clear().await {
                Ok(()) => {
                    degraded
                        .write()
                        .unwrap_or_else(PoisonError::into_inner)
                        .clear();
                }
                Err(e) => {
                    for key in StoreKey::all() {
                        mark_degraded(&degraded, &events, key, &e.to_string());
                    }
                }
            },
            PersistCommand::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    tracing::debug!("Persistence writer stopped");
}

fn is_degraded(degraded: &DegradedKeys, key: StoreKey) -> bool {
    degraded
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .contains(&key)
}

fn mark_degraded(
    degraded: &DegradedKeys,
    events: &broadcast::Sender<StoreEvent>,
    key: StoreKey,
    reason: &str,
) {
    let newly_degraded = degraded
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(key);
    if newly_degraded {
        let error = AmigoError::persistence_unavailable(key.as_str(), reason);
        tracing::warn!(key = %key, error = %error, "Switching key to memory-only mode");
        let _ = events.send(StoreEvent::PersistenceDegraded(key));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::Mood;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    // Mock medium backed by a HashMap, with switchable failures
    #[derive(Default)]
    struct MockMedium {
        data: Mutex<HashMap<String, String>>,
        fail_reads: bool,
        fail_writes: AtomicBool,
    }

    impl MockMedium {
        fn with(entries: &[(&str, &str)]) -> Self {
            let data = entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            Self {
                data: Mutex::new(data),
                ..Default::default()
            }
        }

        fn stored(&self, key: &str) -> Option<String> {
            self.data.lock().unwrap().get(key).cloned()
        }
    }

    #[async_trait]
    impl DurableMedium for MockMedium {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            if self.fail_reads {
                return Err(AmigoError::persistence_unavailable(key, "disabled"));
            }
            Ok(self.data.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, value: String) -> Result<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(AmigoError::persistence_unavailable(key, "quota exceeded"));
            }
            self.data.lock().unwrap().insert(key.to_string(), value);
            Ok(())
        }

        async fn clear(&self) -> Result<()> {
            self.data.lock().unwrap().clear();
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_initialize_empty_medium_gives_defaults() {
        let store = ProfileStore::initialize(Arc::new(MockMedium::default())).await;
        assert_eq!(store.snapshot(), ProfileSnapshot::default());
        assert!(store.load_report().loaded.is_empty());
        assert!(!store.persistence_degraded());
    }

    #[tokio::test]
    async fn test_malformed_key_does_not_affect_others() {
        let medium = MockMedium::with(&[
            ("userName", "\"Ana\""),
            ("language", "\"mk\""),
            ("moodHistory", "{not json"),
            ("activeTasks", "[1, 2]"),
        ]);
        let store = ProfileStore::initialize(Arc::new(medium)).await;

        assert_eq!(store.profile().user_name.as_deref(), Some("Ana"));
        assert_eq!(store.language(), Language::Mk);
        assert!(store.snapshot().mood_history.is_empty());
        assert_eq!(store.active_tasks(), ActiveTaskSet::default());
        assert_eq!(
            store.load_report().malformed,
            vec![StoreKey::ActiveTasks, StoreKey::MoodHistory]
        );
    }

    #[tokio::test]
    async fn test_read_your_writes_before_flush() {
        let store = ProfileStore::initialize(Arc::new(MockMedium::default())).await;
        store.write(StoreKey::Language, json!("mk")).unwrap();
        assert_eq!(store.read(StoreKey::Language), json!("mk"));
    }

    #[tokio::test]
    async fn test_writes_reach_medium_after_flush() {
        let medium = Arc::new(MockMedium::default());
        let store = ProfileStore::initialize(medium.clone()).await;
        store.set_user_name("Ana").unwrap();
        store.append_mood(MoodEntry::new([Mood::Happy], "")).unwrap();
        store.flush().await;
        assert_eq!(medium.stored("userName").as_deref(), Some("\"Ana\""));
        assert!(medium.stored("moodHistory").unwrap().contains("Happy"));
    }

    #[tokio::test]
    async fn test_write_rejects_wrong_shape() {
        let store = ProfileStore::initialize(Arc::new(MockMedium::default())).await;
        store.set_language(Language::Mk).unwrap();
        let err = store.write(StoreKey::Language, json!(42)).unwrap_err();
        assert!(err.is_malformed());
        assert_eq!(store.language(), Language::Mk);
    }

    #[tokio::test]
    async fn test_failed_write_degrades_key_but_keeps_memory() {
        let medium = Arc::new(MockMedium::default());
        let store = ProfileStore::initialize(medium.clone()).await;
        let mut events = store.subscribe();

        medium.fail_writes.store(true, Ordering::SeqCst);
        store.set_user_name("Ana").unwrap();
        store.flush().await;

        assert!(store.persistence_degraded());
        assert_eq!(store.degraded_keys(), vec![StoreKey::UserName]);
        assert_eq!(store.profile().user_name.as_deref(), Some("Ana"));
        assert_eq!(events.recv().await.unwrap(), StoreEvent::Changed(StoreKey::UserName));
        assert_eq!(
            events.recv().await.unwrap(),
            StoreEvent::PersistenceDegraded(StoreKey::UserName)
        );

        // Memory-only from now on, even once the medium recovers.
        medium.fail_writes.store(false, Ordering::SeqCst);
        store.set_user_name("Bo").unwrap();
        store.flush().await;
        assert_eq!(medium.stored("userName"), None);
    }

    #[tokio::test]
    async fn test_unreadable_medium_runs_memory_only() {
        let medium = MockMedium {
            fail_reads: true,
            ..Default::default()
        };
        let store = ProfileStore::initialize(Arc::new(medium)).await;
        assert_eq!(store.load_report().unavailable.len(), StoreKey::all().count());
        assert!(store.persistence_degraded());
        store.set_language(Language::Tr).unwrap();
        assert_eq!(store.language(), Language::Tr);
    }

    #[tokio::test]
    async fn test_reset_all_restores_defaults_and_notifies() {
        let medium = Arc::new(MockMedium::default());
        let store = ProfileStore::initialize(medium.clone()).await;
        store.set_user_name("Ana").unwrap();
        store.credit(RewardCategory::Mission, 15).unwrap();
        store.set_active_task("daily-mission", Some("Wave".into())).unwrap();
        store.flush().await;

        let mut events = store.subscribe();
        store.reset_all();
        store.reset_all();
        store.flush().await;

        for key in StoreKey::all() {
            assert_eq!(
                store.read(key),
                ProfileSnapshot::default().value_of(key).unwrap()
            );
        }
        assert_eq!(events.recv().await.unwrap(), StoreEvent::Reset);
        assert_eq!(medium.stored("userName"), None);
        assert_eq!(store.ledger().total(), 0);
        assert_eq!(store.ledger().get(RewardCategory::Mission), 0);
    }

    #[tokio::test]
    async fn test_credit_persists_ledger() {
        let medium = Arc::new(MockMedium::default());
        let store = ProfileStore::initialize(medium.clone()).await;
        assert_eq!(store.credit(RewardCategory::Practice, 20).unwrap(), 20);
        assert_eq!(store.credit(RewardCategory::Activity, 10).unwrap(), 30);
        store.flush().await;

        let reloaded = ProfileStore::initialize(medium).await;
        assert_eq!(reloaded.ledger().total(), 30);
        assert_eq!(reloaded.ledger().get(RewardCategory::Practice), 20);
    }
}
