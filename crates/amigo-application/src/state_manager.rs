//! The application state manager: one injectable object holding the profile
//! store, the translation resolver, the conversation engine and the use case
//! services, with a subscription interface for UI re-renders.

use crate::calm::CalmService;
use crate::context::ServiceContext;
use crate::decoder::DecoderService;
use crate::journal::JournalService;
use crate::missions::MissionService;
use crate::mood::MoodService;
use crate::scenarios;
use amigo_core::config::AmigoConfig;
use amigo_core::error::{AmigoError, Result};
use amigo_core::i18n::{DictionarySource, TranslationResolver};
use amigo_core::language::{Language, detect_language};
use amigo_core::ledger::{ProgressLedger, RewardSink};
use amigo_core::profile::{BirthInfo, Profile, validate_user_name};
use amigo_core::session::{
    ConversationEngine, ConversationSession, EngineOptions, GenerationClient, Scenario,
    SessionContext, StartOutcome, TurnOutcome,
};
use amigo_core::store::{ProfileStore, StoreEvent, StoreKey};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info};

pub struct AppStateManager {
    config: AmigoConfig,
    store: Arc<ProfileStore>,
    resolver: Arc<TranslationResolver>,
    dictionaries: Arc<dyn DictionarySource>,
    engine: Arc<ConversationEngine>,
    missions: MissionService,
    decoder: DecoderService,
    calm: CalmService,
    moods: MoodService,
    journal: JournalService,
}

impl AppStateManager {
    /// Wires every component and loads the dictionaries for the stored
    /// language.
    pub async fn new(
        config: AmigoConfig,
        store: Arc<ProfileStore>,
        dictionaries: Arc<dyn DictionarySource>,
        client: Arc<dyn GenerationClient>,
    ) -> Arc<Self> {
        let default_language = config.general.default_language;
        let resolver = Arc::new(TranslationResolver::new(default_language));
        let ctx = ServiceContext::new(store.clone(), client.clone(), default_language);
        let rewards: Arc<dyn RewardSink> = store.clone();
        let engine = Arc::new(ConversationEngine::new(
            client,
            rewards,
            EngineOptions::from_config(&config),
        ));

        let manager = Self {
            missions: MissionService::new(ctx.clone(), config.rewards.mission_points),
            decoder: DecoderService::new(ctx.clone(), resolver.clone(), config.engine.decoder_reward),
            calm: CalmService::new(ctx.clone()),
            moods: MoodService::new(ctx, config.rewards.activity_points),
            journal: JournalService::new(store.clone(), resolver.clone()),
            config,
            store,
            resolver,
            dictionaries,
            engine,
        };
        manager
            .resolver
            .activate(manager.language(), manager.dictionaries.as_ref())
            .await;
        info!(language = %manager.language(), "Application state ready");
        Arc::new(manager)
    }

    pub fn config(&self) -> &AmigoConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<ProfileStore> {
        &self.store
    }

    pub fn resolver(&self) -> &Arc<TranslationResolver> {
        &self.resolver
    }

    pub fn engine(&self) -> &Arc<ConversationEngine> {
        &self.engine
    }

    pub fn missions(&self) -> &MissionService {
        &self.missions
    }

    pub fn decoder(&self) -> &DecoderService {
        &self.decoder
    }

    pub fn calm(&self) -> &CalmService {
        &self.calm
    }

    pub fn moods(&self) -> &MoodService {
        &self.moods
    }

    pub fn journal(&self) -> &JournalService {
        &self.journal
    }

    /// Store change notifications. A [`StoreEvent::Reset`] means every
    /// observer should reload from defaults.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.store.subscribe()
    }

    // ============================================================================
    // Profile and language
    // ============================================================================

    pub fn profile(&self) -> Profile {
        self.store.profile()
    }

    pub fn language(&self) -> Language {
        self.profile()
            .language
            .unwrap_or(self.config.general.default_language)
    }

    pub fn progress(&self) -> ProgressLedger {
        self.store.ledger()
    }

    pub fn t(&self, key: &str) -> String {
        self.resolver.t(key)
    }

    pub fn resolve(&self, key: &str, fallback: Option<&str>) -> String {
        self.resolver.resolve(key, fallback)
    }

    pub async fn set_language(&self, language: Language) -> Result<()> {
        self.store.set_language(language)?;
        self.resolver
            .activate(language, self.dictionaries.as_ref())
            .await;
        info!(language = %language, "Language changed");
        Ok(())
    }

    /// Generic keyed write. Writing the language key also switches the
    /// resolver.
    pub async fn write(&self, key: StoreKey, value: Value) -> Result<()> {
        self.store.write(key, value)?;
        if key == StoreKey::Language {
            self.resolver
                .activate(self.language(), self.dictionaries.as_ref())
                .await;
        }
        Ok(())
    }

    /// Validates and stores the user's name. A name written in Macedonian
    /// switches the app to Macedonian.
    pub async fn set_user_name(&self, raw: &str) -> Result<String> {
        let name = validate_user_name(raw)?;
        self.store.set_user_name(name.clone())?;

        let detected = detect_language(&name);
        if detected == Language::Mk && self.language() != Language::Mk {
            debug!("Name looks Macedonian, switching language");
            self.set_language(detected).await?;
        }
        Ok(name)
    }

    /// Validates and stores an age or birth date.
    pub fn set_birth_info(&self, raw: &str) -> Result<()> {
        let birth_info = BirthInfo::new(raw);
        birth_info.validate()?;
        self.store.set_birth_info(birth_info)
    }

    /// Clears everything and returns to a first-run state. Safe to call
    /// repeatedly.
    pub async fn reset_app(&self) {
        self.engine.end();
        self.store.reset_all();
        let default_language = self.config.general.default_language;
        self.resolver
            .activate(default_language, self.dictionaries.as_ref())
            .await;
        info!("Application reset");
    }

    // ============================================================================
    // Conversation sessions
    // ============================================================================

    pub fn practice_scenarios(&self) -> Vec<Scenario> {
        scenarios::practice_scenarios(self.language())
    }

    pub fn session_context(&self) -> SessionContext {
        let profile = self.profile();
        SessionContext::new(profile.display_name(), self.language())
            .with_age_group(profile.age_group())
    }

    pub async fn start_practice(&self, scenario_id: &str) -> Result<StartOutcome> {
        let scenario = scenarios::find_scenario(scenario_id, self.language())
            .ok_or_else(|| AmigoError::not_found("scenario", scenario_id))?;
        self.start_session(scenario).await
    }

    /// Opens a decoder conversation about `description`.
    pub async fn start_decoder_chat(&self, description: &str) -> Result<StartOutcome> {
        let description = description.trim();
        if description.is_empty() {
            return Err(AmigoError::invalid_input("describe what happened first"));
        }
        self.start_session(Scenario::decoder(description)).await
    }

    pub async fn start_session(&self, scenario: Scenario) -> Result<StartOutcome> {
        self.engine.start(scenario, self.session_context()).await
    }

    pub async fn submit_turn(&self, text: &str) -> Result<TurnOutcome> {
        self.engine.submit_user_turn(text).await
    }

    /// Ends the active session. With `save_transcript` the conversation is
    /// kept in the journal as a reflection.
    pub fn finish_session(&self, save_transcript: bool) -> Result<Option<ConversationSession>> {
        let Some(session) = self.engine.end() else {
            return Ok(None);
        };
        if save_transcript && !session.transcript.is_empty() {
            self.store.append_reflection(session.to_reflection())?;
        }
        Ok(Some(session))
    }
}
