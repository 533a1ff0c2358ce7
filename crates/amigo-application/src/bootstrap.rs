//! Startup wiring from files on disk.

use crate::state_manager::AppStateManager;
use amigo_core::i18n::DictionarySource;
use amigo_core::session::GenerationClient;
use amigo_core::store::ProfileStore;
use amigo_infrastructure::{AmigoPaths, ConfigStorage, FileMedium, LocalesDirSource};
use amigo_interaction::{GeminiGenerationClient, OfflineGenerationClient};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// File locations used at startup.
#[derive(Debug, Clone)]
pub struct AppBootstrap {
    pub config_file: PathBuf,
    pub store_dir: PathBuf,
    pub locales_dir: PathBuf,
}

impl AppBootstrap {
    /// Platform default locations.
    pub fn default_locations() -> Result<Self> {
        Ok(Self {
            config_file: AmigoPaths::config_file().context("resolving config file")?,
            store_dir: AmigoPaths::store_dir().context("resolving store directory")?,
            locales_dir: AmigoPaths::locales_dir().context("resolving locales directory")?,
        })
    }

    /// Loads config, opens the store and connects the generation client.
    ///
    /// A missing API key is not fatal: the app runs on scripted content.
    pub async fn build(self) -> Result<Arc<AppStateManager>> {
        let config = ConfigStorage::new(self.config_file.clone())
            .load()
            .with_context(|| format!("loading {}", self.config_file.display()))?;

        let store = ProfileStore::initialize(Arc::new(FileMedium::new(self.store_dir.clone()))).await;
        let dictionaries: Arc<dyn DictionarySource> =
            Arc::new(LocalesDirSource::new(self.locales_dir.clone()));

        let client: Arc<dyn GenerationClient> =
            match GeminiGenerationClient::from_settings(&config.generation) {
                Ok(client) => {
                    info!(model = %client.model(), "Generation client ready");
                    Arc::new(client)
                }
                Err(e) => {
                    warn!(error = %e, "Generation unavailable, using scripted content");
                    Arc::new(OfflineGenerationClient)
                }
            };

        info!(store = %self.store_dir.display(), "Starting Amigo");
        Ok(AppStateManager::new(config, store, dictionaries, client).await)
    }
}

/// Starts the application from the platform default locations.
pub async fn bootstrap() -> Result<Arc<AppStateManager>> {
    AppBootstrap::default_locations()?.build().await
}
