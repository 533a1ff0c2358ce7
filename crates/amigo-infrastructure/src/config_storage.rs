//! Loading and saving `config.toml`.

use crate::paths::AmigoPaths;
use crate::storage::AtomicTextFile;
use amigo_core::config::AmigoConfig;
use amigo_core::error::Result;
use std::path::PathBuf;
use tracing::{debug, info};

/// Application configuration file.
///
/// A missing file means defaults; a file with only some sections fills the
/// rest from defaults.
#[derive(Debug, Clone)]
pub struct ConfigStorage {
    file: AtomicTextFile,
}

impl ConfigStorage {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicTextFile::new(path),
        }
    }

    /// Storage at the platform default location.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(AmigoPaths::config_file()?))
    }

    pub fn load(&self) -> Result<AmigoConfig> {
        match self.file.read()? {
            Some(content) => {
                debug!(path = %self.file.path().display(), "Loading config");
                AmigoConfig::from_toml_str(&content)
            }
            None => {
                debug!(path = %self.file.path().display(), "No config file, using defaults");
                Ok(AmigoConfig::default())
            }
        }
    }

    pub fn save(&self, config: &AmigoConfig) -> Result<()> {
        self.file.write(&config.to_toml_string()?)?;
        info!(path = %self.file.path().display(), "Saved config");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amigo_core::Language;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ConfigStorage::new(temp_dir.path().join("config.toml"));
        assert_eq!(storage.load().unwrap(), AmigoConfig::default());
    }

    #[test]
    fn test_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[general]\ndefault_language = \"mk\"\n").unwrap();
        let config = ConfigStorage::new(path).load().unwrap();
        assert_eq!(config.general.default_language, Language::Mk);
        assert_eq!(config.engine.completion_threshold, 3);
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ConfigStorage::new(temp_dir.path().join("config.toml"));
        let mut config = AmigoConfig::default();
        config.engine.completion_threshold = 5;
        storage.save(&config).unwrap();
        assert_eq!(storage.load().unwrap().engine.completion_threshold, 5);
    }

    #[test]
    fn test_broken_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[engine\ncompletion_threshold = ").unwrap();
        assert!(ConfigStorage::new(path).load().is_err());
    }
}
