//! Platform paths for Amigo's files.
//!
//! ```text
//! ~/.config/amigo/              # Config directory
//! ├── config.toml               # Application configuration
//! └── locales/                  # Optional dictionary overrides
//!     ├── en.json
//!     └── mk.json
//!
//! ~/.local/share/amigo/         # Data directory
//! └── store/                    # One JSON file per profile store key
//! ```

use amigo_core::error::{AmigoError, Result};
use std::path::PathBuf;

const APP_DIR: &str = "amigo";

pub struct AmigoPaths;

impl AmigoPaths {
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| AmigoError::io("Cannot find config directory"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| AmigoError::io("Cannot find data directory"))
    }

    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Directory backing the durable profile store.
    pub fn store_dir() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("store"))
    }

    pub fn locales_dir() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("locales"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_are_namespaced() {
        if let (Ok(config), Ok(store)) = (AmigoPaths::config_file(), AmigoPaths::store_dir()) {
            assert!(config.ends_with("amigo/config.toml"));
            assert!(store.ends_with("amigo/store"));
        }
    }
}
