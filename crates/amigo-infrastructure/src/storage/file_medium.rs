//! Durable medium backed by one JSON file per key.

use super::atomic_file::AtomicTextFile;
use amigo_core::error::{AmigoError, Result};
use amigo_core::store::DurableMedium;
use async_trait::async_trait;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;

const EXTENSION: &str = "json";

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileMedium {
    dir: PathBuf,
}

impl FileMedium {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    fn file_for(&self, key: &str) -> Result<AtomicTextFile> {
        let valid = !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(AmigoError::invalid_input(format!("invalid store key '{key}'")));
        }
        Ok(AtomicTextFile::new(self.dir.join(format!("{key}.{EXTENSION}"))))
    }

    fn clear_blocking(dir: PathBuf) -> Result<()> {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == EXTENSION) {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl DurableMedium for FileMedium {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let file = self.file_for(key)?;
        run_blocking(move || file.read()).await
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let file = self.file_for(key)?;
        debug!(key, bytes = value.len(), "Writing store key");
        run_blocking(move || file.write(&value)).await
    }

    async fn clear(&self) -> Result<()> {
        let dir = self.dir.clone();
        debug!(dir = %dir.display(), "Clearing store directory");
        run_blocking(move || Self::clear_blocking(dir)).await
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AmigoError::internal(format!("storage task failed: {e}")))?
}
