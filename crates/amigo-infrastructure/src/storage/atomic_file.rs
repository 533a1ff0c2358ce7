//! Crash-safe text files.
//!
//! Writes go to a hidden temp file in the same directory, are fsynced and
//! then renamed over the target, so readers see either the old or the new
//! content, never a torn write.

use amigo_core::error::{AmigoError, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write as IoWrite};
use std::path::{Path, PathBuf};

/// A text file updated atomically under an exclusive lock.
#[derive(Debug, Clone)]
pub struct AtomicTextFile {
    path: PathBuf,
}

impl AtomicTextFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the file content, or `None` if the file is missing or blank.
    pub fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(None),
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn write(&self, content: &str) -> Result<()> {
        let _lock = FileLock::acquire(&self.path)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(content.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Deletes the file. A missing file is not an error.
    pub fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| AmigoError::io("path has no parent directory"))?;
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| AmigoError::io("path has no file name"))?;
        Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
    }
}

/// Exclusive lock held for the duration of a write. Released on drop.
struct FileLock {
    _file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| AmigoError::io(format!("Failed to acquire lock: {e}")))?;
        }

        Ok(FileLock {
            _file: file,
            lock_path,
        })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}
