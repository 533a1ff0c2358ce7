//! Durable medium trait.

use crate::error::Result;
use async_trait::async_trait;

/// Best-effort key/value storage that outlives the process.
///
/// Implementations may be entirely unavailable (read-only disk, disabled
/// storage). The profile store treats every error as non-fatal.
#[async_trait]
pub trait DurableMedium: Send + Sync {
    /// Returns the raw text stored under `key`, or `None` if nothing is stored.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Removes every key.
    async fn clear(&self) -> Result<()>;
}
