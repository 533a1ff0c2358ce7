//! In-process media: a map for tests and ephemeral profiles, and a medium
//! that is never available.

use amigo_core::error::{AmigoError, Result};
use amigo_core::store::DurableMedium;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Keeps values in memory only. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryMedium {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            entries: RwLock::new(entries),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl DurableMedium for MemoryMedium {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.entries.write().await.clear();
        Ok(())
    }
}

/// Rejects every operation, like storage disabled by the platform.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableMedium;

#[async_trait]
impl DurableMedium for UnavailableMedium {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Err(AmigoError::persistence_unavailable(key, "storage disabled"))
    }

    async fn set(&self, key: &str, _value: String) -> Result<()> {
        Err(AmigoError::persistence_unavailable(key, "storage disabled"))
    }

    async fn clear(&self) -> Result<()> {
        Err(AmigoError::persistence_unavailable("*", "storage disabled"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_medium() {
        let medium = MemoryMedium::with_entries([("language", "\"mk\"")]);
        assert_eq!(medium.get("language").await.unwrap().as_deref(), Some("\"mk\""));
        medium.set("userName", "\"Ana\"".into()).await.unwrap();
        assert_eq!(medium.len().await, 2);
        medium.clear().await.unwrap();
        assert!(medium.get("language").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unavailable_medium() {
        let err = UnavailableMedium.get("language").await.unwrap_err();
        assert!(err.is_persistence_unavailable());
        assert!(UnavailableMedium.clear().await.is_err());
    }
}
