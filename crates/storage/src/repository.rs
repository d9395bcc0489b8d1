use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("write rejected: {0}")]
    Rejected(String),
}

/// Named text slots that survive restarts.
///
/// Values are opaque to the store; callers decide the encoding.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value held in a slot.
    ///
    /// Returns `Ok(None)` when the slot was never written.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value held in a slot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a slot. Removing a missing slot is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Simple in-memory store for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Seed a slot directly, bypassing the async API.
    #[must_use]
    pub fn with_slot(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let Ok(mut guard) = self.slots.lock() {
            guard.insert(key.into(), value.into());
        }
        self
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

/// Aggregates the slot store behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub slots: Arc<dyn KeyValueStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let slots: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
        Self { slots }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_slot_reads_as_none() {
        let store = InMemoryStore::new();
        assert_eq!(store.get("progress").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_overwrites_and_remove_clears() {
        let store = InMemoryStore::new();
        store.set("progress", "{}").await.unwrap();
        store.set("progress", r#"{"css":{"1":true}}"#).await.unwrap();
        assert_eq!(
            store.get("progress").await.unwrap().as_deref(),
            Some(r#"{"css":{"1":true}}"#)
        );

        store.remove("progress").await.unwrap();
        store.remove("progress").await.unwrap();
        assert_eq!(store.get("progress").await.unwrap(), None);
    }

    #[tokio::test]
    async fn clones_share_slots() {
        let store = InMemoryStore::new().with_slot("a", "1");
        let other = store.clone();
        other.set("b", "2").await.unwrap();
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("1"));
        assert_eq!(store.get("b").await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn storage_in_memory_is_usable_through_trait_object() {
        let storage = Storage::in_memory();
        storage.slots.set("k", "v").await.unwrap();
        assert_eq!(storage.slots.get("k").await.unwrap().as_deref(), Some("v"));
    }
}
