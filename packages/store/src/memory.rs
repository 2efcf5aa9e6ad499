use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::kv::{KeyValueStore, StoreError};

/// In-memory KeyValueStore for testing and native fallback.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // Poisoning cannot leave the map half-updated.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = MemoryStore::new();

        // Initially empty
        assert!(store.is_empty());
        assert!(store.get("users").await.is_none());

        store.set("users", "[]").await.unwrap();
        assert_eq!(store.get("users").await.as_deref(), Some("[]"));
        assert_eq!(store.len(), 1);

        // Overwrite
        store.set("users", "[1]").await.unwrap();
        assert_eq!(store.get("users").await.as_deref(), Some("[1]"));

        store.remove("users").await.unwrap();
        assert!(store.get("users").await.is_none());
    }

    #[tokio::test]
    async fn test_remove_missing_key_is_ok() {
        let store = MemoryStore::new();
        store.remove("currentUser").await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryStore::new();
        let other = store.clone();

        store.set("currentUser", "{}").await.unwrap();
        assert_eq!(other.get("currentUser").await.as_deref(), Some("{}"));
    }
}
