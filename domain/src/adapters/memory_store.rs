use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::{CoreError, KeyValueStore};

/// In-memory key-value store. Data is lost when the process exits.
pub struct InMemoryStore {
    inner: Mutex<BTreeMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(BTreeMap::new()),
        }
    }

    /// Number of keys currently held.
    pub fn len(&self) -> Result<usize, CoreError> {
        let map = self
            .inner
            .lock()
            .map_err(|_| CoreError::Storage("mutex poisoned".into()))?;
        Ok(map.len())
    }

    pub fn is_empty(&self) -> Result<bool, CoreError> {
        Ok(self.len()? == 0)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let map = self
            .inner
            .lock()
            .map_err(|_| CoreError::Storage("mutex poisoned".into()))?;
        Ok(map.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), CoreError> {
        let mut map = self
            .inner
            .lock()
            .map_err(|_| CoreError::Storage("mutex poisoned".into()))?;
        map.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_roundtrip() {
        let store = InMemoryStore::new();
        store.set("restaurants", "[]".into()).await.unwrap();
        let got = store.get("restaurants").await.unwrap();
        assert_eq!(got.as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn set_overwrites_existing_key() {
        let store = InMemoryStore::new();
        store.set("k", "a".into()).await.unwrap();
        store.set("k", "b".into()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("b"));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn missing_key_is_none() {
        let store = InMemoryStore::new();
        assert!(store.get("nope").await.unwrap().is_none());
        assert!(store.is_empty().unwrap());
    }
}
