//! JSON value adapter over a raw [`KeyValueStore`].
//!
//! `set_item`/`get_item` log and swallow failures: a failed write looks like
//! success and a failed read looks like an absent key. Callers that must tell
//! the two apart use `try_set_item`/`try_get_item`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error};

use crate::{CoreError, KeyValueStore};

pub struct JsonStore<S: KeyValueStore> {
    raw: S,
}

impl<S: KeyValueStore> JsonStore<S> {
    pub fn new(raw: S) -> Self {
        Self { raw }
    }

    pub fn raw(&self) -> &S {
        &self.raw
    }

    /// Serialize `value` and store it under `key`, overwriting any prior value.
    pub async fn try_set_item<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<(), CoreError> {
        let text = serde_json::to_string(value)?;
        self.raw.set(key, text).await
    }

    /// `Ok(None)` when the key was never set.
    pub async fn try_get_item<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CoreError> {
        match self.raw.get(key).await? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => {
                debug!(key, "key not set");
                Ok(None)
            }
        }
    }

    pub async fn set_item<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(e) = self.try_set_item(key, value).await {
            error!(key, err = %e, "error setting item");
        }
    }

    pub async fn get_item<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.try_get_item(key).await {
            Ok(v) => v,
            Err(e) => {
                error!(key, err = %e, "error getting item");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory_store::InMemoryStore;
    use async_trait::async_trait;

    struct BrokenStore;

    #[async_trait]
    impl KeyValueStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, CoreError> {
            Err(CoreError::Storage("disk unavailable".into()))
        }

        async fn set(&self, _key: &str, _value: String) -> Result<(), CoreError> {
            Err(CoreError::Storage("disk unavailable".into()))
        }
    }

    #[tokio::test]
    async fn set_then_get_returns_value() {
        let store = JsonStore::new(InMemoryStore::new());
        store.set_item("nums", &vec![1, 2, 3]).await;
        let got: Option<Vec<i32>> = store.get_item("nums").await;
        assert_eq!(got, Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn set_overwrites_prior_value() {
        let store = JsonStore::new(InMemoryStore::new());
        store.set_item("k", "first").await;
        store.set_item("k", "second").await;
        let got: Option<String> = store.get_item("k").await;
        assert_eq!(got.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn unset_key_is_absent() {
        let store = JsonStore::new(InMemoryStore::new());
        let got: Option<Vec<i32>> = store.get_item("missing").await;
        assert!(got.is_none());
        let strict: Option<Vec<i32>> = store.try_get_item("missing").await.unwrap();
        assert!(strict.is_none());
    }

    #[tokio::test]
    async fn malformed_value_reads_as_absent_but_strict_read_fails() {
        let raw = InMemoryStore::new();
        raw.set("k", "{not json".into()).await.unwrap();
        let store = JsonStore::new(raw);
        let lenient: Option<Vec<i32>> = store.get_item("k").await;
        assert!(lenient.is_none());
        let strict = store.try_get_item::<Vec<i32>>("k").await;
        assert!(matches!(strict, Err(CoreError::Serialization(_))));
    }

    #[tokio::test]
    async fn io_failures_are_swallowed_by_lenient_calls() {
        let store = JsonStore::new(BrokenStore);
        store.set_item("k", &1).await;
        let got: Option<i32> = store.get_item("k").await;
        assert!(got.is_none());
        assert!(matches!(
            store.try_set_item("k", &1).await,
            Err(CoreError::Storage(_))
        ));
    }
}
