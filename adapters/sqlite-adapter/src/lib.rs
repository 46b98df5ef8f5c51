//! SQLite implementation of the `KeyValueStore` port.
//!
//! Purpose
//! - Durable, file-based storage for the restaurant collection so data
//!   survives process restarts.
//! - One row per key in `kv_store`; values are opaque JSON text written by
//!   the domain's `JsonStore`.
//!
//! Notes
//! - Uses `rusqlite` with the `bundled` feature for portability.
//! - Blocking SQLite calls run on tokio's blocking pool.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use domain::{CoreError, KeyValueStore};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

/// SQLite-backed key-value store.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) a SQLite database at the given path and ensure schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, CoreError> {
        let conn = Connection::open(path).map_err(map_sqerr)?;
        init_schema(&conn)?;
        Ok(Self { conn: Arc::new(Mutex::new(conn)) })
    }

    /// Open at `path`, creating missing parent directories first.
    pub fn open_creating_dirs<P: AsRef<Path>>(path: P) -> Result<Self, CoreError> {
        if let Some(dir) = path.as_ref().parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)
                    .map_err(|e| CoreError::Storage(format!("create {}: {e}", dir.display())))?;
            }
        }
        Self::new(path)
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T, CoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, CoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|_| CoreError::Storage("mutex poisoned".into()))?;
            f(&conn)
        })
        .await
        .map_err(|e| CoreError::Storage(format!("sqlite task failed: {e}")))?
    }
}

fn init_schema(conn: &Connection) -> Result<(), CoreError> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        "#
    ).map_err(map_sqerr)?;
    Ok(())
}

fn map_sqerr<E: std::fmt::Display>(e: E) -> CoreError { CoreError::Storage(format!("sqlite error: {e}")) }

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let key = key.to_string();
        self.with_conn(move |conn| {
            conn.query_row("SELECT value FROM kv_store WHERE key = ?1", params![key], |row| row.get::<_, String>(0))
                .optional()
                .map_err(map_sqerr)
        })
        .await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), CoreError> {
        let key = key.to_string();
        let len = value.len();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO kv_store(key, value) VALUES (?1, ?2) ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            ).map_err(map_sqerr)?;
            debug!(key = %key, bytes = len, "kv value written");
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::repository::RestaurantRepository;
    use domain::{Location, Restaurant, RestaurantId};

    fn tmp_db() -> (SqliteStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.db");
        let store = SqliteStore::new(path).unwrap();
        (store, dir)
    }

    fn mk(id: &str) -> Restaurant {
        Restaurant {
            id: RestaurantId::new(id).unwrap(),
            name: "Cafe".into(),
            address: "1 Main St".into(),
            phones: vec!["555-0100".into()],
            description: String::new(),
            tags: vec!["coffee".into()],
            rating: 4.5,
            location: Location::new(59.91, 10.75),
        }
    }

    #[tokio::test]
    async fn set_get_roundtrip() {
        let (store, _dir) = tmp_db();
        store.set("restaurants", "[]".into()).await.unwrap();
        assert_eq!(store.get("restaurants").await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn set_overwrites() {
        let (store, _dir) = tmp_db();
        store.set("k", "one".into()).await.unwrap();
        store.set("k", "two".into()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("two"));
    }

    #[tokio::test]
    async fn missing_key_is_none() {
        let (store, _dir) = tmp_db();
        assert!(store.get("nothing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn collection_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("directory.db");
        {
            let repo = RestaurantRepository::new(SqliteStore::open_creating_dirs(&path).unwrap());
            repo.initialize().await.unwrap();
            repo.add(mk("a1")).await.unwrap();
            repo.add(mk("b2")).await.unwrap();
            repo.delete(&RestaurantId::new("b2").unwrap()).await.unwrap();
        }
        let repo = RestaurantRepository::new(SqliteStore::new(&path).unwrap());
        let all = repo.list().await.unwrap();
        assert_eq!(all, vec![mk("a1")]);
    }
}
