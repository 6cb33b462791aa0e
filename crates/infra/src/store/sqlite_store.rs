//! SQLite-backed shared state store.
//!
//! Implements `SharedStateStore` over the `shared_state` table with upsert
//! semantics. All database operations run in `spawn_blocking` to avoid
//! blocking the async runtime.

use std::sync::Arc;

use async_trait::async_trait;
use burner_core::SharedStateStore;
use burner_domain::Result as DomainResult;
use rusqlite::{params, Connection, OptionalExtension};
use tokio::task;

use super::manager::StoreManager;
use crate::errors::{map_join_error, map_sql_error};

/// SQLite-backed shared state store.
pub struct SqliteSharedStore {
    db: Arc<StoreManager>,
}

impl SqliteSharedStore {
    pub fn new(db: Arc<StoreManager>) -> Self {
        Self { db }
    }

    /// Every key currently stored, ordered by key.
    pub async fn keys(&self) -> DomainResult<Vec<String>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<String>> {
            let conn = db.get_connection()?;
            query_keys(&conn).map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl SharedStateStore for SqliteSharedStore {
    async fn get(&self, key: &str) -> DomainResult<Option<String>> {
        let db = Arc::clone(&self.db);
        let key = key.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<String>> {
            let conn = db.get_connection()?;
            query_value(&conn, &key).map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn set(&self, key: &str, value: &str) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let key = key.to_string();
        let value = value.to_string();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            upsert_value(&conn, &key, &value).map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn remove(&self, key: &str) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let key = key.to_string();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            delete_value(&conn, &key).map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

// ============================================================================
// Synchronous SQL operations (called inside spawn_blocking)
// ============================================================================

fn query_value(conn: &Connection, key: &str) -> rusqlite::Result<Option<String>> {
    conn.query_row("SELECT value FROM shared_state WHERE key = ?1", params![key], |row| row.get(0))
        .optional()
}

fn upsert_value(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<()> {
    let now = chrono::Utc::now().timestamp();
    conn.execute(
        "INSERT INTO shared_state (key, value, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![key, value, now],
    )?;
    Ok(())
}

fn delete_value(conn: &Connection, key: &str) -> rusqlite::Result<()> {
    conn.execute("DELETE FROM shared_state WHERE key = ?1", params![key])?;
    Ok(())
}

fn query_keys(conn: &Connection) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT key FROM shared_state ORDER BY key")?;
    let rows = stmt.query_map([], |row| row.get(0))?;
    rows.collect()
}
