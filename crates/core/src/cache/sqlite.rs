//! SQLite-backed durable title store.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};

use crate::torrent::TorrentId;

use super::store::{CacheError, TitleStore};

/// Durable title store: one row per `(bucket, path)`, bucket existence is
/// the presence of any row with that bucket key.
pub struct SqliteTitleStore {
    conn: Mutex<Connection>,
}

impl SqliteTitleStore {
    /// Open (or create) the database file and its schema.
    pub fn new(path: &Path) -> Result<Self, CacheError> {
        let conn = Connection::open(path).map_err(|e| CacheError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory store, useful for testing.
    pub fn in_memory() -> Result<Self, CacheError> {
        let conn =
            Connection::open_in_memory().map_err(|e| CacheError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), CacheError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS media_titles (
                bucket TEXT NOT NULL,
                path TEXT NOT NULL,
                title TEXT NOT NULL,
                PRIMARY KEY (bucket, path)
            );

            CREATE INDEX IF NOT EXISTS idx_media_titles_bucket ON media_titles(bucket);
            "#,
        )
        .map_err(|e| CacheError::Database(e.to_string()))?;

        Ok(())
    }

    fn bucket_exists(conn: &Connection, id: &TorrentId) -> rusqlite::Result<bool> {
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM media_titles WHERE bucket = ?1)",
            params![id.as_str()],
            |row| row.get(0),
        )
    }
}

impl TitleStore for SqliteTitleStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn has_bucket(&self, id: &TorrentId) -> bool {
        let conn = match self.conn.lock() {
            Ok(conn) => conn,
            Err(_) => return false,
        };
        match Self::bucket_exists(&conn, id) {
            Ok(exists) => exists,
            Err(e) => {
                tracing::warn!(torrent = %id, "bucket existence check failed: {}", e);
                false
            }
        }
    }

    fn store_bucket(
        &self,
        id: &TorrentId,
        titles: &HashMap<String, String>,
    ) -> Result<(), CacheError> {
        if titles.is_empty() {
            return Ok(());
        }

        let mut conn = self.conn.lock().map_err(|_| CacheError::Unavailable)?;
        let tx = conn
            .transaction()
            .map_err(|e| CacheError::Database(e.to_string()))?;

        // First writer wins: the check runs inside the transaction so a
        // concurrent writer cannot interleave between check and insert.
        let exists =
            Self::bucket_exists(&tx, id).map_err(|e| CacheError::Database(e.to_string()))?;
        if exists {
            return Ok(());
        }

        {
            let mut stmt = tx
                .prepare("INSERT INTO media_titles (bucket, path, title) VALUES (?1, ?2, ?3)")
                .map_err(|e| CacheError::Database(e.to_string()))?;
            for (path, title) in titles {
                stmt.execute(params![id.as_str(), path, title])
                    .map_err(|e| CacheError::Database(e.to_string()))?;
            }
        }

        tx.commit().map_err(|e| CacheError::Database(e.to_string()))
    }

    fn lookup(&self, id: &TorrentId, path: &str) -> Option<String> {
        let conn = self.conn.lock().ok()?;
        match conn
            .query_row(
                "SELECT title FROM media_titles WHERE bucket = ?1 AND path = ?2",
                params![id.as_str(), path],
                |row| row.get(0),
            )
            .optional()
        {
            Ok(title) => title,
            Err(e) => {
                tracing::warn!(torrent = %id, "title lookup failed: {}", e);
                None
            }
        }
    }

    fn drop_bucket(&self, id: &TorrentId) -> Result<(), CacheError> {
        let conn = self.conn.lock().map_err(|_| CacheError::Unavailable)?;
        conn.execute(
            "DELETE FROM media_titles WHERE bucket = ?1",
            params![id.as_str()],
        )
        .map(|_| ())
        .map_err(|e| CacheError::Database(e.to_string()))
    }
}
