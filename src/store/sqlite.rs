use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::path::Path;

use super::{Store, StoreError};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS collections (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;

/// Collection store backed by SQLite
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open or create the database
    pub fn open(db_path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(db_path).map_err(map_error)?;
        conn.execute_batch(SCHEMA).map_err(map_error)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing)
    #[allow(dead_code)]
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(map_error)?;
        conn.execute_batch(SCHEMA).map_err(map_error)?;
        Ok(Self { conn })
    }
}

impl Store for SqliteStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.conn
            .query_row(
                "SELECT value FROM collections WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(map_error)
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let now = chrono::Utc::now().to_rfc3339();

        self.conn
            .execute(
                "INSERT INTO collections (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value, now],
            )
            .map_err(|e| match e.sqlite_error_code() {
                Some(ErrorCode::DiskFull) | Some(ErrorCode::TooBig) => StoreError::QuotaExceeded {
                    key: key.to_string(),
                    bytes: value.len(),
                },
                _ => map_error(e),
            })?;

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM collections WHERE key = ?1", params![key])
            .map_err(map_error)?;
        Ok(())
    }
}

fn map_error(e: rusqlite::Error) -> StoreError {
    StoreError::Unavailable(e.to_string())
}
