//! SQLite-backed key/value mirror of the job collection and settings.
//!
//! Schema:
//! - `kv` table: key (TEXT PRIMARY KEY), value (JSON TEXT)
//!
//! Each key holds one whole JSON document. Saving replaces the document in a
//! single statement, so readers never observe a partial write.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// Key of the JobRecord array
pub const JOBS_KEY: &str = "job_tracker_data_v1";
/// Key of the Settings object
pub const SETTINGS_KEY: &str = "job_tracker_settings";

/// Local key/value storage
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open (or create) the database file at `path`
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Open a throwaway in-memory database
    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL
            );",
        )?;
        Ok(Storage { conn })
    }

    /// Read and parse the document under `key`. Missing keys yield `None`.
    pub fn load_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let raw: Option<String> = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;

        match raw {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    /// Replace the document under `key`
    pub fn save_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let text = serde_json::to_string(value)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, text],
        )?;
        Ok(())
    }
}
