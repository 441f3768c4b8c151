//! Durable store for hide entries and daemon settings.
//!
//! Two tables: `hidelist(package_name, process)` with one row per hidden
//! (package, process) pair, and a generic `settings(key, value)` row store
//! used for the enabled flag.

use rusqlite::{params, Connection};
use std::path::Path;

/// Settings key for the persisted "feature enabled" flag.
pub const ENABLED_KEY: &str = "hide_enabled";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct HideStore {
    conn: Connection,
}

impl HideStore {
    /// Open (creating if needed) the store at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// In-memory store, used by tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    fn init_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS hidelist (
                package_name TEXT NOT NULL,
                process TEXT NOT NULL,
                PRIMARY KEY (package_name, process)
            )",
            [],
        )?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value INTEGER NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Bulk scan of all persisted hide entries.
    pub fn load_all(&self) -> Result<Vec<(String, String)>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT package_name, process FROM hidelist")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    pub fn insert(&self, pkg: &str, proc: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR IGNORE INTO hidelist (package_name, process) VALUES (?1, ?2)",
            params![pkg, proc],
        )?;
        Ok(())
    }

    /// Delete one (package, process) row.
    pub fn remove_process(&self, pkg: &str, proc: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "DELETE FROM hidelist WHERE package_name = ?1 AND process = ?2",
            params![pkg, proc],
        )?;
        Ok(())
    }

    /// Delete every row of a package.
    pub fn remove_package(&self, pkg: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "DELETE FROM hidelist WHERE package_name = ?1",
            params![pkg],
        )?;
        Ok(())
    }

    pub fn set_flag(&self, key: &str, value: bool) -> Result<(), StoreError> {
        self.conn.execute(
            "REPLACE INTO settings (key, value) VALUES (?1, ?2)",
            params![key, value as i64],
        )?;
        Ok(())
    }

    pub fn get_flag(&self, key: &str) -> Result<bool, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM settings WHERE key = ?1")?;
        let mut rows = stmt.query(params![key])?;
        if let Some(row) = rows.next()? {
            let value: i64 = row.get(0)?;
            Ok(value != 0)
        } else {
            Ok(false)
        }
    }
}
