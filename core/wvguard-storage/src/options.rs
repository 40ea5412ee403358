//! Persistent option storage backed by SQLite.

use crate::error::{StorageError, StorageResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;
use wvguard_license::{LicenseResult, OptionStore};

/// Option store backed by a SQLite file.
#[derive(Clone)]
pub struct SqliteOptions {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteOptions {
    /// Opens (or creates) an options database at the given path.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "Opened options database");
        Self::with_connection(conn)
    }

    /// Opens an in-memory options database (for testing).
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StorageResult<Self> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS options (
                option_name TEXT PRIMARY KEY,
                option_value TEXT NOT NULL
            );
            ",
        )?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn conn(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    /// Reads an option.
    pub fn get(&self, name: &str) -> StorageResult<Option<String>> {
        let conn = self.conn()?;
        let value = conn
            .query_row(
                "SELECT option_value FROM options WHERE option_name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Creates or replaces an option.
    pub fn set(&self, name: &str, value: &str) -> StorageResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO options (option_name, option_value) VALUES (?1, ?2)
             ON CONFLICT(option_name) DO UPDATE SET option_value = excluded.option_value",
            params![name, value],
        )?;
        Ok(())
    }

    /// Removes an option; removing a missing option is a no-op.
    pub fn delete(&self, name: &str) -> StorageResult<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM options WHERE option_name = ?1", params![name])?;
        Ok(())
    }
}

impl OptionStore for SqliteOptions {
    fn get_option(&self, name: &str) -> LicenseResult<Option<String>> {
        Ok(self.get(name)?)
    }

    fn update_option(&self, name: &str, value: &str) -> LicenseResult<()> {
        Ok(self.set(name, value)?)
    }

    fn delete_option(&self, name: &str) -> LicenseResult<()> {
        Ok(self.delete(name)?)
    }
}

impl std::fmt::Debug for SqliteOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteOptions").finish_non_exhaustive()
    }
}
