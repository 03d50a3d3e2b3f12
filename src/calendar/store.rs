use std::fs;
use std::path::Path;

use rusqlite::{params, Connection};

use super::event::Event;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("cannot create database directory: {0}")]
    Io(#[from] std::io::Error),
}

/// Persistence for newly created events.
///
/// Implementations run off the UI thread, hence `Send`.
pub trait EventStore: Send + 'static {
    /// Store `event` and return the id assigned to it.
    fn insert(&mut self, event: &Event) -> Result<i64, StoreError>;
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        tracing::debug!(path = %path.display(), "event store opened");
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                start_ts INTEGER NOT NULL,
                end_ts INTEGER NOT NULL,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT ''
            )",
            [],
        )?;
        Ok(())
    }
}

impl EventStore for SqliteStore {
    fn insert(&mut self, event: &Event) -> Result<i64, StoreError> {
        self.conn.execute(
            "INSERT INTO events (start_ts, end_ts, title, description) VALUES (?1, ?2, ?3, ?4)",
            params![event.start, event.end, &event.title, &event.description],
        )?;
        Ok(self.conn.last_insert_rowid())
    }
}
