//! Database connection management
//!
//! One SQLite connection is shared by every repository and the job queue
//! through [`SharedConnection`]; callers lock it per statement group.

use crate::errors::{from_rusqlite, io_error, lock_poisoned, Result};
use crate::jobs::SqliteJobQueue;
use crate::migrations::apply_migrations;
use crate::repo::{SqliteBlockRepository, SqlitePageRepository};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

pub type SharedConnection = Arc<Mutex<Connection>>;

/// Open a SQLite database at the given path
///
/// # Errors
///
/// Returns `Persistence` if the file cannot be opened.
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(from_rusqlite)
}

/// Open an in-memory SQLite database (for testing)
///
/// # Errors
///
/// Returns `Persistence` if SQLite cannot allocate the database.
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}

/// Enable foreign keys (needed for block cascade) and WAL journaling
///
/// # Errors
///
/// Returns `Persistence` if a pragma fails.
pub fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA journal_mode = WAL;")
        .map_err(from_rusqlite)
}

/// Lock a shared connection, mapping poisoning to `Persistence`
///
/// # Errors
///
/// Returns `Persistence` if a previous holder panicked.
pub fn lock<'a>(conn: &'a SharedConnection, op: &str) -> Result<MutexGuard<'a, Connection>> {
    conn.lock().map_err(|_| lock_poisoned(op))
}

/// A configured, migrated database and the handles built on it
#[derive(Clone)]
pub struct SqliteStore {
    conn: SharedConnection,
}

impl SqliteStore {
    /// Open (creating parent directories as needed), configure and migrate
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the directory, connection or migrations fail.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| io_error("create_db_dir", e))?;
        }
        Self::from_connection(open(path)?)
    }

    /// # Errors
    ///
    /// Returns `Persistence` if configuration or migrations fail.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(open_in_memory()?)
    }

    fn from_connection(mut conn: Connection) -> Result<Self> {
        configure(&conn)?;
        apply_migrations(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn connection(&self) -> SharedConnection {
        Arc::clone(&self.conn)
    }

    pub fn pages(&self) -> SqlitePageRepository {
        SqlitePageRepository::new(self.connection())
    }

    pub fn blocks(&self) -> SqliteBlockRepository {
        SqliteBlockRepository::new(self.connection())
    }

    pub fn jobs(&self) -> SqliteJobQueue {
        SqliteJobQueue::new(self.connection())
    }
}
