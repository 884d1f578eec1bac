//! Database connection management
//!
//! The pipeline only needs a way to obtain a connection; `StorageConnector`
//! is that capability. `SqliteConnector` is the production implementation.

use crate::errors::{from_rusqlite, Result};
use roster_core::errors::RosterErrorKind;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How long a writer waits on a lock held by an overlapping run
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Capability to open a storage connection
///
/// The returned connection is owned by the caller and closed on drop.
pub trait StorageConnector {
    fn connect(&self) -> Result<Connection>;

    /// Human-readable target for logs
    fn describe(&self) -> String;
}

/// Connector for a SQLite database file
#[derive(Debug, Clone)]
pub struct SqliteConnector {
    path: PathBuf,
}

impl SqliteConnector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageConnector for SqliteConnector {
    fn connect(&self) -> Result<Connection> {
        let conn = open(&self.path)?;
        configure(&conn)?;
        Ok(conn)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path)
        .map_err(|e| from_rusqlite(RosterErrorKind::ConnectionFailure, "db_open", e))
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory()
        .map_err(|e| from_rusqlite(RosterErrorKind::ConnectionFailure, "db_open", e))
}

/// Configure a connection for pipeline use
///
/// WAL lets a load run alongside readers; the busy timeout makes an
/// overlapping writer wait instead of failing immediately.
pub fn configure(conn: &Connection) -> Result<()> {
    conn.busy_timeout(BUSY_TIMEOUT)
        .map_err(|e| from_rusqlite(RosterErrorKind::ConnectionFailure, "db_configure", e))?;

    conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))
        .map_err(|e| from_rusqlite(RosterErrorKind::ConnectionFailure, "db_configure", e))?;

    Ok(())
}
