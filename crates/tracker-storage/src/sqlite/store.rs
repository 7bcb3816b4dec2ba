//! [`SqliteStore`] -- SQLite-backed document store.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info};

use crate::error::{Result, StorageError};
use crate::sqlite::schema;

/// SQLite-backed implementation of the
/// [`DocumentStore`](crate::traits::DocumentStore) trait.
///
/// One connection behind a `Mutex`; every operation holds the lock for the
/// duration of a single statement.
pub struct SqliteStore {
    pub(crate) conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "opening project database");
        let conn = Connection::open(path)
            .map_err(|e| StorageError::Connection(format!("{}: {e}", path.display())))?;
        Self::with_connection(conn)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        debug!("opening in-memory project database");
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("in-memory database: {e}")))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        // In-memory databases report "memory" and ignore WAL.
        let mode: String = conn
            .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))
            .map_err(|e| StorageError::Connection(format!("journal mode: {e}")))?;
        conn.busy_timeout(std::time::Duration::from_secs(5))
            .map_err(|e| StorageError::Connection(format!("busy timeout: {e}")))?;
        debug!(journal_mode = %mode, "connection configured");

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Applies the DDL unless the recorded schema version is current.
    fn init_schema(&self) -> Result<()> {
        let conn = self.lock_conn()?;

        if let Some(version) = recorded_version(&conn) {
            if version >= schema::CURRENT_SCHEMA_VERSION {
                debug!(version, "schema up to date");
                return Ok(());
            }
        }

        for stmt in schema::SCHEMA_STATEMENTS {
            conn.execute_batch(stmt).map_err(|e| StorageError::Migration {
                name: "init_schema".into(),
                reason: format!("{e} in `{}`", truncate(stmt.trim(), 60)),
            })?;
        }
        conn.execute(
            "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?1)",
            params![schema::CURRENT_SCHEMA_VERSION.to_string()],
        )
        .map_err(|e| StorageError::Migration {
            name: "schema_version".into(),
            reason: e.to_string(),
        })?;

        info!(version = schema::CURRENT_SCHEMA_VERSION, "schema initialized");
        Ok(())
    }

    pub(crate) fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StorageError::Connection(format!("mutex poisoned: {e}")))
    }
}

/// Reads the schema version, treating a missing table or row as `None`.
fn recorded_version(conn: &Connection) -> Option<i32> {
    conn.query_row(
        "SELECT value FROM metadata WHERE key = 'schema_version'",
        [],
        |row| row.get::<_, String>(0),
    )
    .optional()
    .ok()
    .flatten()
    .and_then(|v| v.parse().ok())
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").finish_non_exhaustive()
    }
}

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
