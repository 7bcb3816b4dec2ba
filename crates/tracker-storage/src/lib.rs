//! Document store for the issue tracker.
//!
//! Provides the [`DocumentStore`] trait plus a SQLite implementation
//! ([`SqliteStore`]) and an in-process one ([`MemoryStore`]). Both persist a
//! [`Project`](tracker_core::Project) as one JSON document, written
//! atomically as a whole.

pub mod error;
pub mod memory;
pub mod sqlite;
pub mod traits;

// Re-exports for convenience.
pub use error::{Result, StorageError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::DocumentStore;

// ---------------------------------------------------------------------------
// DocumentStore for SqliteStore
// ---------------------------------------------------------------------------

use tracker_core::Project;

impl DocumentStore for SqliteStore {
    fn find_project(&self, name: &str) -> Result<Option<Project>> {
        self.find_project_impl(name)
    }

    fn save_project(&self, project: &Project) -> Result<()> {
        self.save_project_impl(project)
    }

    fn project_names(&self) -> Result<Vec<String>> {
        self.project_names_impl()
    }

    fn close(&self) -> Result<()> {
        // Checkpoint the WAL so the file is self-contained; the connection
        // itself closes on drop.
        let conn = self.lock_conn()?;
        conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))?;
        Ok(())
    }
}
