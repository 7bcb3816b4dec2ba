//! Project document operations for [`SqliteStore`].

use rusqlite::{OptionalExtension, params};
use tracing::debug;

use tracker_core::Project;
use tracker_core::timestamp;

use crate::error::Result;
use crate::sqlite::store::SqliteStore;

impl SqliteStore {
    /// Loads and decodes the project document with the given name.
    pub fn find_project_impl(&self, name: &str) -> Result<Option<Project>> {
        let conn = self.lock_conn()?;
        let document: Option<String> = conn
            .query_row(
                "SELECT document FROM projects WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;

        match document {
            Some(doc) => {
                let project: Project = serde_json::from_str(&doc)?;
                debug!(name, issues = project.issues.len(), "loaded project");
                Ok(Some(project))
            }
            None => {
                debug!(name, "project not found");
                Ok(None)
            }
        }
    }

    /// Writes the whole document in a single statement.
    pub fn save_project_impl(&self, project: &Project) -> Result<()> {
        let document = serde_json::to_string(project)?;
        let now = timestamp::format(&timestamp::now());

        let conn = self.lock_conn()?;
        conn.execute(
            "INSERT INTO projects (name, document, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3)
             ON CONFLICT(name) DO UPDATE SET
                document = excluded.document,
                updated_at = excluded.updated_at",
            params![project.name, document, now],
        )?;

        debug!(name = %project.name, issues = project.issues.len(), "saved project");
        Ok(())
    }

    /// Lists project names in creation order.
    pub fn project_names_impl(&self) -> Result<Vec<String>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare("SELECT name FROM projects ORDER BY seq ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut names = Vec::new();
        for row in rows {
            names.push(row?);
        }
        Ok(names)
    }
}
