//! The [`DocumentStore`] trait -- the public API for project persistence.
//!
//! Consumers depend on this trait rather than on a concrete backend so that
//! alternatives (in-memory, mocks) can be injected.

use tracker_core::Project;

use crate::error::Result;

/// Whole-document persistence for [`Project`]s, keyed by project name.
///
/// Writes replace the entire document atomically. There is no optimistic
/// concurrency check: concurrent read-modify-write cycles on the same
/// project are last-write-wins.
pub trait DocumentStore: Send + Sync {
    /// Looks up a project by exact name.
    fn find_project(&self, name: &str) -> Result<Option<Project>>;

    /// Inserts or replaces the project document with the same name.
    fn save_project(&self, project: &Project) -> Result<()>;

    /// Returns all project names in creation order.
    fn project_names(&self) -> Result<Vec<String>>;

    /// Releases backend resources.
    fn close(&self) -> Result<()>;

    /// Returns the named project, or a fresh empty one if it does not exist
    /// yet. A fresh project is not persisted until it is saved.
    fn find_or_create_project(&self, name: &str) -> Result<Project> {
        Ok(self
            .find_project(name)?
            .unwrap_or_else(|| Project::new(name)))
    }
}
