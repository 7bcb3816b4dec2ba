//! [`MemoryStore`] -- an in-process document store.
//!
//! Documents are kept serialized, so callers never share state with the
//! store: every read hands out a fresh copy, exactly like a database would.

use std::sync::{Mutex, MutexGuard};

use tracing::debug;
use tracker_core::Project;

use crate::error::{Result, StorageError};
use crate::traits::DocumentStore;

/// Mutex-guarded list of `(name, json)` pairs in creation order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<Vec<(String, String)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<(String, String)>>> {
        self.documents
            .lock()
            .map_err(|e| StorageError::Internal(format!("mutex poisoned: {e}")))
    }
}

impl DocumentStore for MemoryStore {
    fn find_project(&self, name: &str) -> Result<Option<Project>> {
        let docs = self.lock()?;
        docs.iter()
            .find(|(n, _)| n == name)
            .map(|(_, doc)| serde_json::from_str(doc).map_err(StorageError::from))
            .transpose()
    }

    fn save_project(&self, project: &Project) -> Result<()> {
        let doc = serde_json::to_string(project)?;
        let mut docs = self.lock()?;
        match docs.iter_mut().find(|(n, _)| *n == project.name) {
            Some(slot) => slot.1 = doc,
            None => docs.push((project.name.clone(), doc)),
        }
        debug!(name = %project.name, issues = project.issues.len(), "saved project");
        Ok(())
    }

    fn project_names(&self) -> Result<Vec<String>> {
        Ok(self.lock()?.iter().map(|(n, _)| n.clone()).collect())
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }
}
