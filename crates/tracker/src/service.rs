//! Issue operations on top of a [`DocumentStore`].
//!
//! Every mutation is a read-modify-write of the whole project document.
//! Failures while locating or saving an issue are folded into a single
//! client-facing outcome per operation and logged at `warn`.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use tracker_core::{
    FilterParams, IdError, Issue, IssueUpdates, NewIssue, ObjectId, ValidationError, timestamp,
};
use tracker_query::{IssueQuery, QueryError};
use tracker_storage::{DocumentStore, StorageError};

/// Client-visible failures of the issue operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A create was missing a required field.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("missing _id")]
    MissingId,

    #[error("no update field(s) sent")]
    NoUpdateFields { id: String },

    #[error("could not update")]
    CouldNotUpdate { id: String },

    #[error("could not delete")]
    CouldNotDelete { id: String },

    /// A list filter could not be interpreted.
    #[error(transparent)]
    InvalidFilter(#[from] QueryError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ServiceError {
    /// The `_id` echoed back to the client, if the failure carries one.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::NoUpdateFields { id } | Self::CouldNotUpdate { id } | Self::CouldNotDelete { id } => {
                Some(id.as_str())
            }
            _ => None,
        }
    }
}

/// Why a targeted update or delete did not go through. Only ever logged.
#[derive(Debug, Error)]
enum Unresolved {
    #[error("project {0:?} does not exist")]
    NoProject(String),

    #[error("malformed id: {0}")]
    MalformedId(#[from] IdError),

    #[error("no issue {0} in project")]
    NoIssue(ObjectId),

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// The issue operations exposed over HTTP.
#[derive(Clone)]
pub struct IssueService {
    store: Arc<dyn DocumentStore>,
}

impl IssueService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Returns the issues of `project` matching every supplied filter, in
    /// insertion order. An unknown project yields an empty list.
    pub fn list(&self, project: &str, params: &FilterParams) -> Result<Vec<Issue>, ServiceError> {
        let query = IssueQuery::from_params(project, params)?;
        let document = self.store.find_project(project)?;
        let issues = query.run(document.as_ref());
        debug!(project, filters = ?query.fields(), count = issues.len(), "listed issues");
        Ok(issues)
    }

    /// Validates and appends a new issue, creating the project on first use.
    pub fn create(&self, project: &str, new: NewIssue) -> Result<Issue, ServiceError> {
        let issue = Issue::create(new)?;
        let mut document = self.store.find_or_create_project(project)?;
        document.push_issue(issue.clone());
        self.store.save_project(&document)?;
        info!(project, id = %issue.id, "created issue");
        Ok(issue)
    }

    /// Applies a partial update and returns the echoed id on success.
    pub fn update(
        &self,
        project: &str,
        id: Option<&str>,
        updates: &IssueUpdates,
    ) -> Result<String, ServiceError> {
        let id = id.filter(|s| !s.is_empty()).ok_or(ServiceError::MissingId)?;
        if !updates.has_changes() {
            return Err(ServiceError::NoUpdateFields { id: id.to_string() });
        }

        match self.try_update(project, id, updates) {
            Ok(()) => {
                info!(project, id, "updated issue");
                Ok(id.to_string())
            }
            Err(reason) => {
                warn!(project, id, %reason, "update failed");
                Err(ServiceError::CouldNotUpdate { id: id.to_string() })
            }
        }
    }

    /// Removes an issue and returns the echoed id on success.
    pub fn delete(&self, project: &str, id: Option<&str>) -> Result<String, ServiceError> {
        let id = id.filter(|s| !s.is_empty()).ok_or(ServiceError::MissingId)?;

        match self.try_delete(project, id) {
            Ok(()) => {
                info!(project, id, "deleted issue");
                Ok(id.to_string())
            }
            Err(reason) => {
                warn!(project, id, %reason, "delete failed");
                Err(ServiceError::CouldNotDelete { id: id.to_string() })
            }
        }
    }

    fn try_update(&self, project: &str, raw_id: &str, updates: &IssueUpdates) -> Result<(), Unresolved> {
        let mut document = self
            .store
            .find_project(project)?
            .ok_or_else(|| Unresolved::NoProject(project.to_string()))?;
        let id = ObjectId::parse_str(raw_id)?;
        let issue = document.issue_mut(&id).ok_or(Unresolved::NoIssue(id))?;
        updates.apply(issue, timestamp::now())?;
        self.store.save_project(&document)?;
        Ok(())
    }

    fn try_delete(&self, project: &str, raw_id: &str) -> Result<(), Unresolved> {
        let mut document = self
            .store
            .find_project(project)?
            .ok_or_else(|| Unresolved::NoProject(project.to_string()))?;
        let id = ObjectId::parse_str(raw_id)?;
        document.remove_issue(&id).ok_or(Unresolved::NoIssue(id))?;
        self.store.save_project(&document)?;
        Ok(())
    }
}

impl std::fmt::Debug for IssueService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssueService").finish_non_exhaustive()
    }
}
