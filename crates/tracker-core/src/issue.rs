//! Issue struct -- the unit of tracked work embedded in a project.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::ObjectId;
use crate::timestamp;
use crate::validation::{ValidationError, validate_new_issue};

fn default_open() -> bool {
    true
}

/// A tracked issue.
///
/// Field order matches the JSON shape clients receive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub issue_title: String,
    pub issue_text: String,
    pub created_by: String,

    #[serde(default)]
    pub assigned_to: String,

    #[serde(default)]
    pub status_text: String,

    #[serde(default = "default_open")]
    pub open: bool,

    #[serde(with = "timestamp::iso_millis")]
    pub created_on: DateTime<Utc>,

    #[serde(with = "timestamp::iso_millis")]
    pub updated_on: DateTime<Utc>,
}

impl Issue {
    /// Validates a submission and turns it into a fresh issue with a new
    /// identifier and both timestamps set to now.
    pub fn create(new: NewIssue) -> Result<Self, ValidationError> {
        validate_new_issue(&new)?;
        let now = timestamp::now();

        Ok(Self {
            id: ObjectId::new(),
            issue_title: new.issue_title.unwrap_or_default(),
            issue_text: new.issue_text.unwrap_or_default(),
            created_by: new.created_by.unwrap_or_default(),
            assigned_to: new.assigned_to.unwrap_or_default(),
            status_text: new.status_text.unwrap_or_default(),
            open: true,
            created_on: now,
            updated_on: now,
        })
    }
}

/// Fields a client may supply when creating an issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewIssue {
    #[serde(default)]
    pub issue_title: Option<String>,
    #[serde(default)]
    pub issue_text: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub status_text: Option<String>,
}

/// Builder for constructing [`Issue`] instances directly, bypassing
/// submission validation. Mostly useful in tests and fixtures.
#[derive(Debug, Clone)]
pub struct IssueBuilder {
    issue: Issue,
}

impl IssueBuilder {
    /// Creates a new builder with the given title; text and creator start
    /// out empty.
    pub fn new(title: impl Into<String>) -> Self {
        let now = timestamp::now();
        Self {
            issue: Issue {
                id: ObjectId::new(),
                issue_title: title.into(),
                issue_text: String::new(),
                created_by: String::new(),
                assigned_to: String::new(),
                status_text: String::new(),
                open: true,
                created_on: now,
                updated_on: now,
            },
        }
    }

    pub fn id(mut self, id: ObjectId) -> Self {
        self.issue.id = id;
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.issue.issue_text = text.into();
        self
    }

    pub fn created_by(mut self, created_by: impl Into<String>) -> Self {
        self.issue.created_by = created_by.into();
        self
    }

    pub fn assigned_to(mut self, assigned_to: impl Into<String>) -> Self {
        self.issue.assigned_to = assigned_to.into();
        self
    }

    pub fn status_text(mut self, status_text: impl Into<String>) -> Self {
        self.issue.status_text = status_text.into();
        self
    }

    pub fn open(mut self, open: bool) -> Self {
        self.issue.open = open;
        self
    }

    /// Sets both `created_on` and `updated_on`.
    pub fn timestamps(mut self, at: DateTime<Utc>) -> Self {
        self.issue.created_on = at;
        self.issue.updated_on = at;
        self
    }

    pub fn build(self) -> Issue {
        self.issue
    }
}
