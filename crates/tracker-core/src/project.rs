//! Project document -- a named, ordered collection of embedded issues.

use serde::{Deserialize, Serialize};

use crate::id::ObjectId;
use crate::issue::Issue;

/// The top-level stored document.
///
/// `name` is the lookup key. Issues keep insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub name: String,

    #[serde(default)]
    pub issues: Vec<Issue>,
}

impl Project {
    /// Creates an empty project document with a fresh identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ObjectId::new(),
            name: name.into(),
            issues: Vec::new(),
        }
    }

    /// Appends an issue at the end of the sequence.
    pub fn push_issue(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    /// Finds an embedded issue by identifier.
    pub fn issue(&self, id: &ObjectId) -> Option<&Issue> {
        self.issues.iter().find(|i| &i.id == id)
    }

    /// Finds an embedded issue by identifier for in-place mutation.
    pub fn issue_mut(&mut self, id: &ObjectId) -> Option<&mut Issue> {
        self.issues.iter_mut().find(|i| &i.id == id)
    }

    /// Removes an embedded issue, preserving the order of the rest.
    pub fn remove_issue(&mut self, id: &ObjectId) -> Option<Issue> {
        let pos = self.issues.iter().position(|i| &i.id == id)?;
        Some(self.issues.remove(pos))
    }
}
