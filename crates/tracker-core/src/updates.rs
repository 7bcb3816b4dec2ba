//! Partial updates to an existing issue.

use chrono::{DateTime, Utc};

use crate::flag::Flag;
use crate::issue::Issue;
use crate::validation::ValidationError;

/// Typed partial-update struct for issues.
///
/// Text fields overwrite only when supplied non-empty. `open` is the
/// exception: it is always assigned, and an absent value stores `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueUpdates {
    pub issue_title: Option<String>,
    pub issue_text: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub status_text: Option<String>,
    pub open: Option<Flag>,
}

impl IssueUpdates {
    /// Returns `true` if at least one field carries a truthy value.
    pub fn has_changes(&self) -> bool {
        let text_sent = [
            &self.issue_title,
            &self.issue_text,
            &self.created_by,
            &self.assigned_to,
            &self.status_text,
        ]
        .into_iter()
        .any(|v| v.as_deref().is_some_and(|s| !s.is_empty()));

        text_sent || self.open.as_ref().is_some_and(Flag::is_truthy)
    }

    /// Merges the updates into `issue` and stamps `updated_on`.
    ///
    /// Nothing is modified if `open` cannot be cast to a boolean.
    pub fn apply(&self, issue: &mut Issue, now: DateTime<Utc>) -> Result<(), ValidationError> {
        let open = match &self.open {
            None => false,
            Some(flag) => flag.cast().ok_or_else(|| ValidationError::InvalidBoolean {
                field: "open",
                value: format!("{flag:?}"),
            })?,
        };

        merge_text(&mut issue.issue_title, &self.issue_title);
        merge_text(&mut issue.issue_text, &self.issue_text);
        merge_text(&mut issue.created_by, &self.created_by);
        merge_text(&mut issue.assigned_to, &self.assigned_to);
        merge_text(&mut issue.status_text, &self.status_text);
        issue.open = open;
        issue.updated_on = now;
        Ok(())
    }
}

fn merge_text(target: &mut String, value: &Option<String>) {
    if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
        v.clone_into(target);
    }
}
