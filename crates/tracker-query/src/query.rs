//! [`IssueQuery`] and its builder.

use tracker_core::{FilterParams, Issue, ObjectId, Project};

use crate::error::{QueryError, Result};
use crate::predicate::{Field, Predicate};

/// A query for the issues of one project.
#[derive(Debug)]
pub struct IssueQuery {
    project: String,
    predicate: Predicate,
}

impl IssueQuery {
    /// Starts a builder for `project`.
    pub fn builder(project: impl Into<String>) -> QueryBuilder {
        QueryBuilder::new(project)
    }

    /// Builds a query from raw client parameters.
    ///
    /// Fails only when the `_id` filter is malformed.
    pub fn from_params(project: impl Into<String>, params: &FilterParams) -> Result<Self> {
        let id = params
            .id
            .as_deref()
            .map(|raw| {
                ObjectId::parse_str(raw).map_err(|source| QueryError::InvalidId {
                    value: raw.to_string(),
                    source,
                })
            })
            .transpose()?;

        Ok(Self::builder(project)
            .id(id)
            .text(Field::IssueTitle, params.issue_title.clone())
            .text(Field::IssueText, params.issue_text.clone())
            .text(Field::CreatedBy, params.created_by.clone())
            .text(Field::AssignedTo, params.assigned_to.clone())
            .text(Field::StatusText, params.status_text.clone())
            .open(params.open.as_deref().map(tracker_core::flag::coerce))
            .timestamp(Field::CreatedOn, params.created_on.clone())
            .timestamp(Field::UpdatedOn, params.updated_on.clone())
            .build())
    }

    /// The project name this query is scoped to.
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Fields constrained by this query.
    pub fn fields(&self) -> &[Field] {
        self.predicate.fields()
    }

    /// Tests a single issue.
    pub fn matches(&self, issue: &Issue) -> bool {
        self.predicate.matches(issue)
    }

    /// Returns matching issues in their original order.
    pub fn select(&self, issues: &[Issue]) -> Vec<Issue> {
        issues.iter().filter(|i| self.matches(i)).cloned().collect()
    }

    /// Evaluates the query against a project document.
    ///
    /// An absent project, or one with a different name, yields no issues.
    pub fn run(&self, project: Option<&Project>) -> Vec<Issue> {
        match project {
            Some(p) if p.name == self.project => self.select(&p.issues),
            _ => Vec::new(),
        }
    }
}

/// Collects optional per-field constraints, then folds them into one
/// conjunctive [`Predicate`].
#[derive(Debug)]
pub struct QueryBuilder {
    project: String,
    pending: Vec<(Field, Option<Predicate>)>,
}

impl QueryBuilder {
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            pending: Vec::with_capacity(Field::ALL.len()),
        }
    }

    /// Constrains the identifier.
    pub fn id(mut self, id: Option<ObjectId>) -> Self {
        let predicate = id.map(|id| Predicate::on(Field::Id, move |issue| issue.id == id));
        self.pending.push((Field::Id, predicate));
        self
    }

    /// Constrains a free-text field by exact equality. Ignored for
    /// non-text fields.
    pub fn text(mut self, field: Field, value: Option<String>) -> Self {
        let predicate = value.and_then(|v| Predicate::equals(field, v));
        self.pending.push((field, predicate));
        self
    }

    /// Constrains the open flag.
    pub fn open(mut self, open: Option<bool>) -> Self {
        let predicate = open.map(|open| Predicate::on(Field::Open, move |issue| issue.open == open));
        self.pending.push((Field::Open, predicate));
        self
    }

    /// Constrains a timestamp field by its exact wire representation.
    /// Ignored for non-timestamp fields.
    pub fn timestamp(mut self, field: Field, value: Option<String>) -> Self {
        let predicate = value.and_then(|v| Predicate::equals(field, v));
        self.pending.push((field, predicate));
        self
    }

    pub fn build(self) -> IssueQuery {
        let predicate = self
            .pending
            .into_iter()
            .fold(Predicate::always(), |acc, (_, p)| match p {
                Some(p) => acc.and(p),
                None => acc,
            });

        IssueQuery {
            project: self.project,
            predicate,
        }
    }
}
