//! Composable predicates over issues.

use std::fmt;

use tracker_core::Issue;
use tracker_core::timestamp;

/// Issue fields that can be filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    IssueTitle,
    IssueText,
    CreatedBy,
    AssignedTo,
    StatusText,
    Open,
    CreatedOn,
    UpdatedOn,
}

impl Field {
    /// All fields, in filter evaluation order.
    pub const ALL: [Self; 9] = [
        Self::Id,
        Self::IssueTitle,
        Self::IssueText,
        Self::CreatedBy,
        Self::AssignedTo,
        Self::StatusText,
        Self::Open,
        Self::CreatedOn,
        Self::UpdatedOn,
    ];

    /// The wire name of the field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "_id",
            Self::IssueTitle => "issue_title",
            Self::IssueText => "issue_text",
            Self::CreatedBy => "created_by",
            Self::AssignedTo => "assigned_to",
            Self::StatusText => "status_text",
            Self::Open => "open",
            Self::CreatedOn => "created_on",
            Self::UpdatedOn => "updated_on",
        }
    }

    /// Wire form of the timestamp fields; `None` for the others.
    pub fn timestamp(self, issue: &Issue) -> Option<String> {
        match self {
            Self::CreatedOn => Some(timestamp::format(&issue.created_on)),
            Self::UpdatedOn => Some(timestamp::format(&issue.updated_on)),
            _ => None,
        }
    }

    /// Borrowed access to free-text fields; `None` for the others.
    pub fn text(self, issue: &Issue) -> Option<&str> {
        match self {
            Self::IssueTitle => Some(&issue.issue_title),
            Self::IssueText => Some(&issue.issue_text),
            Self::CreatedBy => Some(&issue.created_by),
            Self::AssignedTo => Some(&issue.assigned_to),
            Self::StatusText => Some(&issue.status_text),
            Self::Id | Self::Open | Self::CreatedOn | Self::UpdatedOn => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type Test = Box<dyn Fn(&Issue) -> bool + Send + Sync>;

/// A conjunction of per-field tests.
///
/// [`Predicate::always`] is the identity for [`Predicate::and`].
pub struct Predicate {
    fields: Vec<Field>,
    test: Test,
}

impl Predicate {
    /// Matches every issue.
    pub fn always() -> Self {
        Self {
            fields: Vec::new(),
            test: Box::new(|_| true),
        }
    }

    /// A single test constraining `field`.
    pub fn on<F>(field: Field, test: F) -> Self
    where
        F: Fn(&Issue) -> bool + Send + Sync + 'static,
    {
        Self {
            fields: vec![field],
            test: Box::new(test),
        }
    }

    /// Exact string equality on a free-text field or on the wire form of a
    /// timestamp field.
    ///
    /// Returns `None` for `_id` and `open`, which are compared as typed
    /// values by [`Predicate::on`] instead.
    pub fn equals(field: Field, expected: String) -> Option<Self> {
        match field {
            Field::IssueTitle
            | Field::IssueText
            | Field::CreatedBy
            | Field::AssignedTo
            | Field::StatusText => Some(Self::on(field, move |issue| {
                field.text(issue) == Some(expected.as_str())
            })),
            Field::CreatedOn | Field::UpdatedOn => Some(Self::on(field, move |issue| {
                field.timestamp(issue).as_deref() == Some(expected.as_str())
            })),
            Field::Id | Field::Open => None,
        }
    }

    /// Logical AND.
    pub fn and(self, other: Self) -> Self {
        let Self { mut fields, test: left } = self;
        let Self { fields: more, test: right } = other;
        fields.extend(more);
        Self {
            fields,
            test: Box::new(move |issue| left(issue) && right(issue)),
        }
    }

    pub fn matches(&self, issue: &Issue) -> bool {
        (self.test)(issue)
    }

    /// Fields constrained by this predicate, in the order they were added.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }
}

impl Default for Predicate {
    fn default() -> Self {
        Self::always()
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}
