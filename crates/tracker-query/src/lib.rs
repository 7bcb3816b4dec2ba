//! Filtered query builder for the issue tracker.
//!
//! Turns an open-ended set of optional equality filters into a single
//! conjunctive [`Predicate`] over the issues embedded in one project.

pub mod error;
pub mod predicate;
pub mod query;

pub use error::{QueryError, Result};
pub use predicate::{Field, Predicate};
pub use query::{IssueQuery, QueryBuilder};
