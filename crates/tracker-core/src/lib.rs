//! Core types for the issue tracker.
//!
//! Issues never live on their own: every [`Issue`](issue::Issue) is embedded
//! in exactly one [`Project`](project::Project) document, and all lookups go
//! through the owning project first.

pub mod filter;
pub mod flag;
pub mod id;
pub mod issue;
pub mod project;
pub mod timestamp;
pub mod updates;
pub mod validation;

// Re-exports for convenience.
pub use filter::FilterParams;
pub use flag::Flag;
pub use id::{IdError, ObjectId};
pub use issue::{Issue, NewIssue};
pub use project::Project;
pub use updates::IssueUpdates;
pub use validation::ValidationError;
