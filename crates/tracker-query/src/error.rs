//! Query error types.

use tracker_core::IdError;

/// Errors raised while building a query from client input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// The `_id` filter is not a well-formed identifier.
    #[error("invalid _id filter: {value}")]
    InvalidId {
        /// The rejected input.
        value: String,
        #[source]
        source: IdError,
    },
}

/// Convenience alias used throughout the query crate.
pub type Result<T> = std::result::Result<T, QueryError>;
