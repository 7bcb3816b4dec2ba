//! Errors raised by document stores.

/// Failure of a [`DocumentStore`](crate::DocumentStore) operation.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The database could not be opened or configured.
    #[error("connection error: {0}")]
    Connection(String),

    #[error("schema step {name} failed: {reason}")]
    Migration { name: String, reason: String },

    #[error("query error: {0}")]
    Query(#[from] rusqlite::Error),

    /// A project document could not be encoded or decoded.
    #[error("document error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_errors_carry_the_decoder_message() {
        let err: StorageError = serde_json::from_str::<serde_json::Value>("{oops")
            .unwrap_err()
            .into();
        assert!(err.to_string().starts_with("document error: key must be a string"), "{err}");
    }
}
