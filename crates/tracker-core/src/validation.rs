//! Issue validation rules.

use crate::issue::NewIssue;

/// Error type for validation failures.
///
/// The `Display` text is what clients see, so it stays fixed regardless of
/// which fields were at fault.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("required field(s) missing")]
    RequiredFieldsMissing {
        /// Names of the required fields that were absent or empty.
        fields: Vec<&'static str>,
    },

    #[error("cannot cast {value:?} to a boolean for field '{field}'")]
    InvalidBoolean { field: &'static str, value: String },
}

/// Checks that `issue_title`, `issue_text` and `created_by` are present and
/// non-empty.
pub fn validate_new_issue(new: &NewIssue) -> Result<(), ValidationError> {
    let required = [
        ("issue_title", &new.issue_title),
        ("issue_text", &new.issue_text),
        ("created_by", &new.created_by),
    ];

    let missing: Vec<&'static str> = required
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_none_or(str::is_empty))
        .map(|(name, _)| name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::RequiredFieldsMissing { fields: missing })
    }
}
