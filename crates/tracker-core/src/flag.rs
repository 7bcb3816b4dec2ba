//! Loosely typed boolean input.
//!
//! Form bodies carry `open=false` as text while JSON bodies carry a real
//! boolean, so the `open` field is accepted as either and interpreted later.

use serde::Deserialize;

/// A boolean-ish value as supplied by a client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl Flag {
    /// Whether the value counts as "sent" when deciding if an update carries
    /// any field at all. Any non-empty string counts, including `"false"`.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(n) => *n != 0,
            Self::Text(s) => !s.is_empty(),
        }
    }

    /// Strict cast used when storing the value.
    ///
    /// Returns `None` for text that is not a recognised boolean spelling.
    pub fn cast(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Int(1) => Some(true),
            Self::Int(0) => Some(false),
            Self::Int(_) => None,
            Self::Text(s) => match s.trim() {
                "true" | "1" | "yes" => Some(true),
                "false" | "0" | "no" => Some(false),
                _ => None,
            },
        }
    }
}

/// Coercion used by query filters: only the empty string is false.
///
/// Spellings such as `"false"` or `"0"` are non-empty and therefore true,
/// matching how [`Flag::is_truthy`] treats text.
pub fn coerce(s: &str) -> bool {
    !s.is_empty()
}
