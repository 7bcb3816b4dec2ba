//! Filter parameters for issue queries.

use serde::Deserialize;

/// Raw, unvalidated filter criteria as supplied by a client.
///
/// Every field is optional; a present field is an equality constraint even
/// when its value is the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FilterParams {
    #[serde(default, rename = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub issue_title: Option<String>,
    #[serde(default)]
    pub issue_text: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub status_text: Option<String>,
    #[serde(default)]
    pub open: Option<String>,
    #[serde(default)]
    pub created_on: Option<String>,
    #[serde(default)]
    pub updated_on: Option<String>,
}
