//! Wire types of the remote sync endpoint.
//!
//! Field names follow the task service's sync API and are not ours to
//! change. Only the fields the merger reads are modelled; everything else
//! in the response is ignored.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier assigned by the remote service.
///
/// The service has used both numeric and string ids over its API versions;
/// both deserialize into the same string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RemoteId(String);

impl RemoteId {
    /// Create an id from its string form.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RemoteId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<i64> for RemoteId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for RemoteId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Number(i64),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Text(id) => Self(id),
            Repr::Number(id) => Self(id.to_string()),
        })
    }
}

/// A label as returned by the sync endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLabel {
    /// Label name, also how tasks refer to it.
    pub name: String,
    /// Whether the user marked the label as favorite.
    #[serde(default)]
    pub is_favorite: bool,
    /// Position among the user's labels.
    #[serde(default, alias = "order")]
    pub item_order: i64,
}

/// Due information of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDue {
    /// `YYYY-MM-DD`, optionally followed by a time component.
    pub date: String,
}

/// A task ("item") as returned by the sync endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTask {
    /// Task id.
    pub id: RemoteId,
    /// Task title.
    pub content: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Owning project.
    #[serde(default)]
    pub project_id: Option<RemoteId>,
    /// Names of the labels attached to the task.
    #[serde(default)]
    pub labels: Vec<String>,
    /// Due information, if any.
    #[serde(default)]
    pub due: Option<RawDue>,
    /// Priority from 1 (normal) to 4 (urgent).
    #[serde(default = "default_priority")]
    pub priority: u8,
}

fn default_priority() -> u8 {
    1
}

impl RawTask {
    /// Calendar date the task is due, ignoring any time component.
    ///
    /// Returns `None` when there is no due date or it cannot be parsed.
    pub fn due_date(&self) -> Option<NaiveDate> {
        let date = self.due.as_ref()?.date.get(..10)?;
        NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
    }

    /// Whether any of the task's labels is in `names`.
    pub fn has_any_label<'a>(&self, mut names: impl Iterator<Item = &'a str>) -> bool {
        names.any(|name| self.labels.iter().any(|label| label == name))
    }
}

/// Successful response body of the sync endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SyncResponse {
    /// Cursor to send on the next exchange.
    pub sync_token: String,
    /// Whether the service answered with a full resend.
    #[serde(default)]
    pub full_sync: bool,
    /// Changed labels.
    #[serde(default)]
    pub labels: Vec<RawLabel>,
    /// Changed tasks.
    #[serde(default)]
    pub items: Vec<RawTask>,
}
