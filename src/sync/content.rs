//! Accumulated content state
//!
//! The single snapshot that gets persisted between runs. Field names on disk
//! are camelCase (`syncToken`, `updatedAt`, ...) and older snapshots using
//! snake_case task fields still load.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::FULL_SYNC_CURSOR;
use crate::remote::{RawLabel, RawTask, RemoteId};

/// A favorite label kept locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Label name.
    pub name: String,
    /// Position reported by the service.
    #[serde(alias = "item_order")]
    pub order: i64,
}

impl Label {
    /// Project a raw label.
    pub fn from_raw(raw: &RawLabel) -> Self {
        Self {
            name: raw.name.clone(),
            order: raw.item_order,
        }
    }
}

/// A task carrying at least one favorite label, with its score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Task id.
    pub id: RemoteId,
    /// Task title.
    pub content: String,
    /// Due date, if any.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Owning project.
    #[serde(default, alias = "project_id")]
    pub project_id: Option<RemoteId>,
    /// Label names.
    #[serde(default)]
    pub labels: BTreeSet<String>,
    /// Rank; lower sorts first.
    #[serde(default)]
    pub score: i64,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
}

impl Task {
    /// Project a raw task with its computed score.
    pub fn from_raw(raw: &RawTask, score: i64) -> Self {
        Self {
            id: raw.id.clone(),
            content: raw.content.clone(),
            due_date: raw.due_date(),
            project_id: raw.project_id.clone(),
            labels: raw.labels.iter().cloned().collect(),
            score,
            description: raw.description.clone(),
        }
    }
}

/// Persisted snapshot: cursor plus accumulated labels and tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentState {
    /// Resumption point; [`FULL_SYNC_CURSOR`] until the first success.
    #[serde(rename = "syncToken")]
    pub sync_cursor: String,
    /// Accumulated favorite labels.
    #[serde(default)]
    pub labels: Vec<Label>,
    /// Accumulated tasks.
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// Time of the last successful exchange.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for ContentState {
    fn default() -> Self {
        Self {
            sync_cursor: FULL_SYNC_CURSOR.to_string(),
            labels: Vec::new(),
            tasks: Vec::new(),
            updated_at: None,
        }
    }
}

impl ContentState {
    /// Create an empty state that will sync from the beginning.
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the cursor back at the full-resync sentinel.
    pub fn reset_cursor(&mut self) {
        self.sync_cursor = FULL_SYNC_CURSOR.to_string();
    }

    /// Whether the next exchange will request a full resend.
    pub fn is_full_sync_pending(&self) -> bool {
        self.sync_cursor == FULL_SYNC_CURSOR
    }
}
