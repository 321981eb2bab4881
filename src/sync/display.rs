//! Display helpers for sync status
//!
//! Pure formatting used by renderers: countdown text, "last updated" text
//! and a coarse tone for coloring the status.

use chrono::{DateTime, Utc};

use super::tracker::SyncStatus;

/// Format a countdown as `MM:SS`.
pub fn format_countdown(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Describe how long ago `updated_at` was, relative to `now`.
pub fn describe_updated_at(updated_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(updated_at) = updated_at else {
        return "Never".to_string();
    };

    let since = (now - updated_at).num_seconds().max(0);
    match since {
        0..5 => "just now".to_string(),
        5..60 => format!("{} seconds ago", since),
        60..3600 => format!("{} minutes ago", since / 60),
        3600..86400 => format!("{} hours ago", since / 3600),
        _ => updated_at.format("%-d %H:%M").to_string(),
    }
}

/// Coarse status tone, for coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusTone {
    /// Last exchange succeeded.
    Healthy,
    /// The server could not be reached.
    Alert,
    /// Offline, or nothing attempted yet.
    Neutral,
}

impl StatusTone {
    /// Tone of a status.
    pub fn of(status: &SyncStatus) -> Self {
        if status.is_server_down() {
            Self::Alert
        } else if status.is_online() {
            Self::Healthy
        } else {
            Self::Neutral
        }
    }
}
