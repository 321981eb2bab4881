//! Sync state tracker
//!
//! Connectivity status and the countdown to the next automatic sync.
//! Transitions are pure; nothing here does I/O.

use std::fmt;

use serde::Serialize;

use crate::core::DEFAULT_SYNC_INTERVAL_SECS;
use crate::remote::OutcomeKind;

/// Status shown to the user after a sync attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StatusLabel {
    /// Last exchange succeeded.
    Online,
    /// Last exchange got a failure response.
    Offline,
    /// Last exchange got no response.
    ServerDown,
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Online => "Online",
            Self::Offline => "Offline",
            Self::ServerDown => "ServerDown",
        })
    }
}

/// Transient sync status (never persisted).
///
/// Tracks:
/// - `is_offline` / `is_server_down`: classification of the last attempt
/// - `label`: `None` until the first attempt completes
/// - `next_update_seconds`: countdown to the next automatic attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncStatus {
    is_offline: bool,
    is_server_down: bool,
    label: Option<StatusLabel>,
    next_update_seconds: u32,
    #[serde(skip)]
    interval_secs: u32,
}

impl Default for SyncStatus {
    fn default() -> Self {
        Self::with_interval(DEFAULT_SYNC_INTERVAL_SECS)
    }
}

impl SyncStatus {
    /// Create a status with the default interval.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a status counting down from `interval_secs`.
    pub fn with_interval(interval_secs: u32) -> Self {
        Self {
            is_offline: false,
            is_server_down: false,
            label: None,
            next_update_seconds: interval_secs,
            interval_secs,
        }
    }

    /// Whether the last attempt was classified as offline.
    pub fn is_offline(&self) -> bool {
        self.is_offline
    }

    /// Whether the last attempt was classified as server down.
    pub fn is_server_down(&self) -> bool {
        self.is_server_down
    }

    /// Whether the last attempt succeeded.
    pub fn is_online(&self) -> bool {
        self.label == Some(StatusLabel::Online)
    }

    /// Status label, `None` before the first attempt.
    pub fn label(&self) -> Option<StatusLabel> {
        self.label
    }

    /// Seconds until the next automatic attempt.
    pub fn next_update_seconds(&self) -> u32 {
        self.next_update_seconds
    }

    /// Countdown start value.
    pub fn interval_secs(&self) -> u32 {
        self.interval_secs
    }

    /// Restart the countdown from the full interval.
    pub fn reset_countdown(&mut self) {
        self.next_update_seconds = self.interval_secs;
    }

    /// Advance the countdown by one second.
    ///
    /// Returns `true` exactly when the countdown reaches zero. Ticking at
    /// zero stays at zero and returns `false` until the next reset.
    pub fn tick(&mut self) -> bool {
        if self.next_update_seconds == 0 {
            return false;
        }
        self.next_update_seconds -= 1;
        self.next_update_seconds == 0
    }

    /// Record the classification of an attempt.
    pub fn apply_outcome(&mut self, outcome: OutcomeKind) {
        let (is_offline, is_server_down, label) = match outcome {
            OutcomeKind::Success => (false, false, StatusLabel::Online),
            OutcomeKind::Offline => (true, false, StatusLabel::Offline),
            OutcomeKind::ServerDown => (false, true, StatusLabel::ServerDown),
        };
        self.is_offline = is_offline;
        self.is_server_down = is_server_down;
        self.label = Some(label);
    }
}
