//! Classified result of one exchange with the remote service.

use std::fmt;

use chrono::{DateTime, Utc};

use super::wire::{RawLabel, RawTask, SyncResponse};

/// Data returned by a successful exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct Delta {
    /// Cursor to resume from next time.
    pub cursor: String,
    /// Labels changed since the previous cursor.
    pub labels: Vec<RawLabel>,
    /// Tasks changed since the previous cursor.
    pub tasks: Vec<RawTask>,
    /// When the response was received.
    pub fetched_at: DateTime<Utc>,
}

impl Delta {
    /// Build a delta from a decoded response body.
    pub fn from_response(response: SyncResponse, fetched_at: DateTime<Utc>) -> Self {
        Self {
            cursor: response.sync_token,
            labels: response.labels,
            tasks: response.items,
            fetched_at,
        }
    }
}

/// Outcome of [`RemoteSource::fetch_delta`](crate::core::RemoteSource::fetch_delta).
///
/// A response with a non-success status counts as *local* connectivity
/// failure, while an exchange that never produced a response counts as the
/// server being unavailable. A non-2xx status is not really a local problem;
/// existing status displays depend on this mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum DeltaResult {
    /// The exchange succeeded and carried data.
    Success(Delta),
    /// A response arrived with a non-success status.
    LocalConnectivityFailure {
        /// HTTP status code of the response.
        status: u16,
    },
    /// No usable response: transport error, timeout or undecodable body.
    ServerUnavailable {
        /// Human-readable cause, for logs.
        reason: String,
    },
}

impl DeltaResult {
    /// Shorthand for a [`DeltaResult::ServerUnavailable`] from any error.
    pub fn server_unavailable(reason: impl fmt::Display) -> Self {
        Self::ServerUnavailable {
            reason: reason.to_string(),
        }
    }

    /// Status classification of this result.
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Success(_) => OutcomeKind::Success,
            Self::LocalConnectivityFailure { .. } => OutcomeKind::Offline,
            Self::ServerUnavailable { .. } => OutcomeKind::ServerDown,
        }
    }

    /// Whether the exchange succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// What a sync outcome means for connectivity status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    /// Data received.
    Success,
    /// Treated as local connectivity loss.
    Offline,
    /// The server could not be reached.
    ServerDown,
}
