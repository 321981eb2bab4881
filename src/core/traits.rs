//! Core traits for todosync.
//!
//! These traits are the seams between the sync engine and its collaborators:
//! where deltas come from, how tasks are ranked, where the snapshot lives and
//! who gets told about changes.

use std::future::Future;

use chrono::{DateTime, Utc};

use super::error::StoreError;
use crate::remote::{DeltaResult, RawTask};
use crate::sync::{ContentState, SyncStatus};

/// Source of incremental deltas.
///
/// One call is one exchange with the remote service. Implementations never
/// retry and never fail with `Err`: every failure is classified into a
/// [`DeltaResult`] variant so the engine can record it as status.
///
/// # Example
///
/// ```ignore
/// struct Canned(DeltaResult);
///
/// impl RemoteSource for Canned {
///     fn fetch_delta(&self, _cursor: &str) -> impl Future<Output = DeltaResult> + Send {
///         let result = self.0.clone();
///         async move { result }
///     }
/// }
/// ```
pub trait RemoteSource: Send + Sync + 'static {
    /// Fetch everything that changed since `cursor`.
    ///
    /// The sentinel [`FULL_SYNC_CURSOR`](super::FULL_SYNC_CURSOR) asks for a
    /// full resend.
    fn fetch_delta(&self, cursor: &str) -> impl Future<Output = DeltaResult> + Send;
}

/// Ranking policy for fetched tasks.
///
/// Merged tasks are ordered ascending by score, so lower means "show first".
pub trait TaskScorer: Send + Sync {
    /// Score a raw task.
    fn score(&self, task: &RawTask) -> i64;
}

impl<F> TaskScorer for F
where
    F: Fn(&RawTask) -> i64 + Send + Sync,
{
    fn score(&self, task: &RawTask) -> i64 {
        self(task)
    }
}

/// Storage for the single persisted content snapshot.
pub trait SnapshotStore: Send {
    /// Load the snapshot, or `None` if nothing was saved yet.
    fn load(&self) -> Result<Option<ContentState>, StoreError>;

    /// Replace the stored snapshot.
    fn save(&mut self, content: &ContentState) -> Result<(), StoreError>;
}

/// Receiver of sync notifications, typically a renderer.
///
/// `on_sync_state` is called after every cycle, `on_content` only after
/// cycles that produced new data. The remaining hooks default to no-ops.
pub trait SyncObserver: Send {
    /// Status after a cycle (or a periodic re-render).
    fn on_sync_state(&mut self, status: &SyncStatus, updated_at: Option<DateTime<Utc>>);

    /// Accumulated content after a cycle with new data.
    fn on_content(&mut self, content: &ContentState);

    /// Countdown to the next automatic sync changed.
    fn on_countdown(&mut self, next_update_seconds: u32) {
        let _ = next_update_seconds;
    }

    /// An exchange is about to start.
    fn on_sync_started(&mut self) {}

    /// The exchange finished, whatever its outcome.
    fn on_sync_finished(&mut self) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl SyncObserver for NullObserver {
    fn on_sync_state(&mut self, _status: &SyncStatus, _updated_at: Option<DateTime<Utc>>) {}

    fn on_content(&mut self, _content: &ContentState) {}
}
