//! Sync engine
//!
//! Runs sync cycles against a remote source and owns everything a cycle
//! touches: content, status, snapshot store, scorer and observer.
//! Generic over the remote source R which must implement RemoteSource.

use std::fmt;
use std::mem;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::content::ContentState;
use super::merge::{MergePolicy, merge_labels, merge_tasks};
use super::score::RandomScorer;
use super::tracker::SyncStatus;
use crate::core::{
    NullObserver, RemoteSource, SnapshotStore, SyncError, SyncObserver, TaskScorer,
};
use crate::remote::{Delta, DeltaResult, OutcomeKind};

/// Kind of sync cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncKind {
    /// Resume from the stored cursor.
    Incremental,
    /// Reset the cursor and ask for everything.
    Full,
}

impl fmt::Display for SyncKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Incremental => "incremental",
            Self::Full => "full",
        })
    }
}

/// Result of one sync cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Kind of cycle.
    pub kind: SyncKind,
    /// Classification of the exchange.
    pub outcome: OutcomeKind,
    /// Whether content was updated.
    pub has_new_data: bool,
    /// Whether the updated content reached the snapshot store.
    pub persisted: bool,
    /// Labels appended by this cycle.
    pub labels_added: usize,
    /// Tasks appended by this cycle.
    pub tasks_added: usize,
}

/// Sync engine for one-way synchronization of a remote task list.
///
/// The engine manages:
/// - Content state, loaded once from the snapshot store
/// - Sync status and the countdown to the next automatic cycle
/// - The in-flight guard: at most one exchange at a time
///
/// A cycle is either run in one call ([`run_incremental_sync`],
/// [`run_full_sync`]) or split into [`begin_sync`] and [`complete_sync`]
/// around a fetch performed elsewhere, which is how the scheduler keeps
/// ticking while a request is outstanding.
///
/// [`run_incremental_sync`]: Self::run_incremental_sync
/// [`run_full_sync`]: Self::run_full_sync
/// [`begin_sync`]: Self::begin_sync
/// [`complete_sync`]: Self::complete_sync
pub struct SyncEngine<R> {
    /// Source of deltas, shared with in-flight fetches
    remote: Arc<R>,

    /// Where content is persisted after each successful cycle
    store: Box<dyn SnapshotStore>,

    /// Ranking of merged tasks
    scorer: Box<dyn TaskScorer>,

    /// Receiver of status and content notifications
    observer: Box<dyn SyncObserver>,

    merge_policy: MergePolicy,

    content: ContentState,

    status: SyncStatus,

    /// Kind of the cycle awaiting its response, if any
    in_flight: Option<SyncKind>,
}

impl<R> fmt::Debug for SyncEngine<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncEngine")
            .field("merge_policy", &self.merge_policy)
            .field("content", &self.content)
            .field("status", &self.status)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl<R: RemoteSource> SyncEngine<R> {
    /// Create an engine, loading content from `store`.
    ///
    /// A store with no snapshot yields empty content that syncs from the
    /// beginning. A snapshot that cannot be read is an error rather than a
    /// silent reset, since the next save would overwrite it.
    pub fn open(remote: R, store: impl SnapshotStore + 'static) -> Result<Self, SyncError> {
        let content = match store.load()? {
            Some(content) => {
                debug!(
                    cursor = %content.sync_cursor,
                    labels = content.labels.len(),
                    tasks = content.tasks.len(),
                    "restored snapshot"
                );
                content
            }
            None => ContentState::default(),
        };

        Ok(Self {
            remote: Arc::new(remote),
            store: Box::new(store),
            scorer: Box::new(RandomScorer),
            observer: Box::new(NullObserver),
            merge_policy: MergePolicy::default(),
            content,
            status: SyncStatus::default(),
            in_flight: None,
        })
    }

    /// Replace the task scorer.
    pub fn with_scorer(mut self, scorer: Box<dyn TaskScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    /// Replace the observer.
    pub fn with_observer(mut self, observer: Box<dyn SyncObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Set the merge policy.
    pub fn with_merge_policy(mut self, policy: MergePolicy) -> Self {
        self.merge_policy = policy;
        self
    }

    /// Set the automatic sync interval, restarting the countdown.
    pub fn with_interval(mut self, interval_secs: u32) -> Self {
        self.status = SyncStatus::with_interval(interval_secs);
        self
    }

    /// Accumulated content.
    pub fn content(&self) -> &ContentState {
        &self.content
    }

    /// Current sync status.
    pub fn status(&self) -> &SyncStatus {
        &self.status
    }

    /// Active merge policy.
    pub fn merge_policy(&self) -> MergePolicy {
        self.merge_policy
    }

    /// Whether a cycle is awaiting its response.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Shared handle to the remote source, for fetching outside the engine.
    pub fn remote(&self) -> Arc<R> {
        Arc::clone(&self.remote)
    }

    /// Run an incremental cycle from the stored cursor.
    pub async fn run_incremental_sync(&mut self) -> Result<SyncReport, SyncError> {
        self.run(SyncKind::Incremental).await
    }

    /// Reset the cursor to the full-sync sentinel and run a cycle.
    pub async fn run_full_sync(&mut self) -> Result<SyncReport, SyncError> {
        self.run(SyncKind::Full).await
    }

    async fn run(&mut self, kind: SyncKind) -> Result<SyncReport, SyncError> {
        let cursor = self.begin_sync(kind)?;
        let result = self.remote.fetch_delta(&cursor).await;
        Ok(self.complete_sync(result))
    }

    /// Start a cycle and return the cursor to fetch with.
    ///
    /// Restarts the countdown, and for a full cycle resets the cursor first.
    /// Fails with [`SyncError::AlreadyInFlight`] until the outstanding cycle
    /// is completed.
    pub fn begin_sync(&mut self, kind: SyncKind) -> Result<String, SyncError> {
        if self.in_flight.is_some() {
            return Err(SyncError::AlreadyInFlight);
        }

        if kind == SyncKind::Full {
            self.content.reset_cursor();
        }
        self.status.reset_countdown();
        self.in_flight = Some(kind);
        self.observer.on_sync_started();

        debug!(%kind, cursor = %self.content.sync_cursor, "starting sync");
        Ok(self.content.sync_cursor.clone())
    }

    /// Finish the outstanding cycle with the result of its fetch.
    ///
    /// Status is updated for every result. Content is merged and persisted
    /// only on success; failures leave it untouched. The observer always
    /// receives the status, and the content when there is new data.
    ///
    /// Without a preceding [`begin_sync`](Self::begin_sync) the result is
    /// still applied as an incremental cycle, and a warning is logged.
    pub fn complete_sync(&mut self, result: DeltaResult) -> SyncReport {
        let kind = match self.in_flight.take() {
            Some(kind) => kind,
            None => {
                warn!("sync completed without a matching begin, bypassing the in-flight guard");
                SyncKind::Incremental
            }
        };
        self.observer.on_sync_finished();

        let outcome = result.kind();
        self.status.apply_outcome(outcome);

        let mut report = SyncReport {
            kind,
            outcome,
            has_new_data: false,
            persisted: false,
            labels_added: 0,
            tasks_added: 0,
        };

        match result {
            DeltaResult::Success(delta) => self.apply_delta(kind, delta, &mut report),
            DeltaResult::LocalConnectivityFailure { status } => {
                warn!(%kind, status, "sync failed, treating as offline");
            }
            DeltaResult::ServerUnavailable { reason } => {
                warn!(%kind, %reason, "sync failed, server unavailable");
            }
        }

        self.observer
            .on_sync_state(&self.status, self.content.updated_at);
        if report.has_new_data {
            self.observer.on_content(&self.content);
        }

        report
    }

    fn apply_delta(&mut self, kind: SyncKind, delta: Delta, report: &mut SyncReport) {
        if kind == SyncKind::Full && self.merge_policy == MergePolicy::ReplaceOnFullSync {
            self.content.labels.clear();
            self.content.tasks.clear();
        }

        let labels_before = self.content.labels.len();
        let tasks_before = self.content.tasks.len();

        self.content.sync_cursor = delta.cursor;
        let labels = mem::take(&mut self.content.labels);
        self.content.labels = merge_labels(labels, &delta.labels);
        let tasks = mem::take(&mut self.content.tasks);
        self.content.tasks = merge_tasks(
            tasks,
            &delta.tasks,
            &self.content.labels,
            self.scorer.as_ref(),
        );
        self.content.updated_at = Some(delta.fetched_at);

        report.has_new_data = true;
        report.labels_added = self.content.labels.len().saturating_sub(labels_before);
        report.tasks_added = self.content.tasks.len().saturating_sub(tasks_before);

        match self.store.save(&self.content) {
            Ok(()) => report.persisted = true,
            Err(err) => warn!(error = %err, "failed to persist snapshot"),
        }

        info!(
            %kind,
            labels_added = report.labels_added,
            tasks_added = report.tasks_added,
            labels = self.content.labels.len(),
            tasks = self.content.tasks.len(),
            "sync complete"
        );
    }

    /// Advance the countdown by one tick.
    ///
    /// Returns `true` when an automatic cycle is due.
    pub fn tick(&mut self) -> bool {
        let due = self.status.tick();
        self.observer
            .on_countdown(self.status.next_update_seconds());
        due
    }

    /// Send the current status to the observer without syncing.
    pub fn render_status(&mut self) {
        self.observer
            .on_sync_state(&self.status, self.content.updated_at);
    }
}
