//! Handle for controlling a running scheduler.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{mpsc, watch};

use crate::core::{RemoteSource, SyncError};
use crate::sync::{SyncEngine, SyncKind, SyncStatus};

/// Commands accepted by the scheduler loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncCommand {
    /// Queue a sync of the given kind.
    Sync(SyncKind),
    /// Stop the loop.
    Shutdown,
}

/// Point-in-time view of the engine, published after every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    /// Connectivity status and countdown.
    pub status: SyncStatus,
    /// Time of the last successful exchange.
    pub updated_at: Option<DateTime<Utc>>,
    /// Whether an exchange is awaiting its response.
    pub in_flight: bool,
    /// Accumulated labels.
    pub labels: usize,
    /// Accumulated tasks.
    pub tasks: usize,
}

impl StatusSnapshot {
    /// Capture the current state of `engine`.
    pub fn of<R: RemoteSource>(engine: &SyncEngine<R>) -> Self {
        let content = engine.content();
        Self {
            status: engine.status().clone(),
            updated_at: content.updated_at,
            in_flight: engine.is_in_flight(),
            labels: content.labels.len(),
            tasks: content.tasks.len(),
        }
    }
}

/// Cloneable handle to a running scheduler.
///
/// Commands are queued; they return once the loop has accepted them, not
/// once the sync has run. Watch [`changed`](Self::changed) for results.
#[derive(Debug, Clone)]
pub struct SyncHandle {
    commands: mpsc::Sender<SyncCommand>,
    status: watch::Receiver<StatusSnapshot>,
}

impl SyncHandle {
    pub(super) fn new(
        commands: mpsc::Sender<SyncCommand>,
        status: watch::Receiver<StatusSnapshot>,
    ) -> Self {
        Self { commands, status }
    }

    /// Request an incremental sync.
    pub async fn update(&self) -> Result<(), SyncError> {
        self.send(SyncCommand::Sync(SyncKind::Incremental)).await
    }

    /// Request a full resync.
    pub async fn full_sync(&self) -> Result<(), SyncError> {
        self.send(SyncCommand::Sync(SyncKind::Full)).await
    }

    /// Ask the loop to stop. The in-flight exchange, if any, is completed
    /// first.
    pub async fn shutdown(&self) -> Result<(), SyncError> {
        self.send(SyncCommand::Shutdown).await
    }

    /// Latest published snapshot.
    pub fn status(&self) -> StatusSnapshot {
        self.status.borrow().clone()
    }

    /// Wait for the next snapshot.
    pub async fn changed(&mut self) -> Result<StatusSnapshot, SyncError> {
        self.status
            .changed()
            .await
            .map_err(|_| SyncError::SchedulerStopped)?;
        Ok(self.status.borrow_and_update().clone())
    }

    /// Whether the loop is still accepting commands.
    pub fn is_running(&self) -> bool {
        !self.commands.is_closed()
    }

    async fn send(&self, command: SyncCommand) -> Result<(), SyncError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| SyncError::SchedulerStopped)
    }
}
