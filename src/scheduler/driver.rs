//! Scheduler loop.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::handle::{StatusSnapshot, SyncCommand, SyncHandle};
use crate::core::{COUNTDOWN_TICK_PERIOD, RemoteSource, STATUS_RENDER_PERIOD};
use crate::remote::DeltaResult;
use crate::sync::{SyncEngine, SyncKind};

/// Command channel capacity.
const COMMAND_BUFFER: usize = 16;

/// Scheduler timing.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Period of the countdown tick.
    pub tick_period: Duration,

    /// Period of the status re-render.
    pub render_period: Duration,

    /// Run an incremental sync as soon as the loop starts.
    pub initial_sync: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_period: COUNTDOWN_TICK_PERIOD,
            render_period: STATUS_RENDER_PERIOD,
            initial_sync: true,
        }
    }
}

/// Start driving `engine` on a new tokio task.
///
/// The join handle resolves to the engine once the loop stops, either
/// through [`SyncHandle::shutdown`] or because every handle was dropped.
pub fn spawn<R: RemoteSource>(
    engine: SyncEngine<R>,
    config: SchedulerConfig,
) -> (SyncHandle, JoinHandle<SyncEngine<R>>) {
    let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
    let (status_tx, status_rx) = watch::channel(StatusSnapshot::of(&engine));

    let task = tokio::spawn(drive(engine, config, command_rx, status_tx));
    (SyncHandle::new(command_tx, status_rx), task)
}

async fn drive<R: RemoteSource>(
    mut engine: SyncEngine<R>,
    config: SchedulerConfig,
    mut commands: mpsc::Receiver<SyncCommand>,
    status_tx: watch::Sender<StatusSnapshot>,
) -> SyncEngine<R> {
    let mut ticker = time::interval_at(Instant::now() + config.tick_period, config.tick_period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut render = time::interval_at(
        Instant::now() + config.render_period,
        config.render_period,
    );
    render.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut in_flight: Option<JoinHandle<DeltaResult>> = None;
    let mut pending = config.initial_sync.then_some(SyncKind::Incremental);

    info!(interval_secs = engine.status().interval_secs(), "scheduler started");

    loop {
        if in_flight.is_none() {
            if let Some(kind) = pending.take() {
                in_flight = start_fetch(&mut engine, kind);
            }
        }
        status_tx.send_replace(StatusSnapshot::of(&engine));

        tokio::select! {
            result = join_fetch(&mut in_flight), if in_flight.is_some() => {
                in_flight = None;
                let report = engine.complete_sync(result);
                debug!(?report, "sync finished");
            }

            _ = ticker.tick() => {
                if engine.tick() {
                    queue(&mut pending, SyncKind::Incremental);
                }
            }

            _ = render.tick() => {
                engine.render_status();
            }

            command = commands.recv() => {
                match command {
                    Some(SyncCommand::Sync(kind)) => {
                        debug!(%kind, in_flight = in_flight.is_some(), "sync requested");
                        queue(&mut pending, kind);
                    }
                    Some(SyncCommand::Shutdown) | None => break,
                }
            }
        }
    }

    if in_flight.is_some() {
        debug!("waiting for in-flight sync before stopping");
        let result = join_fetch(&mut in_flight).await;
        engine.complete_sync(result);
    }
    status_tx.send_replace(StatusSnapshot::of(&engine));

    info!("scheduler stopped");
    engine
}

/// Begin a cycle and run its fetch on a separate task.
fn start_fetch<R: RemoteSource>(
    engine: &mut SyncEngine<R>,
    kind: SyncKind,
) -> Option<JoinHandle<DeltaResult>> {
    match engine.begin_sync(kind) {
        Ok(cursor) => {
            let remote = engine.remote();
            Some(tokio::spawn(async move { remote.fetch_delta(&cursor).await }))
        }
        Err(err) => {
            warn!(%kind, error = %err, "could not start sync");
            None
        }
    }
}

/// Wait for the outstanding fetch; pends forever when there is none.
async fn join_fetch(in_flight: &mut Option<JoinHandle<DeltaResult>>) -> DeltaResult {
    match in_flight {
        Some(handle) => match handle.await {
            Ok(result) => result,
            Err(err) => DeltaResult::server_unavailable(format!("fetch task failed: {}", err)),
        },
        None => std::future::pending().await,
    }
}

/// Record a trigger in the single pending slot. A full sync supersedes an
/// incremental one.
fn queue(pending: &mut Option<SyncKind>, kind: SyncKind) {
    *pending = match (*pending, kind) {
        (Some(SyncKind::Full), _) | (_, SyncKind::Full) => Some(SyncKind::Full),
        _ => Some(SyncKind::Incremental),
    };
}
