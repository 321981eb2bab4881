//! Health check endpoint.
//!
//! Serves the scheduler's latest status snapshot over HTTP.

use std::net::SocketAddr;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use todosync::scheduler::{StatusSnapshot, SyncHandle};
use tracing::info;

/// Health report.
#[derive(Debug, Clone, serde::Serialize)]
pub struct HealthReport {
    /// Whether the sync endpoint was reachable on the last attempt.
    pub healthy: bool,
    /// Whether a first sync attempt has completed.
    pub ready: bool,
    /// Latest scheduler snapshot.
    pub sync: StatusSnapshot,
}

impl HealthReport {
    /// Assess a snapshot.
    pub fn assess(sync: StatusSnapshot) -> Self {
        Self {
            healthy: !sync.status.is_server_down(),
            ready: sync.status.label().is_some(),
            sync,
        }
    }
}

fn respond(report: HealthReport, ok: bool) -> impl IntoResponse {
    let code = if ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(report))
}

/// Health check handler.
async fn health_handler(State(handle): State<SyncHandle>) -> impl IntoResponse {
    let report = HealthReport::assess(handle.status());
    let ok = report.healthy;
    respond(report, ok)
}

/// Readiness handler: OK once the first sync attempt finished.
async fn ready_handler(State(handle): State<SyncHandle>) -> impl IntoResponse {
    let report = HealthReport::assess(handle.status());
    let ok = report.ready;
    respond(report, ok)
}

/// Liveness handler (OK while the scheduler accepts commands).
async fn live_handler(State(handle): State<SyncHandle>) -> impl IntoResponse {
    if handle.is_running() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// Routes of the health server.
pub fn router(handle: SyncHandle) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/live", get(live_handler))
        .with_state(handle)
}

/// Start the health check server.
pub async fn start_health_server(bind_addr: SocketAddr, handle: SyncHandle) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!(addr = %listener.local_addr()?, "health server listening");

    axum::serve(listener, router(handle)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use todosync::remote::OutcomeKind;
    use todosync::sync::SyncStatus;

    fn snapshot(outcome: Option<OutcomeKind>) -> StatusSnapshot {
        let mut status = SyncStatus::new();
        if let Some(outcome) = outcome {
            status.apply_outcome(outcome);
        }
        StatusSnapshot {
            status,
            updated_at: None,
            in_flight: false,
            labels: 0,
            tasks: 0,
        }
    }

    #[test]
    fn test_not_ready_before_first_attempt() {
        let report = HealthReport::assess(snapshot(None));
        assert!(report.healthy);
        assert!(!report.ready);
    }

    #[test]
    fn test_server_down_is_unhealthy() {
        let report = HealthReport::assess(snapshot(Some(OutcomeKind::ServerDown)));
        assert!(!report.healthy);
        assert!(report.ready);
    }

    #[test]
    fn test_offline_is_still_healthy() {
        let report = HealthReport::assess(snapshot(Some(OutcomeKind::Offline)));
        assert!(report.healthy);
        assert!(report.ready);
    }

    #[test]
    fn test_report_serializes_snapshot() {
        let report = HealthReport::assess(snapshot(Some(OutcomeKind::Success)));
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["healthy"], true);
        assert_eq!(value["sync"]["status"]["label"], "Online");
        assert_eq!(value["sync"]["status"]["next_update_seconds"], 30);
        assert_eq!(value["sync"]["inFlight"], false);
    }
}
