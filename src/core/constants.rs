//! Sync constants.
//!
//! Values shared between the engine, the scheduler and the remote client.
//! Anything a deployment may want to change is also exposed through
//! [`SyncConfig`](crate::config::SyncConfig); these are the defaults.

use std::time::Duration;

// =============================================================================
// SYNC CURSOR
// =============================================================================

/// Cursor sentinel asking the remote service to resend everything.
pub const FULL_SYNC_CURSOR: &str = "*";

// =============================================================================
// TIMING
// =============================================================================

/// Seconds between automatic sync attempts.
pub const DEFAULT_SYNC_INTERVAL_SECS: u32 = 30;

/// Period of the countdown tick.
pub const COUNTDOWN_TICK_PERIOD: Duration = Duration::from_secs(1);

/// Period of the status re-render, independent of new data.
pub const STATUS_RENDER_PERIOD: Duration = Duration::from_secs(6);

/// Upper bound for a single exchange with the remote endpoint.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// =============================================================================
// REMOTE ENDPOINT
// =============================================================================

/// Default sync endpoint of the task service.
pub const DEFAULT_API_URL: &str = "https://api.todoist.com/api/v1/sync";

/// Resource types requested on every exchange (JSON array, form-encoded).
pub const SYNC_RESOURCE_TYPES: &str = r#"["items","labels"]"#;

// =============================================================================
// SCORING
// =============================================================================

/// Exclusive upper bound of task scores.
pub const SCORE_UPPER_BOUND: i64 = 300;

// =============================================================================
// PERSISTENCE
// =============================================================================

/// Default snapshot file name.
pub const DEFAULT_SNAPSHOT_FILE: &str = "todosync-snapshot.json";
