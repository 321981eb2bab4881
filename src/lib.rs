//! # todosync
//!
//! Incremental one-way synchronization of a remote task list.
//!
//! todosync keeps a local snapshot of a task service's favorite labels and
//! the tasks carrying them. Each sync cycle sends the last cursor to the
//! service, merges the returned delta into the snapshot and persists it.
//! It provides:
//!
//! - **Cursors**: only changes since the last successful exchange are fetched
//! - **Resilience**: failed exchanges become status, never errors, and the
//!   accumulated content stays as it was
//! - **Scheduling**: a countdown-driven loop with manual triggers and at most
//!   one exchange in flight
//! - **Pluggability**: remote source, scorer, snapshot store and observer are
//!   traits
//!
//! ## Feature Flags
//!
//! - `remote` (default): HTTP client for the service (`reqwest`)
//! - `scheduler` (default): tokio-driven sync loop
//!
//! ## Modules
//!
//! - [`core`]: Core traits, constants, and error types (always included)
//! - [`remote`]: Wire format, fetch outcomes and the HTTP client
//! - [`sync`]: Content state, merging, scoring, status and the engine
//! - [`config`]: Runtime configuration
//! - [`scheduler`]: Background loop (requires `scheduler` feature)
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use todosync::prelude::*;
//!
//! # async fn run() -> Result<(), TodosyncError> {
//! let config = SyncConfig::from_env()?;
//! let client = HttpSyncClient::from_config(&config)?;
//! let store = JsonFileStore::new(&config.snapshot_path);
//!
//! let mut engine = SyncEngine::open(client, store)?
//!     .with_merge_policy(config.merge_policy)
//!     .with_scorer(config.scorer.build());
//!
//! let report = engine.run_incremental_sync().await?;
//! println!("{} new tasks", report.tasks_added);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Core module (always included)
pub mod core;

pub mod config;
pub mod remote;
pub mod sync;

// Background loop (feature-gated)
#[cfg(feature = "scheduler")]
#[cfg_attr(docsrs, doc(cfg(feature = "scheduler")))]
pub mod scheduler;

/// Prelude module for convenient imports.
pub mod prelude {
    // Core traits and types
    pub use crate::core::*;

    pub use crate::config::{SyncConfig, SyncConfigBuilder};
    pub use crate::remote::{Delta, DeltaResult, OutcomeKind, RawLabel, RawTask, RemoteId};
    pub use crate::sync::{
        ContentState, DueDateScorer, JsonFileStore, Label, MemoryStore, MergePolicy,
        RandomScorer, ScorePolicy, StatusLabel, StatusTone, SyncEngine, SyncKind, SyncReport,
        SyncStatus, Task,
    };

    #[cfg(feature = "remote")]
    pub use crate::remote::HttpSyncClient;

    #[cfg(feature = "scheduler")]
    pub use crate::scheduler::{SchedulerConfig, StatusSnapshot, SyncHandle};
}

// Re-export commonly used items at crate root
pub use core::{SyncError, TodosyncError};
pub use sync::{ContentState, SyncEngine, SyncStatus};

#[cfg(feature = "remote")]
pub use remote::HttpSyncClient;
