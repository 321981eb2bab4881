//! Error types for todosync.
//!
//! Fetch failures are not errors: they are recovered into a
//! [`DeltaResult`](crate::remote::DeltaResult) variant and surface as sync
//! status. The enums here cover everything that genuinely cannot proceed.

use thiserror::Error;

/// Errors from the snapshot store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the snapshot failed.
    #[error("snapshot i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot exists but is not valid JSON for a content state.
    #[error("corrupt snapshot: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Errors from the sync engine.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A sync cycle was started while another one is awaiting its response.
    #[error("a sync is already in flight")]
    AlreadyInFlight,

    /// The scheduler loop has exited.
    #[error("scheduler is no longer running")]
    SchedulerStopped,

    /// The snapshot could not be loaded.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No API token was provided.
    #[error("missing API token (set TODOSYNC_API_TOKEN)")]
    MissingToken,

    /// The endpoint URL is not an http(s) URL.
    #[error("invalid API url: {0}")]
    InvalidUrl(String),

    /// The sync interval must be at least one second.
    #[error("sync interval must be at least 1 second")]
    InvalidInterval,

    /// A setting could not be parsed.
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Setting name.
        key: &'static str,
        /// Rejected value.
        value: String,
    },
}

/// Errors constructing the remote client.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The HTTP client could not be built.
    #[cfg(feature = "remote")]
    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),

    /// The client configuration is unusable.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Top-level todosync errors.
#[derive(Debug, Error)]
pub enum TodosyncError {
    /// Sync error.
    #[error("sync error: {0}")]
    Sync(#[from] SyncError),

    /// Store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Remote client error.
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    /// I/O error.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_converts_into_sync_error() {
        let err: SyncError = StoreError::Io(std::io::Error::other("disk full")).into();
        assert!(matches!(err, SyncError::Store(StoreError::Io(_))));
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn test_config_error_message_names_key() {
        let err = ConfigError::InvalidValue {
            key: "TODOSYNC_SCORER",
            value: "fancy".to_string(),
        };
        assert_eq!(err.to_string(), "invalid value for TODOSYNC_SCORER: \"fancy\"");
    }
}
