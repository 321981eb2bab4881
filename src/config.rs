//! Runtime configuration
//!
//! Settings come from defaults, then environment variables, then whatever a
//! caller sets explicitly through [`SyncConfigBuilder`].

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::{
    ConfigError, DEFAULT_API_URL, DEFAULT_REQUEST_TIMEOUT, DEFAULT_SNAPSHOT_FILE,
    DEFAULT_SYNC_INTERVAL_SECS,
};
use crate::sync::{MergePolicy, ScorePolicy};

/// Environment variable holding the endpoint URL.
pub const ENV_API_URL: &str = "TODOSYNC_API_URL";
/// Environment variable holding the bearer token.
pub const ENV_API_TOKEN: &str = "TODOSYNC_API_TOKEN";
/// Environment variable holding the snapshot path.
pub const ENV_SNAPSHOT: &str = "TODOSYNC_SNAPSHOT";
/// Environment variable holding the sync interval in seconds.
pub const ENV_INTERVAL_SECS: &str = "TODOSYNC_INTERVAL_SECS";
/// Environment variable holding the request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "TODOSYNC_TIMEOUT_SECS";
/// Environment variable selecting the merge policy.
pub const ENV_MERGE_POLICY: &str = "TODOSYNC_MERGE_POLICY";
/// Environment variable selecting the scorer.
pub const ENV_SCORER: &str = "TODOSYNC_SCORER";

/// Sync configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Sync endpoint.
    pub api_url: String,

    /// Bearer token for the endpoint.
    pub api_token: String,

    /// Snapshot file.
    pub snapshot_path: PathBuf,

    /// Seconds between automatic syncs.
    pub interval_secs: u32,

    /// Upper bound for one exchange.
    pub request_timeout: Duration,

    /// How deltas combine with accumulated content.
    pub merge_policy: MergePolicy,

    /// How merged tasks are ranked.
    pub scorer: ScorePolicy,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_token: String::new(),
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_FILE),
            interval_secs: DEFAULT_SYNC_INTERVAL_SECS,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            merge_policy: MergePolicy::default(),
            scorer: ScorePolicy::default(),
        }
    }
}

impl fmt::Debug for SyncConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncConfig")
            .field("api_url", &self.api_url)
            .field("api_token", &"[REDACTED]")
            .field("snapshot_path", &self.snapshot_path)
            .field("interval_secs", &self.interval_secs)
            .field("request_timeout", &self.request_timeout)
            .field("merge_policy", &self.merge_policy)
            .field("scorer", &self.scorer)
            .finish()
    }
}

impl SyncConfig {
    /// Start a builder from the defaults.
    pub fn builder() -> SyncConfigBuilder {
        SyncConfigBuilder::new()
    }

    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by `lookup`, which maps a variable name to its
    /// value. Unset and empty variables keep the default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = get(ENV_API_URL) {
            config.api_url = url;
        }
        if let Some(token) = get(ENV_API_TOKEN) {
            config.api_token = token;
        }
        if let Some(path) = get(ENV_SNAPSHOT) {
            config.snapshot_path = PathBuf::from(path);
        }
        if let Some(secs) = get(ENV_INTERVAL_SECS) {
            config.interval_secs = parse_number(ENV_INTERVAL_SECS, &secs)?;
        }
        if let Some(secs) = get(ENV_TIMEOUT_SECS) {
            config.request_timeout = Duration::from_secs(parse_number(ENV_TIMEOUT_SECS, &secs)?);
        }
        if let Some(policy) = get(ENV_MERGE_POLICY) {
            config.merge_policy = policy.parse()?;
        }
        if let Some(scorer) = get(ENV_SCORER) {
            config.scorer = scorer.parse()?;
        }

        Ok(config)
    }

    /// Check the settings a sync cannot run without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_token.trim().is_empty() {
            return Err(ConfigError::MissingToken);
        }
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(self.api_url.clone()));
        }
        if self.interval_secs == 0 {
            return Err(ConfigError::InvalidInterval);
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        })
}

/// Builder for [`SyncConfig`].
#[derive(Debug, Default)]
pub struct SyncConfigBuilder {
    config: SyncConfig,
}

impl SyncConfigBuilder {
    /// Create a builder from the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder from an existing configuration.
    pub fn from_config(config: SyncConfig) -> Self {
        Self { config }
    }

    /// Set the endpoint URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the bearer token.
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.config.api_token = token.into();
        self
    }

    /// Set the snapshot file.
    pub fn snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.snapshot_path = path.into();
        self
    }

    /// Set the sync interval in seconds.
    pub fn interval_secs(mut self, secs: u32) -> Self {
        self.config.interval_secs = secs;
        self
    }

    /// Set the request timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Set the merge policy.
    pub fn merge_policy(mut self, policy: MergePolicy) -> Self {
        self.config.merge_policy = policy;
        self
    }

    /// Set the scoring policy.
    pub fn scorer(mut self, scorer: ScorePolicy) -> Self {
        self.config.scorer = scorer;
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<SyncConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.interval_secs, 30);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.merge_policy, MergePolicy::Append);
        assert_eq!(config.scorer, ScorePolicy::Random);
        assert_eq!(config.validate(), Err(ConfigError::MissingToken));
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = SyncConfig::from_lookup(lookup(&[
            (ENV_API_URL, "http://localhost:8080/sync"),
            (ENV_API_TOKEN, "secret"),
            (ENV_SNAPSHOT, "/tmp/board.json"),
            (ENV_INTERVAL_SECS, "45"),
            (ENV_TIMEOUT_SECS, "5"),
            (ENV_MERGE_POLICY, "replace-on-full-sync"),
            (ENV_SCORER, "due-date"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "http://localhost:8080/sync");
        assert_eq!(config.api_token, "secret");
        assert_eq!(config.snapshot_path, PathBuf::from("/tmp/board.json"));
        assert_eq!(config.interval_secs, 45);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.merge_policy, MergePolicy::ReplaceOnFullSync);
        assert_eq!(config.scorer, ScorePolicy::DueDate);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_values_keep_defaults() {
        let config =
            SyncConfig::from_lookup(lookup(&[(ENV_API_URL, ""), (ENV_INTERVAL_SECS, "  ")]))
                .unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.interval_secs, 30);
    }

    #[test]
    fn test_invalid_number_is_rejected() {
        let err = SyncConfig::from_lookup(lookup(&[(ENV_INTERVAL_SECS, "soon")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: ENV_INTERVAL_SECS,
                value: "soon".to_string(),
            }
        );
    }

    #[test]
    fn test_invalid_policy_is_rejected() {
        let err = SyncConfig::from_lookup(lookup(&[(ENV_MERGE_POLICY, "overwrite")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_validate() {
        let valid = || SyncConfig::builder().api_token("t");

        assert!(valid().build().is_ok());
        assert_eq!(
            valid().api_url("ftp://example.com").build(),
            Err(ConfigError::InvalidUrl("ftp://example.com".to_string()))
        );
        assert_eq!(
            valid().interval_secs(0).build(),
            Err(ConfigError::InvalidInterval)
        );
        assert_eq!(
            SyncConfig::builder().api_token("   ").build(),
            Err(ConfigError::MissingToken)
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = SyncConfig::builder().api_token("super-secret").build().unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
