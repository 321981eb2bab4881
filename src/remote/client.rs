//! HTTP client for the task service's sync endpoint.
//!
//! Performs exactly one `POST` per [`fetch_delta`](RemoteSource::fetch_delta)
//! call and classifies the result. Retries are the scheduler's business.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, warn};

use super::outcome::{Delta, DeltaResult};
use super::wire::SyncResponse;
use crate::config::SyncConfig;
use crate::core::{RemoteError, RemoteSource, SYNC_RESOURCE_TYPES};

/// Remote source backed by the service's HTTP sync API.
#[derive(Clone)]
pub struct HttpSyncClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl fmt::Debug for HttpSyncClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpSyncClient")
            .field("endpoint", &self.endpoint)
            .field("token", &"[redacted]")
            .finish()
    }
}

impl HttpSyncClient {
    /// Create a client for `endpoint` authenticating with `token`.
    pub fn new(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            token: token.into(),
        })
    }

    /// Create a client from validated configuration.
    pub fn from_config(config: &SyncConfig) -> Result<Self, RemoteError> {
        config.validate()?;
        Self::new(
            config.api_url.clone(),
            config.api_token.clone(),
            config.request_timeout,
        )
    }

    /// The endpoint this client posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl RemoteSource for HttpSyncClient {
    fn fetch_delta(&self, cursor: &str) -> impl Future<Output = DeltaResult> + Send {
        let request = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .form(&[("sync_token", cursor), ("resource_types", SYNC_RESOURCE_TYPES)]);

        async move {
            let response = match request.send().await {
                Ok(response) => response,
                Err(err) => {
                    warn!(error = %err, "sync exchange failed without a response");
                    return DeltaResult::server_unavailable(err);
                }
            };

            let status = response.status();
            if !status.is_success() {
                warn!(status = status.as_u16(), "sync endpoint answered with a failure status");
                return DeltaResult::LocalConnectivityFailure {
                    status: status.as_u16(),
                };
            }

            match response.json::<SyncResponse>().await {
                Ok(body) => {
                    debug!(
                        labels = body.labels.len(),
                        items = body.items.len(),
                        full_sync = body.full_sync,
                        "received sync delta"
                    );
                    DeltaResult::Success(Delta::from_response(body, Utc::now()))
                }
                Err(err) => {
                    warn!(error = %err, "sync response could not be decoded");
                    DeltaResult::server_unavailable(err)
                }
            }
        }
    }
}
