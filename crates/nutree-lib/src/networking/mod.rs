//! Shared HTTP plumbing for remote feeds
//!
//! [`NetworkingManager`] owns the `reqwest` client and a semaphore bounding
//! concurrent requests; [`retry::RetryPolicy`] adds bounded exponential
//! backoff around anything that can fail transiently.

pub mod retry;

pub use retry::{BackoffConfig, RetryPolicy, Retryable};

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::trace;

#[derive(Debug, Error)]
pub enum NetworkingError {
    #[error("HTTP request failed: {source}")]
    RequestFailed {
        #[from]
        source: reqwest::Error,
    },

    #[error("Unexpected HTTP status {status} from {url}")]
    Status { url: String, status: StatusCode },

    #[error("Semaphore acquire error: {source}")]
    SemaphoreError {
        #[from]
        source: tokio::sync::AcquireError,
    },

    #[error("Invalid concurrency limit: {count} (must be > 0)")]
    InvalidConcurrency { count: usize },
}

impl Retryable for NetworkingError {
    fn is_transient(&self) -> bool {
        match self {
            Self::RequestFailed { source } => {
                source.is_timeout() || source.is_connect() || source.is_request()
            }
            Self::Status { status, .. } => {
                *status == StatusCode::REQUEST_TIMEOUT
                    || *status == StatusCode::TOO_MANY_REQUESTS
                    || status.is_server_error()
            }
            Self::SemaphoreError { .. } | Self::InvalidConcurrency { .. } => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NetworkingConfig {
    /// Upper bound on simultaneous HTTP requests
    pub max_concurrent_requests: usize,
    /// HTTP client timeout in seconds
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for NetworkingConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: 8,
            timeout_seconds: 30,
            user_agent: format!("nutree/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Shared HTTP client plus request concurrency limit
#[derive(Debug, Clone)]
pub struct NetworkingManager {
    client: Client,
    config: NetworkingConfig,
    semaphore: Arc<Semaphore>,
}

impl NetworkingManager {
    pub fn new(config: NetworkingConfig) -> Result<Self, NetworkingError> {
        trace!("Initializing networking manager");

        if config.max_concurrent_requests == 0 {
            return Err(NetworkingError::InvalidConcurrency {
                count: config.max_concurrent_requests,
            });
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()?;

        let semaphore = Arc::new(Semaphore::new(config.max_concurrent_requests));

        trace!(
            "Networking manager initialized with {} concurrent requests",
            config.max_concurrent_requests
        );

        Ok(Self {
            client,
            config,
            semaphore,
        })
    }

    pub fn config(&self) -> &NetworkingConfig {
        &self.config
    }

    /// GET `url` and decode the JSON body; `404` yields `Ok(None)`
    pub async fn get_json<T>(&self, url: &str) -> Result<Option<T>, NetworkingError>
    where
        T: DeserializeOwned,
    {
        let _permit = self.semaphore.acquire().await?;
        trace!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            trace!("{} returned 404", url);
            return Ok(None);
        }
        if !status.is_success() {
            return Err(NetworkingError::Status {
                url: url.to_string(),
                status,
            });
        }

        Ok(Some(response.json::<T>().await?))
    }

    /// Get HTTP client for manual requests
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    include!("mod.test.rs");
}
