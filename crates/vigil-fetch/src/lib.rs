//! Vigil Fetch - HTTP implementation of the `Fetcher` capability.
//!
//! A thin `reqwest` wrapper that owns transport policy for page checks:
//! timeouts, redirect following, TLS, and a browser-like user agent (many
//! monitored sites serve reduced or blocked content to obvious bot agents).
//! No retries happen here; transient failures surface as `FetchError` and
//! become a normal `Error` status upstream.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

use async_trait::async_trait;
use std::time::Duration;
use vigil_core::{FetchConfig, FetchError, Fetcher};

/// HTTP fetcher over a shared `reqwest` client.
///
/// Cheap to clone; the underlying client pools connections.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with default transport settings.
    pub fn new() -> Result<Self, FetchError> {
        Self::from_config(&FetchConfig::default())
    }

    /// Create a fetcher from the `[fetch]` configuration section.
    pub fn from_config(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| FetchError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    fn map_error(url: &str, error: &reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else if error.is_builder() {
            FetchError::InvalidUrl {
                url: url.to_string(),
                reason: error.to_string(),
            }
        } else {
            FetchError::Transport(error.to_string())
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Self::map_error(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Fetch of {} returned HTTP {}", url, status.as_u16());
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.text().await.map_err(|e| Self::map_error(url, &e))
    }
}
