//! reqwest-backed transport for the index service.
//!
//! Provides a configured [`reqwest::Client`] with the configured timeout,
//! User-Agent and transparent compression.

use std::time::Duration;

use url::Url;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::transport::{IndexTransport, TransportResponse};

/// Build a [`reqwest::Client`] configured for the index service.
///
/// The client has:
/// - Timeout from config
/// - User-Agent from config (or `comcrawl/<version>`)
/// - Brotli and gzip decompression
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the client cannot be constructed.
pub fn build_client(config: &SearchConfig) -> Result<reqwest::Client, SearchError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(config.user_agent())
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))
}

/// Production [`IndexTransport`] over a shared [`reqwest::Client`].
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport using a client built from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the client cannot be constructed.
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        Ok(Self {
            client: build_client(config)?,
        })
    }

    /// Wrap an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl IndexTransport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<TransportResponse, SearchError> {
        tracing::trace!(%url, "index request");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("request failed: {e}")))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| SearchError::Http(format!("response read failed: {e}")))?;

        tracing::trace!(status, bytes = body.len(), "index response received");
        TransportResponse::from_bytes(status, &body)
    }
}
