//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls where the index service lives and how each
//! request is made. Per-call choices (indexes, page, worker count) live on
//! [`crate::SearchRequest`] instead.

use url::Url;

use crate::error::SearchError;

/// Public Common Crawl index server.
pub const DEFAULT_BASE_URL: &str = "https://index.commoncrawl.org";

/// Configuration for talking to the index service.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Root of the index service. Index endpoints are resolved below it.
    pub base_url: String,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// User-Agent sent with every request. If `None`, `comcrawl/<version>`.
    pub user_agent: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: 30,
            user_agent: None,
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `timeout_seconds` must be greater than 0
    /// - `base_url` must be an absolute `http` or `https` URL
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        self.parsed_base_url()?;
        Ok(())
    }

    /// Parse `base_url`, ensuring it can serve as a base for index paths.
    pub(crate) fn parsed_base_url(&self) -> Result<Url, SearchError> {
        let mut base = Url::parse(&self.base_url)
            .map_err(|e| SearchError::Config(format!("invalid base_url {:?}: {e}", self.base_url)))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(SearchError::Config(format!(
                "base_url must use http or https, got {:?}",
                base.scheme()
            )));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(base)
    }

    /// The User-Agent header value to send.
    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("comcrawl/{}", env!("CARGO_PKG_VERSION")))
    }
}
