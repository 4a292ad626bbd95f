//! Error types for the cdx-search crate.
//!
//! All errors use stable string messages suitable for display to users
//! and programmatic handling. A non-200 answer from the search endpoint
//! is not an error; see [`crate::types::IndexOutcome::Miss`].

/// Errors that can occur while querying the index service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// The HTTP request could not be completed (connect, DNS, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The service answered with a non-success status on an endpoint
    /// where an empty answer is not meaningful.
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// A response line was not a JSON object.
    #[error("decode error at line {line}: {message}")]
    Decode {
        /// 1-based line number within the response body.
        line: usize,
        /// Underlying parser message.
        message: String,
    },

    /// Invalid search request or configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The search was cancelled before this task started.
    #[error("search cancelled")]
    Cancelled,

    /// A worker task panicked or was aborted.
    #[error("worker task failed: {0}")]
    Task(String),
}

/// Convenience type alias for cdx-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
