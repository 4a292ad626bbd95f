//! Error types for the comcrawl client.

/// Top-level error type for the client and CLI.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Configuration file or value error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Index service error.
    #[error(transparent)]
    Search(#[from] cdx_search::SearchError),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, ClientError>;
