//! # cdx-search
//!
//! Concurrent URL-pattern search over the Common Crawl CDX index service.
//!
//! A single pattern (e.g. `reddit.com/r/MachineLearning/*`) is sent to any
//! number of dated index partitions (e.g. `2019-51`), and the
//! newline-delimited JSON records each partition returns are merged into
//! one list.
//!
//! ## Design
//!
//! - One index, no pool: a single request, honouring an optional page
//! - Several indexes, no pool: one request at a time, in the given order
//! - Pool of `n` workers: one task per index, at most `n` in flight
//! - Per-index isolation: a failing index never aborts its siblings
//! - Two views of a search: a flat list ([`Dispatcher::search`]) that treats
//!   non-200 answers as empty, and a per-index [`SearchReport`]
//!   ([`Dispatcher::search_detailed`]) that keeps misses and errors apart
//!
//! ## Security
//!
//! - No credentials of any kind
//! - No network listeners — this is a library, not a server
//! - Search patterns are logged only at trace level

pub mod collinfo;
pub mod config;
pub mod error;
pub mod http;
pub mod orchestrator;
pub mod query;
pub mod request;
pub mod transport;
pub mod types;

pub use config::SearchConfig;
pub use error::{Result, SearchError};
pub use http::HttpTransport;
pub use orchestrator::aggregate::{IndexReport, SearchReport};
pub use orchestrator::dispatch::{Dispatcher, Strategy};
pub use orchestrator::pool::WorkerPool;
pub use request::SearchRequest;
pub use transport::{IndexTransport, TransportResponse};
pub use types::{IndexId, IndexInfo, IndexOutcome, PageInfo, SearchResult};

/// Search the configured index service and return the flat result list.
///
/// Builds an HTTP [`Dispatcher`] for `config` and runs `request` on it.
/// Indexes that answer with a non-200 status, or fail, contribute no
/// records.
///
/// # Errors
///
/// Returns [`SearchError::Config`] if `config` or `request` is invalid, and
/// [`SearchError::Http`] if the HTTP client cannot be built.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> cdx_search::Result<()> {
/// let request = cdx_search::SearchRequest::new("reddit.com/r/MachineLearning/*")
///     .index(cdx_search::IndexId::new("2019-51")?);
/// let results = cdx_search::search(&request, &cdx_search::SearchConfig::default()).await?;
/// for result in &results {
///     println!("{:?} {:?}", result.timestamp(), result.url());
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(request: &SearchRequest, config: &SearchConfig) -> Result<Vec<SearchResult>> {
    Dispatcher::http(config)?.search(request).await
}

/// Search the configured index service and return one report per index.
///
/// # Errors
///
/// Same as [`search`]. Per-index errors are carried inside the report.
pub async fn search_detailed(request: &SearchRequest, config: &SearchConfig) -> Result<SearchReport> {
    Dispatcher::http(config)?.search_detailed(request).await
}

/// List the collections the configured index service offers.
///
/// # Errors
///
/// Returns [`SearchError::Status`], [`SearchError::Http`] or
/// [`SearchError::Decode`] if the collection list cannot be fetched.
pub async fn list_indexes(config: &SearchConfig) -> Result<Vec<IndexInfo>> {
    Dispatcher::http(config)?.list_indexes().await
}
