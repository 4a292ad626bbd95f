//! Per-call search input.

use crate::error::SearchError;
use crate::types::IndexId;

/// One URL-pattern search across a set of index partitions.
///
/// Built per call and consumed by [`crate::Dispatcher`]; nothing is retained.
///
/// ```
/// use cdx_search::{IndexId, SearchRequest};
///
/// # fn main() -> cdx_search::Result<()> {
/// let request = SearchRequest::new("reddit.com/r/MachineLearning/*")
///     .index(IndexId::new("2019-51")?)
///     .index(IndexId::new("2019-47")?)
///     .workers(4);
/// assert_eq!(request.indexes.len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Search key; may carry wildcard syntax the service understands.
    pub url_pattern: String,
    /// Index partitions to query, in submission order.
    pub indexes: Vec<IndexId>,
    /// Result page. Only honoured when exactly one index is queried without
    /// a worker pool.
    pub page: Option<u32>,
    /// Size of the worker pool. `Some(n)` with `n > 0` runs the indexes
    /// concurrently with at most `n` queries in flight; `None` and `Some(0)`
    /// run them on the caller's task.
    pub worker_count: Option<usize>,
}

impl SearchRequest {
    /// A request for `url_pattern` with no indexes, page or pool yet.
    pub fn new(url_pattern: impl Into<String>) -> Self {
        Self {
            url_pattern: url_pattern.into(),
            indexes: Vec::new(),
            page: None,
            worker_count: None,
        }
    }

    /// Append one index.
    pub fn index(mut self, index: IndexId) -> Self {
        self.indexes.push(index);
        self
    }

    /// Append several indexes, keeping their order.
    pub fn indexes(mut self, indexes: impl IntoIterator<Item = IndexId>) -> Self {
        self.indexes.extend(indexes);
        self
    }

    /// Request a specific result page.
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Run the indexes on a pool of `workers` concurrent queries.
    ///
    /// `0` means no pool.
    pub fn workers(mut self, workers: usize) -> Self {
        self.worker_count = Some(workers);
        self
    }

    /// Pool size, if this request runs on a worker pool at all.
    pub fn pool_size(&self) -> Option<usize> {
        self.worker_count.filter(|workers| *workers > 0)
    }

    /// Whether the requested page reaches the service: one index, no pool.
    pub fn honours_page(&self) -> bool {
        self.indexes.len() == 1 && self.pool_size().is_none()
    }

    /// Validates this request.
    ///
    /// Checks:
    /// - `url_pattern` must not be blank
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.url_pattern.trim().is_empty() {
            return Err(SearchError::Config("url pattern must not be empty".into()));
        }
        Ok(())
    }
}
