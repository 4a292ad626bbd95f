//! Core search dispatcher: strategy selection and multi-index fan-out.
//!
//! A request is turned into one of three explicit [`Strategy`] values and
//! executed against a shared [`IndexTransport`]. Every index gets its own
//! [`IndexReport`]; a failing index never aborts its siblings.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use url::Url;

use crate::collinfo::fetch_index_list;
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http::HttpTransport;
use crate::query::{fetch_page_info, query_index};
use crate::request::SearchRequest;
use crate::transport::IndexTransport;
use crate::types::{IndexId, IndexInfo, PageInfo, SearchResult};

use super::aggregate::{IndexReport, SearchReport};
use super::pool::WorkerPool;

/// How a validated request is executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// One index, no pool: a single query honouring the requested page.
    Single {
        /// The only index.
        index: IndexId,
        /// Requested page, if any.
        page: Option<u32>,
    },
    /// No pool, zero or several indexes: one query at a time, in order,
    /// always for the default page.
    Sequential {
        /// Indexes in submission order.
        indexes: Vec<IndexId>,
    },
    /// Pool of at least one worker: one task per index, at most `workers` in flight,
    /// always for the default page.
    Concurrent {
        /// Indexes in submission order.
        indexes: Vec<IndexId>,
        /// Pool size.
        workers: usize,
    },
}

impl Strategy {
    /// Validate `request` and pick its execution strategy.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the request is invalid.
    pub fn select(request: &SearchRequest) -> Result<Self, SearchError> {
        request.validate()?;
        let strategy = match (request.pool_size(), request.indexes.as_slice()) {
            (Some(workers), indexes) => Self::Concurrent {
                indexes: indexes.to_vec(),
                workers,
            },
            (None, [index]) => Self::Single {
                index: index.clone(),
                page: request.page,
            },
            (None, indexes) => Self::Sequential {
                indexes: indexes.to_vec(),
            },
        };

        if request.page.is_some() && !request.honours_page() {
            tracing::debug!(
                indexes = request.indexes.len(),
                "page is only honoured for a single index without a worker pool; ignoring it"
            );
        }
        Ok(strategy)
    }
}

/// Runs searches against one index service.
///
/// Owns the transport (shared with worker tasks through an [`Arc`]) and a
/// cancellation token. Cancelling stops new index queries from starting;
/// queries already in flight complete.
#[derive(Debug)]
pub struct Dispatcher<T> {
    transport: Arc<T>,
    base: Url,
    cancel: CancellationToken,
}

impl Dispatcher<HttpTransport> {
    /// Dispatcher over a reqwest transport built from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] for an invalid config and
    /// [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn http(config: &SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        Self::new(HttpTransport::new(config)?, config)
    }
}

impl<T: IndexTransport + 'static> Dispatcher<T> {
    /// Dispatcher over `transport`, resolving index endpoints below
    /// `config.base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the base URL is invalid.
    pub fn new(transport: T, config: &SearchConfig) -> Result<Self, SearchError> {
        Self::with_shared_transport(Arc::new(transport), config)
    }

    /// Like [`Self::new`] for a transport the caller keeps a handle to.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the base URL is invalid.
    pub fn with_shared_transport(transport: Arc<T>, config: &SearchConfig) -> Result<Self, SearchError> {
        Ok(Self {
            transport,
            base: config.parsed_base_url()?,
            cancel: CancellationToken::new(),
        })
    }

    /// Replace the cancellation token, e.g. with a child of an app-wide one.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that stops this dispatcher from starting further queries.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Search and return the flat result list.
    ///
    /// Misses and failed indexes contribute nothing; failures are logged
    /// at warn level. Use [`Self::search_detailed`] to tell them apart.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] only if the request is invalid.
    pub async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>, SearchError> {
        Ok(self.search_detailed(request).await?.into_results())
    }

    /// Search and return one report per index, in submission order.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] only if the request is invalid.
    /// Per-index errors are carried inside the report.
    pub async fn search_detailed(&self, request: &SearchRequest) -> Result<SearchReport, SearchError> {
        let strategy = Strategy::select(request)?;
        tracing::trace!(url_pattern = %request.url_pattern, ?strategy, "dispatching search");

        let pattern = request.url_pattern.as_str();
        let reports = match strategy {
            Strategy::Single { index, page } => vec![self.run_one(index, pattern, page).await],
            Strategy::Sequential { indexes } => {
                let mut reports = Vec::with_capacity(indexes.len());
                for index in indexes {
                    reports.push(self.run_one(index, pattern, None).await);
                }
                reports
            }
            Strategy::Concurrent { indexes, workers } => {
                self.run_concurrent(indexes, pattern, workers).await?
            }
        };

        for report in &reports {
            if let Err(err) = &report.outcome {
                tracing::warn!(index = %report.index, error = %err, "index query failed");
            }
        }

        let report = SearchReport::new(reports);
        tracing::debug!(
            indexes = report.reports().len(),
            results = report.total_results(),
            failures = report.failures().len(),
            "search finished"
        );
        Ok(report)
    }

    /// Number of result pages `url_pattern` spans in `index`.
    ///
    /// # Errors
    ///
    /// See [`fetch_page_info`].
    pub async fn page_info(&self, index: &IndexId, url_pattern: &str) -> Result<PageInfo, SearchError> {
        fetch_page_info(self.transport.as_ref(), &self.base, index, url_pattern).await
    }

    /// Collections the service currently offers.
    ///
    /// # Errors
    ///
    /// See [`fetch_index_list`].
    pub async fn list_indexes(&self) -> Result<Vec<IndexInfo>, SearchError> {
        fetch_index_list(self.transport.as_ref(), &self.base).await
    }

    async fn run_one(&self, index: IndexId, pattern: &str, page: Option<u32>) -> IndexReport {
        let outcome = if self.cancel.is_cancelled() {
            Err(SearchError::Cancelled)
        } else {
            query_index(self.transport.as_ref(), &self.base, &index, pattern, page).await
        };
        IndexReport { index, outcome }
    }

    async fn run_concurrent(
        &self,
        indexes: Vec<IndexId>,
        pattern: &str,
        workers: usize,
    ) -> Result<Vec<IndexReport>, SearchError> {
        let pool = WorkerPool::new(workers)?;
        let pattern: Arc<str> = Arc::from(pattern);

        let outcomes = pool
            .run(indexes.clone(), &self.cancel, |index: IndexId| {
                let transport = Arc::clone(&self.transport);
                let base = self.base.clone();
                let pattern = Arc::clone(&pattern);
                async move { query_index(transport.as_ref(), &base, &index, &pattern, None).await }
            })
            .await;

        Ok(indexes
            .into_iter()
            .zip(outcomes)
            .map(|(index, outcome)| IndexReport { index, outcome })
            .collect())
    }
}
