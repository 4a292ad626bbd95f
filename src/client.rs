//! High-level client combining configuration with the search dispatcher.

use cdx_search::{
    Dispatcher, HttpTransport, IndexId, IndexInfo, PageInfo, SearchReport, SearchRequest,
    SearchResult,
};
use tokio_util::sync::CancellationToken;

use crate::config::{ClientConfig, SearchDefaults};
use crate::error::Result;

/// Client for the Common Crawl index service.
///
/// Fills in configured defaults (index set, worker pool) for searches that
/// do not specify them. When no index is configured either, every index the
/// service lists is searched.
#[derive(Debug)]
pub struct IndexClient {
    dispatcher: Dispatcher<HttpTransport>,
    defaults: SearchDefaults,
}

impl IndexClient {
    /// Build a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            dispatcher: Dispatcher::http(&config.to_search_config())?,
            defaults: config.search.clone(),
        })
    }

    /// Token that stops in-progress searches from starting further queries.
    pub fn cancel_token(&self) -> CancellationToken {
        self.dispatcher.cancel_token()
    }

    /// Collections the service currently offers, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection list cannot be fetched.
    pub async fn available_indexes(&self) -> Result<Vec<IndexInfo>> {
        Ok(self.dispatcher.list_indexes().await?)
    }

    /// Listed collections with a usable id, paired with that id.
    ///
    /// Entries that do not form a valid index id are skipped with a
    /// warning, exactly as when every listed index is searched.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection list cannot be fetched.
    pub async fn listed_indexes(&self) -> Result<Vec<(IndexId, IndexInfo)>> {
        let listed = self.available_indexes().await?;
        Ok(cdx_search::collinfo::usable_indexes(&listed)
            .into_iter()
            .map(|(id, info)| (id, info.clone()))
            .collect())
    }

    /// Pick the indexes to search: `explicit` if given, else the configured
    /// defaults, else every listed collection.
    ///
    /// # Errors
    ///
    /// Returns an error only if the collection list has to be fetched and
    /// cannot be.
    pub async fn resolve_indexes(&self, explicit: Vec<IndexId>) -> Result<Vec<IndexId>> {
        if !explicit.is_empty() {
            return Ok(explicit);
        }
        if !self.defaults.indexes.is_empty() {
            return Ok(self.defaults.indexes.clone());
        }
        let listed: Vec<IndexId> = self
            .listed_indexes()
            .await?
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        tracing::info!(count = listed.len(), "searching every listed index");
        Ok(listed)
    }

    /// Build a request for `url_pattern`, resolving indexes and applying
    /// the configured worker count unless `worker_count` overrides it.
    /// `Some(0)` turns a configured pool off.
    ///
    /// A page that will not reach the service is logged at warn level.
    ///
    /// # Errors
    ///
    /// See [`Self::resolve_indexes`].
    pub async fn request(
        &self,
        url_pattern: &str,
        indexes: Vec<IndexId>,
        page: Option<u32>,
        worker_count: Option<usize>,
    ) -> Result<SearchRequest> {
        let mut request = SearchRequest::new(url_pattern).indexes(self.resolve_indexes(indexes).await?);
        request.page = page;
        request.worker_count = worker_count.or(self.defaults.worker_count);
        if let Some(page) = request.page {
            if !request.honours_page() {
                tracing::warn!(
                    page,
                    indexes = request.indexes.len(),
                    workers = ?request.worker_count,
                    "page only applies to a single index searched without workers; ignoring it"
                );
            }
        }
        Ok(request)
    }

    /// Run `request` and return the flat result list.
    ///
    /// # Errors
    ///
    /// Returns an error only if the request is invalid.
    pub async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>> {
        Ok(self.dispatcher.search(request).await?)
    }

    /// Run `request` and return one report per index.
    ///
    /// # Errors
    ///
    /// Returns an error only if the request is invalid.
    pub async fn search_detailed(&self, request: &SearchRequest) -> Result<SearchReport> {
        Ok(self.dispatcher.search_detailed(request).await?)
    }

    /// Number of result pages `url_pattern` spans in `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if the service cannot answer.
    pub async fn page_info(&self, index: &IndexId, url_pattern: &str) -> Result<PageInfo> {
        Ok(self.dispatcher.page_info(index, url_pattern).await?)
    }
}
