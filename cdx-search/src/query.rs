//! Single-index query: request target construction and NDJSON decoding.
//!
//! One call here is one network round trip against one index partition.
//! There is no retry and no caching at this layer.

use url::Url;

use crate::error::SearchError;
use crate::transport::IndexTransport;
use crate::types::{IndexId, IndexOutcome, PageInfo, SearchResult};

/// Resolve the endpoint of `index` below `base`, e.g. `{base}CC-MAIN-2019-51-index`.
fn index_endpoint(base: &Url, index: &IndexId) -> Result<Url, SearchError> {
    let mut target = base.clone();
    target
        .path_segments_mut()
        .map_err(|()| SearchError::Config(format!("base URL {base} cannot hold a path")))?
        .pop_if_empty()
        .push(&format!("{}-index", index.collection()));
    Ok(target)
}

/// Build the search target for one index, pattern and optional page.
///
/// The pattern is passed through untouched apart from query encoding, so
/// wildcard syntax such as `*.example.com/*` reaches the service intact.
///
/// # Errors
///
/// Returns [`SearchError::Config`] if `base` cannot carry a path.
pub fn build_query_url(
    base: &Url,
    index: &IndexId,
    url_pattern: &str,
    page: Option<u32>,
) -> Result<Url, SearchError> {
    let mut target = index_endpoint(base, index)?;
    {
        let mut query = target.query_pairs_mut();
        query.append_pair("url", url_pattern).append_pair("output", "json");
        if let Some(page) = page {
            query.append_pair("page", &page.to_string());
        }
    }
    Ok(target)
}

/// Build the pagination-summary target for one index and pattern.
///
/// # Errors
///
/// Returns [`SearchError::Config`] if `base` cannot carry a path.
pub fn build_page_info_url(
    base: &Url,
    index: &IndexId,
    url_pattern: &str,
) -> Result<Url, SearchError> {
    let mut target = index_endpoint(base, index)?;
    target
        .query_pairs_mut()
        .append_pair("url", url_pattern)
        .append_pair("showNumPages", "true");
    Ok(target)
}

/// Decode a newline-delimited JSON body into records, in line order.
///
/// Blank lines are skipped. Any other line must be a JSON object.
///
/// # Errors
///
/// Returns [`SearchError::Decode`] naming the first offending line.
pub fn decode_records(body: &str) -> Result<Vec<SearchResult>, SearchError> {
    body.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str::<SearchResult>(line).map_err(|e| SearchError::Decode {
                line: idx + 1,
                message: e.to_string(),
            })
        })
        .collect()
}

/// Query one index partition for `url_pattern`.
///
/// A `200` body is decoded into [`IndexOutcome::Hits`]; any other status
/// becomes [`IndexOutcome::Miss`].
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the exchange fails and
/// [`SearchError::Decode`] if a body line is not a JSON object.
pub async fn query_index<T: IndexTransport>(
    transport: &T,
    base: &Url,
    index: &IndexId,
    url_pattern: &str,
    page: Option<u32>,
) -> Result<IndexOutcome, SearchError> {
    let target = build_query_url(base, index, url_pattern, page)?;
    tracing::trace!(%index, url_pattern, ?page, "querying index");

    let response = transport.get(&target).await?;
    if !response.is_ok() {
        tracing::debug!(%index, status = response.status, "index returned no results");
        return Ok(IndexOutcome::Miss {
            status: response.status,
        });
    }

    let results = decode_records(&response.body)?;
    tracing::debug!(%index, count = results.len(), "index returned results");
    Ok(IndexOutcome::Hits(results))
}

/// Ask one index how many result pages `url_pattern` spans.
///
/// # Errors
///
/// Returns [`SearchError::Status`] on a non-200 answer, [`SearchError::Http`]
/// if the exchange fails, and [`SearchError::Decode`] on a malformed body.
pub async fn fetch_page_info<T: IndexTransport>(
    transport: &T,
    base: &Url,
    index: &IndexId,
    url_pattern: &str,
) -> Result<PageInfo, SearchError> {
    let target = build_page_info_url(base, index, url_pattern)?;
    let response = transport.get(&target).await?;
    if !response.is_ok() {
        return Err(SearchError::Status(response.status));
    }
    serde_json::from_str(response.body.trim()).map_err(|e| SearchError::Decode {
        line: 1,
        message: e.to_string(),
    })
}
