//! Listing of the index partitions the service currently offers.

use url::Url;

use crate::error::SearchError;
use crate::transport::IndexTransport;
use crate::types::{IndexId, IndexInfo};

/// Path of the collection list below the service root.
const COLLINFO_PATH: &str = "collinfo.json";

/// Fetch the service's collection list, newest first as the service orders it.
///
/// # Errors
///
/// Returns [`SearchError::Status`] on a non-200 answer, [`SearchError::Http`]
/// if the exchange fails, and [`SearchError::Decode`] if the body is not a
/// JSON array of collection entries.
pub async fn fetch_index_list<T: IndexTransport>(
    transport: &T,
    base: &Url,
) -> Result<Vec<IndexInfo>, SearchError> {
    let target = base
        .join(COLLINFO_PATH)
        .map_err(|e| SearchError::Config(format!("cannot resolve {COLLINFO_PATH}: {e}")))?;

    let response = transport.get(&target).await?;
    if !response.is_ok() {
        return Err(SearchError::Status(response.status));
    }

    let indexes: Vec<IndexInfo> =
        serde_json::from_str(&response.body).map_err(|e| SearchError::Decode {
            line: e.line(),
            message: e.to_string(),
        })?;
    tracing::debug!(count = indexes.len(), "fetched index list");
    Ok(indexes)
}

/// Listed collections paired with their short identifiers.
///
/// Entries whose id does not form a valid [`IndexId`] are skipped with a
/// warning.
pub fn usable_indexes(indexes: &[IndexInfo]) -> Vec<(IndexId, &IndexInfo)> {
    indexes
        .iter()
        .filter_map(|info| match info.index_id() {
            Ok(id) => Some((id, info)),
            Err(err) => {
                tracing::warn!(id = %info.id, error = %err, "skipping unusable collection entry");
                None
            }
        })
        .collect()
}

/// Short identifiers of every listed collection, skipping unusable entries.
pub fn index_ids(indexes: &[IndexInfo]) -> Vec<IndexId> {
    usable_indexes(indexes).into_iter().map(|(id, _)| id).collect()
}
