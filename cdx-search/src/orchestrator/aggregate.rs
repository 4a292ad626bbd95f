//! Merging of per-index outcomes into one result list.
//!
//! Concatenation only: no dedup, no sorting, no filtering. Each record in
//! a [`SearchReport`] stays attached to the index that produced it; the
//! flat list from [`flatten`] drops that attribution.

use crate::error::SearchError;
use crate::types::{IndexId, IndexOutcome, SearchResult};

/// What one index contributed to a search.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexReport {
    /// The index that was queried.
    pub index: IndexId,
    /// Its outcome, or the error that isolated it from its siblings.
    pub outcome: Result<IndexOutcome, SearchError>,
}

impl IndexReport {
    /// Records from this index; misses and failures contribute none.
    pub fn results(&self) -> &[SearchResult] {
        match &self.outcome {
            Ok(outcome) => outcome.results(),
            Err(_) => &[],
        }
    }
}

/// Per-index outcomes of one search, in index submission order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchReport {
    reports: Vec<IndexReport>,
}

impl SearchReport {
    /// Wrap per-index reports, kept in the given order.
    pub fn new(reports: Vec<IndexReport>) -> Self {
        Self { reports }
    }

    /// Every per-index report.
    pub fn reports(&self) -> &[IndexReport] {
        &self.reports
    }

    /// All records across indexes, index by index.
    pub fn results(&self) -> impl Iterator<Item = &SearchResult> {
        self.reports.iter().flat_map(|report| report.results().iter())
    }

    /// Total number of records across indexes.
    pub fn total_results(&self) -> usize {
        self.reports.iter().map(|report| report.results().len()).sum()
    }

    /// Indexes whose query failed, with the error.
    pub fn failures(&self) -> Vec<(&IndexId, &SearchError)> {
        self.reports
            .iter()
            .filter_map(|report| match &report.outcome {
                Err(err) => Some((&report.index, err)),
                Ok(_) => None,
            })
            .collect()
    }

    /// Indexes that answered with a non-success status, with the status.
    pub fn misses(&self) -> Vec<(&IndexId, u16)> {
        self.reports
            .iter()
            .filter_map(|report| match &report.outcome {
                Ok(IndexOutcome::Miss { status }) => Some((&report.index, *status)),
                _ => None,
            })
            .collect()
    }

    /// Whether every index answered with HTTP 200.
    pub fn is_complete(&self) -> bool {
        self.reports
            .iter()
            .all(|report| matches!(report.outcome, Ok(IndexOutcome::Hits(_))))
    }

    /// Consume the report into the flat result list.
    pub fn into_results(self) -> Vec<SearchResult> {
        flatten(self.reports)
    }
}

/// Concatenate per-index results in report order.
///
/// Misses and failed indexes contribute nothing.
pub fn flatten(reports: Vec<IndexReport>) -> Vec<SearchResult> {
    let mut merged = Vec::new();
    for report in reports {
        if let Ok(outcome) = report.outcome {
            merged.extend(outcome.into_results());
        }
    }
    merged
}
