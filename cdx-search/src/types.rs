//! Core types for index identifiers, archive records and per-index outcomes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::SearchError;

/// Prefix the service uses for full collection ids (`CC-MAIN-2019-51`).
const COLLECTION_PREFIX: &str = "CC-MAIN-";

/// Suffix of the index endpoint path segment (`CC-MAIN-2019-51-index`).
const INDEX_SUFFIX: &str = "-index";

/// Identifier of one dated index partition, e.g. `2019-51`.
///
/// Opaque to this crate apart from being non-empty. Full collection ids
/// (`CC-MAIN-2019-51`) are accepted and reduced to the short form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IndexId(String);

impl IndexId {
    /// Build an identifier from user or service input.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the identifier is empty after
    /// trimming and prefix removal.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, SearchError> {
        let trimmed = raw.as_ref().trim();
        let short = trimmed.strip_prefix(COLLECTION_PREFIX).unwrap_or(trimmed);
        let short = short.strip_suffix(INDEX_SUFFIX).unwrap_or(short);
        if short.is_empty() {
            return Err(SearchError::Config(format!(
                "index identifier must not be empty (got {:?})",
                raw.as_ref()
            )));
        }
        Ok(Self(short.to_string()))
    }

    /// The short identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The full collection name, e.g. `CC-MAIN-2019-51`.
    pub fn collection(&self) -> String {
        format!("{COLLECTION_PREFIX}{}", self.0)
    }
}

impl fmt::Display for IndexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for IndexId {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for IndexId {
    type Error = SearchError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<IndexId> for String {
    fn from(id: IndexId) -> Self {
        id.0
    }
}

impl AsRef<str> for IndexId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One matched archive record as delivered by the index service.
///
/// The record keeps every field of the JSON object it was decoded from.
/// Accessors expose the common CDX fields without reinterpreting them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchResult {
    fields: Map<String, Value>,
}

impl SearchResult {
    /// Wrap an already-decoded JSON object.
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Raw field lookup.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// All fields in the order the service sent them.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    fn str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// Original URL of the capture.
    pub fn url(&self) -> Option<&str> {
        self.str_field("url")
    }

    /// Capture timestamp, `YYYYMMDDhhmmss`.
    pub fn timestamp(&self) -> Option<&str> {
        self.str_field("timestamp")
    }

    /// MIME type declared by the server at crawl time.
    pub fn mime(&self) -> Option<&str> {
        self.str_field("mime")
    }

    /// HTTP status of the capture.
    pub fn status(&self) -> Option<&str> {
        self.str_field("status")
    }

    /// Payload digest.
    pub fn digest(&self) -> Option<&str> {
        self.str_field("digest")
    }

    /// Length of the WARC record in bytes.
    pub fn length(&self) -> Option<&str> {
        self.str_field("length")
    }

    /// WARC file holding the record.
    pub fn filename(&self) -> Option<&str> {
        self.str_field("filename")
    }

    /// Byte offset of the record within [`Self::filename`].
    pub fn offset(&self) -> Option<&str> {
        self.str_field("offset")
    }
}

/// What one index partition answered for one query.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexOutcome {
    /// HTTP 200: the decoded records, in body order (possibly empty).
    Hits(Vec<SearchResult>),
    /// Any other status. The service uses 404 both for "no captures" and
    /// for unknown indexes, so the two cannot be told apart here.
    Miss {
        /// Status code returned by the service.
        status: u16,
    },
}

impl IndexOutcome {
    /// Records carried by this outcome; a miss contributes none.
    pub fn results(&self) -> &[SearchResult] {
        match self {
            Self::Hits(results) => results,
            Self::Miss { .. } => &[],
        }
    }

    /// Consume the outcome, degrading a miss to an empty list.
    pub fn into_results(self) -> Vec<SearchResult> {
        match self {
            Self::Hits(results) => results,
            Self::Miss { .. } => Vec::new(),
        }
    }

    /// Whether the service answered with a non-success status.
    pub fn is_miss(&self) -> bool {
        matches!(self, Self::Miss { .. })
    }
}

/// One entry of the service's collection list (`collinfo.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexInfo {
    /// Full collection id, e.g. `CC-MAIN-2019-51`.
    pub id: String,
    /// Human-readable crawl name.
    #[serde(default)]
    pub name: String,
    /// Memento timegate endpoint.
    #[serde(default)]
    pub timegate: String,
    /// CDX API endpoint for this collection.
    #[serde(rename = "cdx-api", default)]
    pub cdx_api: String,
}

impl IndexInfo {
    /// Short identifier usable in a search request.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the listed id is empty.
    pub fn index_id(&self) -> Result<IndexId, SearchError> {
        IndexId::new(&self.id)
    }
}

/// Pagination summary for one pattern in one index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Number of result pages.
    pub pages: u64,
    /// Index blocks per page.
    #[serde(rename = "pageSize", default)]
    pub page_size: u64,
    /// Total index blocks matched.
    #[serde(default)]
    pub blocks: u64,
}
