//! comcrawl: search the Common Crawl URL indexes.
//!
//! The search core lives in the [`cdx_search`] crate; this crate adds TOML
//! configuration, an [`IndexClient`] facade and the `comcrawl` CLI.

pub mod client;
pub mod config;
pub mod error;

pub use cdx_search::{IndexId, IndexOutcome, SearchReport, SearchRequest, SearchResult};
pub use client::IndexClient;
pub use config::{ClientConfig, SearchDefaults, ServiceConfig};
pub use error::{ClientError, Result};
