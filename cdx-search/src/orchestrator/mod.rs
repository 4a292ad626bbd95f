//! Search orchestrator: strategy selection, bounded fan-out, aggregation.
//!
//! This module fans a URL-pattern query out to many index partitions,
//! sequentially or on a bounded worker pool, and merges the per-index
//! outcomes into one ordered result list.

pub mod aggregate;
pub mod dispatch;
pub mod pool;
