//! Output module for Ripple-Mirror
//!
//! The mirror itself is written by the crawler through the storage layer.
//! This module covers what is reported about a crawl once it finishes.

mod stats;

pub use stats::{print_summary, CrawlStats, CrawlSummary};
