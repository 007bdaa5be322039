//! Crawl statistics
//!
//! Counters are updated lock-free from every task of a crawl and frozen into
//! a [`CrawlSummary`] once the crawl returns.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters shared by all tasks of one crawl
#[derive(Debug, Default)]
pub struct CrawlStats {
    pages_saved: AtomicU64,
    pages_failed: AtomicU64,
    pages_skipped: AtomicU64,
    resources_saved: AtomicU64,
    resources_failed: AtomicU64,
    resources_skipped: AtomicU64,
    bytes_written: AtomicU64,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_page_saved(&self, bytes: usize) {
        self.pages_saved.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn record_page_failed(&self) {
        self.pages_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_page_skipped(&self) {
        self.pages_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_resource_saved(&self, bytes: usize) {
        self.resources_saved.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn record_resource_failed(&self) {
        self.resources_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_resource_skipped(&self) {
        self.resources_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn pages_saved(&self) -> u64 {
        self.pages_saved.load(Ordering::Relaxed)
    }

    /// Freezes the counters into a summary
    pub fn summarize(&self, started_at: DateTime<Utc>, finished_at: DateTime<Utc>) -> CrawlSummary {
        CrawlSummary {
            pages_saved: self.pages_saved.load(Ordering::Relaxed),
            pages_failed: self.pages_failed.load(Ordering::Relaxed),
            pages_skipped: self.pages_skipped.load(Ordering::Relaxed),
            resources_saved: self.resources_saved.load(Ordering::Relaxed),
            resources_failed: self.resources_failed.load(Ordering::Relaxed),
            resources_skipped: self.resources_skipped.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            started_at,
            finished_at,
        }
    }
}

/// Final statistics of a completed crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Pages fetched and written to the mirror
    pub pages_saved: u64,

    /// Pages whose fetch or write failed
    pub pages_failed: u64,

    /// Page tasks dropped at a gate (depth, already claimed, cancelled)
    pub pages_skipped: u64,

    /// Resources fetched and written to the mirror
    pub resources_saved: u64,

    /// Resources dropped after a network error, non-2xx status or write error
    pub resources_failed: u64,

    /// Resource tasks whose URL was already claimed, or that were cancelled
    pub resources_skipped: u64,

    /// Total bytes written to the mirror
    pub bytes_written: u64,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlSummary {
    /// Number of files written to the mirror
    pub fn files_written(&self) -> u64 {
        self.pages_saved + self.resources_saved
    }

    /// Wall-clock duration of the crawl
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Prints a crawl summary to stdout in a formatted manner
pub fn print_summary(summary: &CrawlSummary) {
    println!("=== Mirror Statistics ===\n");

    println!("Pages:");
    println!("  Saved: {}", summary.pages_saved);
    println!("  Failed: {}", summary.pages_failed);
    println!("  Skipped: {}", summary.pages_skipped);
    println!();

    println!("Resources:");
    println!("  Saved: {}", summary.resources_saved);
    println!("  Failed: {}", summary.resources_failed);
    println!("  Skipped: {}", summary.resources_skipped);
    println!();

    println!("Files written: {}", summary.files_written());
    println!("Bytes written: {}", summary.bytes_written);
    println!(
        "Elapsed: {:.2}s",
        summary.elapsed().num_milliseconds() as f64 / 1000.0
    );
}
