//! Crawler module for mirroring a site
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind a swappable transport
//! - HTML parsing and reference extraction
//! - At-most-once URL claiming and bounded page concurrency
//! - Task scheduling and completion tracking
//! - Overall crawl coordination

mod coordinator;
mod downloader;
mod fetcher;
mod limiter;
mod parser;
mod registry;
mod scheduler;
mod transport;

#[cfg(test)]
mod test_support;

pub use coordinator::{start, Mirror};
pub use downloader::{ResourceDownloader, ResourceOutcome};
pub use fetcher::{classify_references, Extraction, FetchError, PageFetcher};
pub use limiter::{Limiter, WorkerSlot};
pub use parser::{parse_html, ParsedPage};
pub use registry::VisitedRegistry;
pub use scheduler::{CrawlContext, CrawlScheduler, CrawlTask};
pub use transport::{build_http_client, HttpResponse, ReqwestTransport, Transport, TransportError};
