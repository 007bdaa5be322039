//! Crawler coordinator - entry point for one mirroring run
//!
//! This module wires the pieces of a crawl together:
//! - Validating configuration and the start URL
//! - Creating the output root
//! - Building a fresh registry, limiter and scheduler per run
//! - Collecting the run summary

use crate::config::{validate, Config};
use crate::crawler::downloader::ResourceDownloader;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::limiter::Limiter;
use crate::crawler::registry::VisitedRegistry;
use crate::crawler::scheduler::{CrawlContext, CrawlScheduler, CrawlTask};
use crate::crawler::transport::{ReqwestTransport, Transport};
use crate::output::{CrawlStats, CrawlSummary};
use crate::storage::{FsStore, MirrorStore, StorageError};
use crate::url::{parse_start_url, site_key};
use crate::{MirrorError, UrlError};
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Mirrors sites according to a [`Config`]
///
/// Each call to [`Mirror::start`] is an independent crawl with its own
/// visited registry and worker limiter. The HTTP transport and the store are
/// shared between calls.
pub struct Mirror {
    config: Config,
    transport: Arc<dyn Transport>,
    store: Arc<dyn MirrorStore>,
    cancel: CancellationToken,
}

impl Mirror {
    /// Creates a mirror that fetches over HTTP and writes to the local filesystem
    pub fn new(config: Config) -> Result<Self, MirrorError> {
        let transport = ReqwestTransport::from_config(&config.user_agent)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Creates a mirror over a custom transport
    pub fn with_transport(config: Config, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            transport,
            store: Arc::new(FsStore::new()),
            cancel: CancellationToken::new(),
        }
    }

    /// Replaces the store the mirror is written to
    pub fn with_store(mut self, store: Arc<dyn MirrorStore>) -> Self {
        self.store = store;
        self
    }

    /// Token that stops every crawl started by this mirror when cancelled
    ///
    /// In-flight fetches are abandoned and no further files are written;
    /// [`Mirror::start`] still returns the summary of what was saved.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Mirrors the site of `start_url` into the configured output directory
    ///
    /// Returns once every page and resource task spawned by the crawl has
    /// finished. Only setup failures are errors: an unreachable start page
    /// still yields an (empty) summary.
    pub async fn start(&self, start_url: &str) -> Result<CrawlSummary, MirrorError> {
        validate(&self.config)?;

        let url = parse_start_url(start_url).map_err(|source| MirrorError::InvalidStartUrl {
            url: start_url.to_string(),
            source,
        })?;
        let base_key = site_key(&url).ok_or_else(|| MirrorError::InvalidStartUrl {
            url: start_url.to_string(),
            source: UrlError::MissingHost,
        })?;

        let output_root = self.config.output.directory.clone();
        self.store
            .create_dir_all(&output_root)
            .await
            .map_err(|e| match e {
                StorageError::CreateDir { path, source } | StorageError::Write { path, source } => {
                    MirrorError::OutputRoot { path, source }
                }
            })?;

        let crawler = &self.config.crawler;
        let registry = Arc::new(VisitedRegistry::new());
        let limiter = Limiter::new(crawler.workers as usize);
        let stats = Arc::new(CrawlStats::new());

        let mut downloader = ResourceDownloader::new(
            registry.clone(),
            self.transport.clone(),
            self.store.clone(),
            output_root.clone(),
            crawler.resource_timeout(),
        );
        if crawler.limit_resources {
            downloader = downloader.with_limiter(limiter.clone());
        }

        let scheduler = CrawlScheduler::new(CrawlContext {
            registry,
            limiter,
            fetcher: PageFetcher::new(self.transport.clone(), base_key, crawler.page_timeout()),
            downloader,
            store: self.store.clone(),
            stats: stats.clone(),
            cancel: self.cancel.clone(),
            output_root: output_root.clone(),
        });

        let started_at = Utc::now();
        scheduler.run(CrawlTask::new(url, crawler.max_depth)).await;
        let summary = stats.summarize(started_at, Utc::now());

        if self.cancel.is_cancelled() {
            tracing::warn!("Crawl cancelled; mirror in {} is partial", output_root.display());
        }
        tracing::info!(
            "Crawl finished: {} pages, {} resources written to {}",
            summary.pages_saved,
            summary.resources_saved,
            output_root.display()
        );

        Ok(summary)
    }
}

/// Mirrors `url` into `output_root` with default settings otherwise
///
/// `depth` is the remaining depth given to the start page: 0 fetches
/// nothing, 1 saves only the start page and its resources.
pub async fn start(
    url: &str,
    depth: u32,
    output_root: impl Into<PathBuf>,
    workers: u32,
) -> Result<CrawlSummary, MirrorError> {
    let mut config = Config::default();
    config.crawler.max_depth = depth;
    config.crawler.workers = workers;
    config.output.directory = output_root.into();

    Mirror::new(config)?.start(url).await
}
