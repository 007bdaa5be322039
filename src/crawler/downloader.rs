//! Resource downloader
//!
//! Best-effort fetch-and-save of assets (scripts, stylesheets, images, fonts,
//! icons). Failures are dropped without retry and never leave a file behind.
//! Downloaded resources are never parsed, so this never recurses.

use crate::crawler::limiter::Limiter;
use crate::crawler::registry::VisitedRegistry;
use crate::crawler::transport::Transport;
use crate::storage::MirrorStore;
use crate::url::map_path;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// What happened to one resource download
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceOutcome {
    /// Written to the mirror
    Saved { path: PathBuf, bytes: usize },

    /// Another task claimed the URL first
    AlreadyClaimed,

    /// Network error, non-2xx status or write error
    Failed,

    /// The crawl was cancelled before the file was written
    Cancelled,
}

/// Downloads resources into the mirror
#[derive(Clone)]
pub struct ResourceDownloader {
    registry: Arc<VisitedRegistry>,
    transport: Arc<dyn Transport>,
    store: Arc<dyn MirrorStore>,
    limiter: Option<Limiter>,
    output_root: PathBuf,
    timeout: Duration,
}

impl ResourceDownloader {
    pub fn new(
        registry: Arc<VisitedRegistry>,
        transport: Arc<dyn Transport>,
        store: Arc<dyn MirrorStore>,
        output_root: impl Into<PathBuf>,
        timeout: Duration,
    ) -> Self {
        Self {
            registry,
            transport,
            store,
            limiter: None,
            output_root: output_root.into(),
            timeout,
        }
    }

    /// Makes every download hold a worker slot while it fetches
    ///
    /// Without a limiter, resource downloads are unbounded in flight.
    pub fn with_limiter(mut self, limiter: Limiter) -> Self {
        self.limiter = Some(limiter);
        self
    }

    /// Claims, fetches and saves one resource
    pub async fn download(&self, url: &Url, cancel: &CancellationToken) -> ResourceOutcome {
        if !self.registry.try_claim(url) {
            return ResourceOutcome::AlreadyClaimed;
        }

        let slot = match &self.limiter {
            Some(limiter) => match limiter.acquire(cancel).await {
                Some(slot) => Some(slot),
                None => return ResourceOutcome::Cancelled,
            },
            None => None,
        };

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return ResourceOutcome::Cancelled,
            response = self.transport.get(url, self.timeout) => response,
        };
        drop(slot);

        let response = match response {
            Ok(response) if response.is_success() => response,
            Ok(response) => {
                tracing::debug!("Dropping resource {}: HTTP {}", url, response.status);
                return ResourceOutcome::Failed;
            }
            Err(e) => {
                tracing::debug!("Dropping resource {}: {}", url, e);
                return ResourceOutcome::Failed;
            }
        };

        if cancel.is_cancelled() {
            return ResourceOutcome::Cancelled;
        }

        let path = map_path(url, &self.output_root);
        match self.store.write_file(&path, &response.body).await {
            Ok(()) => ResourceOutcome::Saved {
                path,
                bytes: response.body.len(),
            },
            Err(e) => {
                tracing::debug!("Dropping resource {}: {}", url, e);
                ResourceOutcome::Failed
            }
        }
    }
}
