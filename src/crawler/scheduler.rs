//! Scheduler for the recursive, depth-bounded crawl
//!
//! This module handles:
//! - Spawning one task per page and one per resource
//! - Gating page fetches through the worker [`Limiter`]
//! - Tracking completion of a task tree whose size is only known at the end
//!
//! Every task is spawned onto a shared [`TaskTracker`]. A task spawns its
//! children while it is itself still tracked, so the tracker cannot drain
//! before the whole tree has been discovered, even though waiting starts
//! right after the root task is submitted.

use crate::crawler::downloader::{ResourceDownloader, ResourceOutcome};
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::limiter::Limiter;
use crate::crawler::registry::VisitedRegistry;
use crate::output::CrawlStats;
use crate::state::TaskState;
use crate::storage::MirrorStore;
use crate::url::map_path;
use crate::MirrorError;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use url::Url;

/// How often progress is logged while a crawl runs
const PROGRESS_INTERVAL: Duration = Duration::from_secs(5);

/// A page waiting to be processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    /// The page URL
    pub url: Url,

    /// Remaining depth; a task with 0 is skipped without fetching
    pub remaining_depth: u32,
}

impl CrawlTask {
    pub fn new(url: Url, remaining_depth: u32) -> Self {
        Self {
            url,
            remaining_depth,
        }
    }

    /// Task for a link found on this task's page, one level deeper
    pub fn child(&self, url: Url) -> Self {
        Self {
            url,
            remaining_depth: self.remaining_depth.saturating_sub(1),
        }
    }
}

/// Everything the tasks of one crawl share
pub struct CrawlContext {
    pub registry: Arc<VisitedRegistry>,
    pub limiter: Limiter,
    pub fetcher: PageFetcher,
    pub downloader: ResourceDownloader,
    pub store: Arc<dyn MirrorStore>,
    pub stats: Arc<CrawlStats>,
    pub cancel: CancellationToken,
    pub output_root: PathBuf,
}

/// Spawns and tracks the tasks of one crawl
///
/// A scheduler runs a single crawl: once [`CrawlScheduler::run`] returns,
/// its tracker is closed and drained.
#[derive(Clone)]
pub struct CrawlScheduler {
    ctx: Arc<CrawlContext>,
    tracker: TaskTracker,
}

impl CrawlScheduler {
    pub fn new(ctx: CrawlContext) -> Self {
        Self {
            ctx: Arc::new(ctx),
            tracker: TaskTracker::new(),
        }
    }

    /// Submits the root task and waits until every task it transitively
    /// spawned has reached a terminal state
    pub async fn run(&self, root: CrawlTask) {
        tracing::info!(
            "Crawling {} (depth {}, {} workers)",
            root.url,
            root.remaining_depth,
            self.ctx.limiter.capacity()
        );

        self.submit(root);
        self.tracker.close();

        let mut progress = tokio::time::interval(PROGRESS_INTERVAL);
        progress.set_missed_tick_behavior(MissedTickBehavior::Delay);
        progress.tick().await;

        loop {
            tokio::select! {
                _ = self.tracker.wait() => break,
                _ = progress.tick() => {
                    tracing::info!(
                        "Progress: {} pages saved, {} URLs claimed, {} tasks in flight",
                        self.ctx.stats.pages_saved(),
                        self.ctx.registry.len(),
                        self.in_flight()
                    );
                }
            }
        }
    }

    /// Spawns a page task
    pub fn submit(&self, task: CrawlTask) {
        let scheduler = self.clone();
        self.tracker.spawn(async move {
            let url = task.url.clone();
            match scheduler.process_page(task).await {
                Ok(state) => tracing::trace!("Page task for {} ended as {}", url, state),
                Err(e) => {
                    scheduler.ctx.stats.record_page_failed();
                    tracing::error!("Page task for {} aborted: {}", url, e);
                }
            }
        });
    }

    /// Spawns a resource download task
    pub fn submit_resource(&self, url: Url) {
        let scheduler = self.clone();
        self.tracker.spawn(async move {
            let ctx = &scheduler.ctx;
            match ctx.downloader.download(&url, &ctx.cancel).await {
                ResourceOutcome::Saved { path, bytes } => {
                    tracing::debug!("Saved resource {} to {}", url, path.display());
                    ctx.stats.record_resource_saved(bytes);
                }
                ResourceOutcome::Failed => ctx.stats.record_resource_failed(),
                ResourceOutcome::AlreadyClaimed | ResourceOutcome::Cancelled => {
                    ctx.stats.record_resource_skipped()
                }
            }
        });
    }

    /// Number of tasks spawned and not yet finished
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Drives one page task through its lifecycle
    ///
    /// The worker slot is held only while fetching: it is released before
    /// the page is written, on failure, and on cancellation.
    async fn process_page(&self, task: CrawlTask) -> Result<TaskState, MirrorError> {
        let ctx = &self.ctx;
        let url = &task.url;
        let mut state = TaskState::Pending;

        // Depth is checked before claiming, so an exhausted branch does not
        // steal the URL from a branch that still has depth left
        if task.remaining_depth == 0 || ctx.cancel.is_cancelled() {
            return self.skip(url, state);
        }
        if !ctx.registry.try_claim(url) {
            return self.skip(url, state);
        }
        state = advance(url, state, TaskState::Claimed)?;

        let Some(slot) = ctx.limiter.acquire(&ctx.cancel).await else {
            return self.skip(url, state);
        };
        state = advance(url, state, TaskState::Fetching)?;

        let fetched = tokio::select! {
            biased;
            _ = ctx.cancel.cancelled() => None,
            result = ctx.fetcher.fetch(url) => Some(result),
        };
        slot.release();

        let extraction = match fetched {
            None => return self.skip(url, state),
            Some(Err(e)) => {
                tracing::warn!("Failed to fetch {}: {}", url, e);
                return self.fail(url, state);
            }
            Some(Ok(extraction)) => extraction,
        };
        state = advance(url, state, TaskState::Writing)?;

        if ctx.cancel.is_cancelled() {
            return self.skip(url, state);
        }

        let path = map_path(url, &ctx.output_root);
        if let Err(e) = ctx.store.write_file(&path, &extraction.body).await {
            tracing::warn!("Failed to save {}: {}", url, e);
            return self.fail(url, state);
        }
        ctx.stats.record_page_saved(extraction.body.len());
        tracing::debug!(
            "Saved {} to {}{}",
            url,
            path.display(),
            extraction
                .title
                .as_deref()
                .map(|t| format!(" ({})", t))
                .unwrap_or_default()
        );
        state = advance(url, state, TaskState::Expanding)?;

        for resource in extraction.resources {
            self.submit_resource(resource);
        }
        for link in extraction.links {
            self.submit(task.child(link));
        }

        advance(url, state, TaskState::Done)
    }

    fn skip(&self, url: &Url, state: TaskState) -> Result<TaskState, MirrorError> {
        self.ctx.stats.record_page_skipped();
        advance(url, state, TaskState::Skipped)
    }

    fn fail(&self, url: &Url, state: TaskState) -> Result<TaskState, MirrorError> {
        self.ctx.stats.record_page_failed();
        advance(url, state, TaskState::Failed)
    }
}

fn advance(url: &Url, from: TaskState, to: TaskState) -> Result<TaskState, MirrorError> {
    let next = from.transition(to)?;
    tracing::trace!(
        "{}: {} -> {}{}",
        url,
        from,
        next,
        if next.holds_worker_slot() { " (slot held)" } else { "" }
    );
    Ok(next)
}
