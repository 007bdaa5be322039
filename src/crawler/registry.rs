//! Visited registry: the single authority on which URLs have been fetched
//!
//! Every fetch path (pages and resources) must claim its URL here before
//! touching the network, and must drop the work when the claim is refused.

use dashmap::DashSet;
use url::Url;

/// Concurrency-safe set of claimed URLs
///
/// The registry only grows. URLs are compared by their serialized form, so
/// two spellings of the same resource are two distinct keys.
#[derive(Debug, Default)]
pub struct VisitedRegistry {
    claimed: DashSet<String>,
}

impl VisitedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `url` for the caller
    ///
    /// Returns true exactly once per URL: for the first caller. The check and
    /// the insert happen under a single shard lock, so two concurrent callers
    /// can never both see `true`.
    pub fn try_claim(&self, url: &Url) -> bool {
        self.claimed.insert(url.as_str().to_owned())
    }

    /// Number of URLs claimed so far
    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}
