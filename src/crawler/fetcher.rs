//! Page fetcher
//!
//! Fetches one page, hands its body to the parser and sorts the discovered
//! references into resources to download and same-site links to follow.

use crate::crawler::parser::parse_html;
use crate::crawler::transport::{Transport, TransportError};
use crate::url::{classify_reference, ReferenceKind};
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Result of a successful page fetch
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Raw page body, written to the mirror as is
    pub body: Bytes,

    /// Page title, if any
    pub title: Option<String>,

    /// Asset references on any site
    pub resources: Vec<Url>,

    /// Non-asset references on the crawl's own site
    pub links: Vec<Url>,
}

/// Failure to fetch a page; the branch ends without writing anything
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Fetches pages and classifies their references against the crawl's site
#[derive(Clone)]
pub struct PageFetcher {
    transport: Arc<dyn Transport>,
    base_key: String,
    timeout: Duration,
}

impl PageFetcher {
    /// Creates a fetcher for the site identified by `base_key`
    pub fn new(transport: Arc<dyn Transport>, base_key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            transport,
            base_key: base_key.into(),
            timeout,
        }
    }

    /// Site key links must match to be followed
    pub fn base_key(&self) -> &str {
        &self.base_key
    }

    /// Fetches `url` and extracts its references
    ///
    /// Any response the transport completes is a page, whatever its status:
    /// an error page is mirrored and its links are followed like any other.
    /// Only transport failures are errors.
    pub async fn fetch(&self, url: &Url) -> Result<Extraction, FetchError> {
        let response = self.transport.get(url, self.timeout).await?;

        if !response.is_success() {
            tracing::debug!("Page {} answered HTTP {}", url, response.status);
        }

        let text = String::from_utf8_lossy(&response.body);
        let parsed = parse_html(&text, url);
        let (resources, links) = classify_references(parsed.references, &self.base_key);

        tracing::debug!(
            "Fetched {} ({} bytes, {} resources, {} links)",
            url,
            response.body.len(),
            resources.len(),
            links.len()
        );

        Ok(Extraction {
            body: response.body,
            title: parsed.title,
            resources,
            links,
        })
    }
}

/// Splits references into `(resources, links)`, dropping foreign links
pub fn classify_references(references: Vec<Url>, base_key: &str) -> (Vec<Url>, Vec<Url>) {
    let mut resources = Vec::new();
    let mut links = Vec::new();

    for reference in references {
        match classify_reference(&reference, base_key) {
            ReferenceKind::Asset => resources.push(reference),
            ReferenceKind::SameSiteLink => links.push(reference),
            ReferenceKind::ForeignLink => {
                tracing::trace!("Ignoring foreign link {}", reference);
            }
        }
    }

    (resources, links)
}
