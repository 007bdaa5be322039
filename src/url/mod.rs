//! URL handling module for Ripple-Mirror
//!
//! This module provides start URL validation, reference resolution, site
//! identification, asset classification and the URL to mirror path mapping.

mod asset;
mod domain;
mod mirror_path;
mod resolve;

// Re-export main functions
pub use asset::{is_asset, ASSET_EXTENSIONS};
pub use domain::{is_same_site, site_key};
pub use mirror_path::{map_path, INDEX_FILE};
pub use resolve::{parse_start_url, resolve_reference};

use ::url::Url;

/// How a discovered reference is treated by the crawler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    /// Non-page file: downloaded, never parsed
    Asset,
    /// Page on the crawl's own site: followed
    SameSiteLink,
    /// Page on another site: ignored
    ForeignLink,
}

/// Classifies an absolute reference relative to the crawl's site
///
/// Assets are recognised by extension regardless of which site serves them.
/// Everything else is a link, followed only when it stays on `base_key`.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use ripple_mirror::url::{classify_reference, ReferenceKind};
///
/// let page = Url::parse("https://example.com/about").unwrap();
/// assert_eq!(classify_reference(&page, "example.com"), ReferenceKind::SameSiteLink);
///
/// let script = Url::parse("https://cdn.example.net/app.js").unwrap();
/// assert_eq!(classify_reference(&script, "example.com"), ReferenceKind::Asset);
/// ```
pub fn classify_reference(url: &Url, base_key: &str) -> ReferenceKind {
    if is_asset(url) {
        ReferenceKind::Asset
    } else if is_same_site(url, base_key) {
        ReferenceKind::SameSiteLink
    } else {
        ReferenceKind::ForeignLink
    }
}
