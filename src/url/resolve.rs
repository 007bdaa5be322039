use crate::{UrlError, UrlResult};
use url::Url;

/// Parses and checks the URL a crawl starts from
///
/// The start URL must be absolute, use `http` or `https`, and carry a host.
///
/// # Examples
///
/// ```
/// use ripple_mirror::url::parse_start_url;
///
/// assert!(parse_start_url("https://example.com/").is_ok());
/// assert!(parse_start_url("ftp://example.com/").is_err());
/// assert!(parse_start_url("not a url").is_err());
/// ```
pub fn parse_start_url(url_str: &str) -> UrlResult<Url> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);
    Ok(url)
}

/// Resolves a reference found in a page against the page URL
///
/// Returns None if the reference should be dropped:
/// - empty or fragment-only references
/// - `javascript:`, `mailto:`, `tel:` and `data:` references
/// - references that fail to resolve
/// - anything that is not HTTP(S) after resolution
///
/// The fragment of the resolved URL is removed, since it never reaches the
/// server and would otherwise make one document look like several.
pub fn resolve_reference(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    let mut absolute = base_url.join(href).ok()?;
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }

    absolute.set_fragment(None);
    Some(absolute)
}
