use crate::url::site_key;
use std::path::{Path, PathBuf};
use url::Url;

/// File name used when a URL path is empty or ends with a separator
pub const INDEX_FILE: &str = "index.html";

/// Maps a URL to its location inside the mirror
///
/// The site key (host, plus explicit port) becomes the first directory under
/// `output_root`, followed by the URL path segments. When the path is empty
/// or directory-like, `index.html` is appended. Query strings and fragments
/// do not take part in the mapping.
///
/// The function is pure: the same URL and root always produce the same path.
/// Pages and resources are mapped identically.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use url::Url;
/// use ripple_mirror::url::map_path;
///
/// let root = Path::new("mirror");
/// let url = Url::parse("https://example.com/docs/").unwrap();
/// assert_eq!(
///     map_path(&url, root),
///     Path::new("mirror/example.com/docs/index.html")
/// );
/// ```
pub fn map_path(url: &Url, output_root: &Path) -> PathBuf {
    let mut path = output_root.to_path_buf();
    if let Some(site) = site_key(url) {
        path.push(site);
    }

    let url_path = url.path();
    // Dot segments are already collapsed by the url crate, so pushing the
    // remaining segments cannot climb out of the site directory
    for segment in url_path.split('/').filter(|s| !s.is_empty()) {
        path.push(segment);
    }

    if url_path.is_empty() || url_path.ends_with('/') {
        path.push(INDEX_FILE);
    }

    path
}
