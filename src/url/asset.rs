use url::Url;

/// File extensions treated as non-page assets: scripts, stylesheets, images,
/// fonts and icons
pub const ASSET_EXTENSIONS: &[&str] = &[
    "js", "css", "png", "jpg", "jpeg", "gif", "svg", "webp", "woff", "woff2", "ttf", "ico",
];

/// Returns true if the URL points at an asset rather than a page
///
/// Only the last path segment is inspected, so query strings do not hide
/// the extension (`/app.js?v=3` is an asset). Matching is case-insensitive.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use ripple_mirror::url::is_asset;
///
/// assert!(is_asset(&Url::parse("https://example.com/static/app.js").unwrap()));
/// assert!(!is_asset(&Url::parse("https://example.com/about").unwrap()));
/// ```
pub fn is_asset(url: &Url) -> bool {
    let last_segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("");

    match last_segment.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ASSET_EXTENSIONS
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext)),
        _ => false,
    }
}
