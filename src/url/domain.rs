use url::Url;

/// Extracts the site key of a URL: its lowercase host, plus the port when one
/// is given explicitly
///
/// Two URLs belong to the same site only if their site keys are equal, so
/// `http://127.0.0.1:8080` and `http://127.0.0.1:9090` are different sites.
/// The site key is also the first directory of a URL's mirror path.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use ripple_mirror::url::site_key;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(site_key(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://localhost:8080/").unwrap();
/// assert_eq!(site_key(&url), Some("localhost:8080".to_string()));
/// ```
pub fn site_key(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}

/// Returns true if `url` lives on the site identified by `base_key`
pub fn is_same_site(url: &Url, base_key: &str) -> bool {
    site_key(url).is_some_and(|key| key == base_key)
}
