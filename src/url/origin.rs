use url::Url;

/// Extracts the origin (`scheme://host[:port]`) of a URL
///
/// The origin is the key under which a robots.txt policy is memoized.
/// Default ports are omitted, explicit non-default ports are kept, and the
/// host is lowercased.
///
/// # Returns
///
/// * `Some(String)` - The origin string
/// * `None` - If the URL has no host (e.g. `data:` or `file:` URLs)
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_glean::url::extract_origin;
///
/// let url = Url::parse("https://Example.com/path?q=1").unwrap();
/// assert_eq!(extract_origin(&url), Some("https://example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/a").unwrap();
/// assert_eq!(extract_origin(&url), Some("http://127.0.0.1:8080".to_string()));
/// ```
pub fn extract_origin(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    Some(match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    })
}

/// Builds the robots.txt URL for an origin
pub fn robots_url(origin: &str) -> String {
    format!("{}/robots.txt", origin)
}
