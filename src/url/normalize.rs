use url::Url;

/// Resolves a link href against a base URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only links (same page anchors)
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
///
/// The fragment is dropped from the resolved URL so that `page#a` and
/// `page#b` count as the same page in the crawl frontier.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_glean::url::resolve_link;
///
/// let base = Url::parse("https://example.com/team/").unwrap();
/// assert_eq!(
///     resolve_link("../contact#form", &base),
///     Some("https://example.com/contact".to_string())
/// );
/// assert_eq!(resolve_link("mailto:hi@example.com", &base), None);
/// ```
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    // Skip empty hrefs
    if href.is_empty() {
        return None;
    }

    // Skip special schemes
    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    if href.starts_with('#') {
        return None;
    }

    let mut absolute_url = base_url.join(href).ok()?;

    // Only accept HTTP and HTTPS URLs
    if absolute_url.scheme() != "http" && absolute_url.scheme() != "https" {
        return None;
    }

    absolute_url.set_fragment(None);
    Some(absolute_url.to_string())
}

/// Puts a user-supplied URL into the form `resolve_link` produces
///
/// Strings that do not parse are returned unchanged so they fail at fetch
/// time rather than here.
///
/// ```
/// use sumi_glean::url::normalize_url;
///
/// assert_eq!(normalize_url("https://example.com"), "https://example.com/");
/// assert_eq!(normalize_url("https://example.com/a#top"), "https://example.com/a");
/// assert_eq!(normalize_url("not a url"), "not a url");
/// ```
pub fn normalize_url(raw: &str) -> String {
    match Url::parse(raw.trim()) {
        Ok(mut parsed) => {
            parsed.set_fragment(None);
            parsed.to_string()
        }
        Err(_) => raw.to_string(),
    }
}
