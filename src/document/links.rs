use crate::document::Document;
use crate::url::resolve_link;
use url::Url;

/// Discovers outbound links in a document
///
/// Walks every node (navigation included, since menus are how sites link
/// their contact pages) and resolves each anchor target against `base_url`.
/// Results are absolute http(s) URLs without fragments, in document order.
/// Duplicates are kept; the crawler deduplicates.
///
/// Returns an empty list if `base_url` does not parse.
pub fn discover_links(document: &Document, base_url: &str) -> Vec<String> {
    let base = match Url::parse(base_url) {
        Ok(base) => base,
        Err(e) => {
            tracing::debug!("Cannot resolve links against {}: {}", base_url, e);
            return Vec::new();
        }
    };

    document
        .walk()
        .filter_map(|node| node.href.as_deref())
        .filter_map(|href| resolve_link(href, &base))
        .collect()
}
