//! Content text gathering
//!
//! Collects the text of content nodes in document order. A node not marked
//! as content is pruned together with its whole subtree; below a content
//! node the same rule applies to each descendant.

use crate::document::Document;

/// Gathers and normalizes the content text of a document
///
/// Pieces are joined with single spaces, runs of whitespace are collapsed,
/// and the result is trimmed.
///
/// # Example
///
/// ```
/// use sumi_glean::document::{DocumentBuilder, PageNode};
/// use sumi_glean::extract::gather_text;
///
/// let mut builder = DocumentBuilder::new("https://example.com/");
/// let root = builder.add_root(PageNode::content("Contact:"));
/// builder.add_child(root, PageNode::boilerplate("Home | About"));
/// builder.add_child(root, PageNode::content("  hi@example.com \n"));
/// let doc = builder.build();
///
/// assert_eq!(gather_text(&doc), "Contact: hi@example.com");
/// ```
pub fn gather_text(document: &Document) -> String {
    let mut pieces: Vec<&str> = Vec::new();
    let mut stack: Vec<_> = document.roots().iter().rev().copied().collect();

    while let Some(id) = stack.pop() {
        let node = document.node(id);
        if !node.is_content {
            continue;
        }
        if !node.text.is_empty() {
            pieces.push(&node.text);
        }
        stack.extend(node.children.iter().rev().copied());
    }

    normalize_whitespace(&pieces.join(" "))
}

/// Collapses every whitespace run to a single space and trims
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
