//! HTML parser producing the page tree
//!
//! Every element becomes a node with empty text, and every non-blank text
//! run becomes a leaf node, so document order survives inline markup.
//!
//! **Boilerplate (non-content) elements:** `head`, `nav`, `header`,
//! `footer`, `aside`, `script`, `style`, `noscript`, `template`, and
//! everything below them.

use crate::document::{Document, DocumentBuilder, NodeId, PageNode};
use scraper::{Html, Node};

/// Elements whose subtree is navigation, chrome, or code rather than content
const BOILERPLATE_ELEMENTS: &[&str] = &[
    "head", "nav", "header", "footer", "aside", "script", "style", "noscript", "template",
];

/// Parses HTML into a `Document`
///
/// # Arguments
///
/// * `html` - The raw page body
/// * `url` - The URL the body was fetched from
///
/// # Example
///
/// ```
/// use sumi_glean::document::parse_document;
///
/// let doc = parse_document("<body><p>Hello</p></body>", "https://example.com/");
/// assert_eq!(doc.url(), "https://example.com/");
/// assert!(doc.walk().any(|n| n.text == "Hello" && n.is_content));
/// ```
pub fn parse_document(html: &str, url: &str) -> Document {
    let parsed = Html::parse_document(html);
    let mut builder = DocumentBuilder::new(url);

    // (tree node, parent in our arena, inside a boilerplate subtree)
    let mut stack = Vec::new();
    for child in parsed.tree.root().children().collect::<Vec<_>>().into_iter().rev() {
        stack.push((child, None::<NodeId>, false));
    }

    while let Some((node, parent, in_boilerplate)) = stack.pop() {
        match node.value() {
            Node::Element(element) => {
                let name = element.name();
                let is_content = !in_boilerplate && !BOILERPLATE_ELEMENTS.contains(&name);

                let mut page_node = PageNode {
                    is_content,
                    ..PageNode::default()
                };
                if name == "a" && element.attr("download").is_none() {
                    page_node.href = element.attr("href").map(|href| href.to_string());
                }

                let id = attach(&mut builder, parent, page_node);
                for child in node.children().collect::<Vec<_>>().into_iter().rev() {
                    stack.push((child, Some(id), !is_content));
                }
            }
            Node::Text(text) => {
                let content: &str = &text.text;
                if content.trim().is_empty() {
                    continue;
                }
                let page_node = PageNode {
                    text: content.to_string(),
                    is_content: !in_boilerplate,
                    ..PageNode::default()
                };
                attach(&mut builder, parent, page_node);
            }
            Node::Document | Node::Fragment => {
                for child in node.children().collect::<Vec<_>>().into_iter().rev() {
                    stack.push((child, parent, in_boilerplate));
                }
            }
            // Comments, doctypes and processing instructions carry no page text
            _ => {}
        }
    }

    builder.build()
}

fn attach(builder: &mut DocumentBuilder, parent: Option<NodeId>, node: PageNode) -> NodeId {
    match parent {
        Some(parent) => builder.add_child(parent, node),
        None => builder.add_root(node),
    }
}
