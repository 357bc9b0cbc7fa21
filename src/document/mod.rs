//! Parsed page tree
//!
//! A `Document` is an arena of `PageNode`s addressed by `NodeId`. Nodes own
//! their children by id; there are no parent links. Documents are built once
//! through `DocumentBuilder` (or `parse_document`) and are immutable after.

mod links;
mod parse;

pub use links::discover_links;
pub use parse::parse_document;

/// Index of a node inside its `Document`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena
    pub fn index(self) -> usize {
        self.0
    }
}

/// One node of the page tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageNode {
    /// Text carried by this node (possibly empty)
    pub text: String,

    /// Children in document order
    pub children: Vec<NodeId>,

    /// Whether this node holds primary readable content rather than
    /// navigation or boilerplate
    pub is_content: bool,

    /// Raw link target for anchor nodes, as written in the page
    pub href: Option<String>,
}

impl PageNode {
    /// A content node carrying `text`
    pub fn content(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_content: true,
            ..Self::default()
        }
    }

    /// A boilerplate node carrying `text`
    pub fn boilerplate(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_content: false,
            ..Self::default()
        }
    }

    /// Sets the link target of this node
    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }
}

/// Immutable parsed page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    url: String,
    nodes: Vec<PageNode>,
    roots: Vec<NodeId>,
}

impl Document {
    /// URL the document was parsed from
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Top-level nodes in document order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Returns the node for `id`
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by the builder of this document.
    pub fn node(&self, id: NodeId) -> &PageNode {
        &self.nodes[id.0]
    }

    /// Returns the node for `id`, or None if it is out of range
    pub fn get(&self, id: NodeId) -> Option<&PageNode> {
        self.nodes.get(id.0)
    }

    /// Number of nodes in the arena
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the document has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Visits every node in document order (pre-order), without recursion
    pub fn walk(&self) -> impl Iterator<Item = &PageNode> + '_ {
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            let node = &self.nodes[id.0];
            stack.extend(node.children.iter().rev().copied());
            Some(node)
        })
    }
}

/// Incremental builder for `Document`
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    url: String,
    nodes: Vec<PageNode>,
    roots: Vec<NodeId>,
}

impl DocumentBuilder {
    /// Starts an empty document for `url`
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            nodes: Vec::new(),
            roots: Vec::new(),
        }
    }

    /// Appends a top-level node
    pub fn add_root(&mut self, node: PageNode) -> NodeId {
        let id = self.push(node);
        self.roots.push(id);
        id
    }

    /// Appends `node` as the last child of `parent`
    ///
    /// # Panics
    ///
    /// Panics if `parent` was not produced by this builder.
    pub fn add_child(&mut self, parent: NodeId, node: PageNode) -> NodeId {
        let id = self.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Finishes the document
    pub fn build(self) -> Document {
        Document {
            url: self.url,
            nodes: self.nodes,
            roots: self.roots,
        }
    }

    fn push(&mut self, mut node: PageNode) -> NodeId {
        // Children are attached only through add_child
        node.children.clear();
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }
}
