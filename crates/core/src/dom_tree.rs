use ego_tree::NodeId;
use scraper::Node;

use crate::parse::Document;

/// What a [`DomNode`] holds
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// The document root
    Document,
    /// An element with its lowercase tag name and attributes in source order
    Element { tag_name: String, attrs: Vec<(String, String)> },
    /// A text node, whitespace as in source
    Text(String),
}

/// A node in the frozen DOM tree
#[derive(Debug, Clone)]
pub struct DomNode {
    /// Element, text or document root
    pub kind: NodeKind,
    /// Parent node ID (if any)
    pub parent_id: Option<usize>,
    /// Child node IDs in document order
    pub child_ids: Vec<usize>,
    /// Id of the node in the scraper tree this was built from
    pub source_id: NodeId,
}

/// A read-only snapshot of a parsed document.
///
/// `scraper::Html` cannot be shared between threads, so once normalization
/// is done the tree is copied into this arena and handed to the concurrent
/// extractors by reference. Node ids are assigned in pre-order, so comparing
/// two ids compares document positions. Comments, doctypes and processing
/// instructions are dropped.
#[derive(Debug, Clone)]
pub struct DomTree {
    /// All nodes in the tree, the document root at index 0
    nodes: Vec<DomNode>,
    body: Option<usize>,
}

impl DomTree {
    /// Snapshot the current state of `doc`.
    pub fn from_document(doc: &Document) -> Self {
        let html = doc.html();
        let body_source = doc.body_id();
        let mut nodes: Vec<DomNode> = Vec::new();
        let mut body = None;

        let mut stack = vec![(html.tree.root(), None::<usize>)];
        while let Some((node, parent_id)) = stack.pop() {
            let kind = match node.value() {
                Node::Document | Node::Fragment => NodeKind::Document,
                Node::Element(element) => NodeKind::Element {
                    tag_name: element.name().to_lowercase(),
                    attrs: element.attrs().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
                },
                Node::Text(text) => NodeKind::Text(String::from(&**text)),
                _ => continue,
            };

            let id = nodes.len();
            if Some(node.id()) == body_source {
                body = Some(id);
            }
            if let Some(parent) = parent_id {
                nodes[parent].child_ids.push(id);
            }
            nodes.push(DomNode { kind, parent_id, child_ids: Vec::new(), source_id: node.id() });

            let children: Vec<_> = node.children().collect();
            stack.extend(children.into_iter().rev().map(|child| (child, Some(id))));
        }

        Self { nodes, body }
    }

    /// The document root
    pub fn root(&self) -> usize {
        0
    }

    /// The `<body>` element, if the document has one
    pub fn body(&self) -> Option<usize> {
        self.body
    }

    /// The `<head>` element, if the document has one
    pub fn head(&self) -> Option<usize> {
        let html = self.child_element(self.root(), "html")?;
        self.child_element(html, "head")
    }

    /// Get a node by ID
    pub fn get_node(&self, id: usize) -> Option<&DomNode> {
        self.nodes.get(id)
    }

    /// Get the parent ID of a node
    pub fn get_parent(&self, id: usize) -> Option<usize> {
        self.nodes.get(id)?.parent_id
    }

    /// Lowercase tag name, `None` for text and the document root
    pub fn tag_name(&self, id: usize) -> Option<&str> {
        match &self.nodes.get(id)?.kind {
            NodeKind::Element { tag_name, .. } => Some(tag_name),
            _ => None,
        }
    }

    pub fn is_element(&self, id: usize) -> bool {
        self.tag_name(id).is_some()
    }

    /// Attribute lookup on an element
    pub fn attr(&self, id: usize, name: &str) -> Option<&str> {
        match &self.nodes.get(id)?.kind {
            NodeKind::Element { attrs, .. } => attrs.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    /// The node's own text, `None` unless it is a text node
    pub fn own_text(&self, id: usize) -> Option<&str> {
        match &self.nodes.get(id)?.kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Recursive text content, whitespace as in source
    pub fn text(&self, id: usize) -> String {
        if let Some(text) = self.own_text(id) {
            return text.to_string();
        }
        self.descendants(id).filter_map(|d| self.own_text(d)).collect()
    }

    /// Pre-order iterator over the descendants of `id`, excluding `id` itself
    pub fn descendants(&self, id: usize) -> Descendants<'_> {
        let stack = self
            .nodes
            .get(id)
            .map(|node| node.child_ids.iter().rev().copied().collect())
            .unwrap_or_default();
        Descendants { tree: self, stack }
    }

    /// Element descendants of `id` with one of the given tag names, in document order
    pub fn find_all<'a>(&'a self, id: usize, tags: &'a [&'a str]) -> impl Iterator<Item = usize> + 'a {
        self.descendants(id)
            .filter(move |d| self.tag_name(*d).is_some_and(|name| tags.contains(&name)))
    }

    /// The id of the scraper node this node was built from
    pub fn source_id(&self, id: usize) -> Option<NodeId> {
        self.nodes.get(id).map(|node| node.source_id)
    }

    /// Get the total number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn child_element(&self, id: usize, tag: &str) -> Option<usize> {
        self.nodes
            .get(id)?
            .child_ids
            .iter()
            .copied()
            .find(|child| self.tag_name(*child) == Some(tag))
    }
}

/// Pre-order iterator returned by [`DomTree::descendants`]
pub struct Descendants<'a> {
    tree: &'a DomTree,
    stack: Vec<usize>,
}

impl Iterator for Descendants<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let id = self.stack.pop()?;
        if let Some(node) = self.tree.nodes.get(id) {
            self.stack.extend(node.child_ids.iter().rev().copied());
        }
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(html: &str) -> DomTree {
        DomTree::from_document(&Document::parse(html).unwrap())
    }

    #[test]
    fn test_build_dom_tree() {
        let tree = tree(
            r#"<html><head><title>T</title></head><body><div class="container"><p>Test <a href="/x">paragraph</a></p><!-- c --></div></body></html>"#,
        );

        assert!(!tree.is_empty());
        assert_eq!(tree.tag_name(tree.root()), None);
        let body = tree.body().unwrap();
        assert_eq!(tree.tag_name(body), Some("body"));
        assert_eq!(tree.tag_name(tree.head().unwrap()), Some("head"));

        let div = tree.find_all(body, &["div"]).next().unwrap();
        assert_eq!(tree.attr(div, "class"), Some("container"));
        assert_eq!(tree.get_parent(div), Some(body));
        assert_eq!(tree.text(div), "Test paragraph");
    }

    #[test]
    fn test_comments_are_dropped() {
        let tree = tree("<html><body><div><!-- note --><p>x</p></div></body></html>");
        let div = tree.find_all(tree.root(), &["div"]).next().unwrap();
        assert_eq!(tree.get_node(div).unwrap().child_ids.len(), 1);
    }

    #[test]
    fn test_descendants_in_document_order() {
        let tree = tree("<html><body><div><h1>A</h1><p>B<a>C</a></p></div><p>D</p></body></html>");
        let body = tree.body().unwrap();

        let tags: Vec<&str> = tree.descendants(body).filter_map(|id| tree.tag_name(id)).collect();
        assert_eq!(tags, vec!["div", "h1", "p", "a", "p"]);

        let ids: Vec<usize> = tree.descendants(body).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_find_all_multiple_tags() {
        let tree = tree("<html><body><h3>x</h3><div><h1>y</h1></div><h2>z</h2></body></html>");
        let found: Vec<String> = tree.find_all(tree.root(), &["h1", "h2", "h3"]).map(|id| tree.text(id)).collect();
        assert_eq!(found, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_source_ids_round_trip() {
        let doc = Document::parse("<html><body><p>Hello</p></body></html>").unwrap();
        let tree = DomTree::from_document(&doc);
        let p = tree.find_all(tree.root(), &["p"]).next().unwrap();
        let source = tree.source_id(p).unwrap();
        assert_eq!(doc.element(source).unwrap().inner_html(), "Hello");
    }

    #[test]
    fn test_dom_tree_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DomTree>();
    }
}
