//! HTML parsing and DOM manipulation.
//!
//! This module provides the [`Document`] and [`Element`] types wrapping
//! `scraper`'s html5ever tree. A [`Document`] is the only mutable view of a
//! page: the normalizer edits it in place through the crate-private
//! `remove`/`unwrap_element` helpers, after which it is frozen into a
//! [`DomTree`](crate::DomTree) for scoring.
//!
//! # Example
//!
//! ```rust
//! use densa_core::parse::Document;
//!
//! let html = r#"
//!     <html>
//!         <body>
//!             <h1>Title</h1>
//!             <p class="content">Paragraph</p>
//!         </body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html).unwrap();
//! assert!(doc.body_id().is_some());
//! let paragraphs = doc.select("p.content").unwrap();
//! assert_eq!(paragraphs.len(), 1);
//! ```

use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};

use crate::{DensaError, Result};

/// Represents a parsed HTML document.
///
/// # Example
///
/// ```rust
/// use densa_core::parse::Document;
///
/// let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
/// let doc = Document::parse(html).unwrap();
/// assert_eq!(doc.title(), Some("Test".to_string()));
/// ```
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML from a string.
    ///
    /// html5ever recovers from any malformed markup, so the only input that
    /// is rejected is one with nothing to parse.
    ///
    /// # Errors
    ///
    /// Returns [`DensaError::HtmlParseError`] if the input is empty or whitespace.
    pub fn parse(html: &str) -> Result<Self> {
        if html.trim().is_empty() {
            return Err(DensaError::HtmlParseError("document is empty".to_string()));
        }

        Ok(Self { html: Html::parse_document(html) })
    }

    /// Gets the raw HTML representation.
    ///
    /// Returns a reference to the underlying `scraper::Html` instance.
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Gets the entire HTML as a string.
    pub fn as_string(&self) -> String {
        self.html.html()
    }

    /// Selects elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`DensaError::HtmlParseError`] if the selector is invalid.
    ///
    /// # Example
    ///
    /// ```rust
    /// use densa_core::parse::Document;
    ///
    /// let html = r#"<p class="content">First</p><p class="content">Second</p>"#;
    /// let doc = Document::parse(html).unwrap();
    /// let elements = doc.select("p.content").unwrap();
    /// assert_eq!(elements.len(), 2);
    /// ```
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel =
            Selector::parse(selector).map_err(|e| DensaError::HtmlParseError(format!("Invalid selector: {}", e)))?;

        Ok(self.html.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Gets the title of the document.
    ///
    /// Returns the content of the first `<title>` element if present.
    pub fn title(&self) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        self.html
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>())
    }

    /// Returns the node id of the `<body>` element.
    ///
    /// html5ever synthesizes a body for ordinary documents; frameset pages
    /// have none.
    pub fn body_id(&self) -> Option<NodeId> {
        self.html
            .root_element()
            .children()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "body")
            .map(|el| el.id())
    }

    /// Looks up an element by its node id.
    pub fn element(&'_ self, id: NodeId) -> Option<Element<'_>> {
        self.html.tree.get(id).and_then(ElementRef::wrap).map(|element| Element { element })
    }

    /// Detaches a node (and its subtree) from the tree.
    pub(crate) fn remove(&mut self, id: NodeId) {
        if let Some(mut node) = self.html.tree.get_mut(id) {
            node.detach();
        }
    }

    /// Replaces an element with its children, keeping their order.
    pub(crate) fn unwrap_element(&mut self, id: NodeId) {
        let children: Vec<NodeId> = match self.html.tree.get(id) {
            Some(node) if node.parent().is_some() => node.children().map(|child| child.id()).collect(),
            _ => return,
        };

        for child in children {
            if let Some(mut child) = self.html.tree.get_mut(child) {
                child.detach();
            }
            if let Some(mut node) = self.html.tree.get_mut(id) {
                node.insert_id_before(child);
            }
        }

        self.remove(id);
    }
}

/// A wrapper around scraper's ElementRef.
///
/// # Example
///
/// ```rust
/// use densa_core::parse::Document;
///
/// let html = r#"<a href="https://example.com">Link text</a>"#;
/// let doc = Document::parse(html).unwrap();
/// let link = &doc.select("a").unwrap()[0];
///
/// assert_eq!(link.text(), "Link text");
/// assert_eq!(link.attr("href"), Some("https://example.com"));
/// ```
#[derive(Clone, Debug)]
pub struct Element<'a> {
    element: ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Gets the node id of this element.
    pub fn id(&self) -> NodeId {
        self.element.id()
    }

    /// Gets the inner HTML of this element.
    ///
    /// Returns the HTML content inside this element, excluding the element's own tags.
    pub fn inner_html(&self) -> String {
        self.element.inner_html()
    }

    /// Gets the text content of this element.
    ///
    /// Returns the concatenation of all text nodes within this element.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Gets the value of an attribute.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.element.value().attr(name)
    }

    /// Gets the lowercase tag name of this element.
    pub fn tag_name(&self) -> String {
        self.element.value().name().to_lowercase()
    }
}
