//! Boilerplate stripping applied to `<body>` before density scoring.
//!
//! The density formulas count tags, so navigation chrome, embeds and empty
//! wrappers left in the tree would skew `tgi`/`ltgi` for every ancestor.
//! [`normalize`] removes them in place and flattens inline emphasis inside
//! paragraphs so that `<p>Some <b>bold</b> text</p>` counts as one tag.

use ego_tree::NodeId;
use scraper::{ElementRef, Node};
use tracing::debug;

use crate::Result;
use crate::parse::Document;

const IGNORED_TAGS: &[&str] = &["style", "script", "link", "video", "iframe", "source", "picture", "header", "noscript"];

const IGNORED_CLASSES: &[&str] = &[
    "share",
    "contribution",
    "copyright",
    "copy-right",
    "disclaimer",
    "recommend",
    "related",
    "footer",
    "comment",
    "social",
    "submeta",
    "report-infor",
];

const REMOVABLE_IF_EMPTY: &[&str] = &["section", "h1", "h2", "h3", "h4", "h5", "h6", "span"];

/// Inline tags unwrapped inside `<p>`
const INLINE_EMPHASIS: &[&str] = &["span", "strong", "em", "b"];

/// Configuration for body normalization
#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    /// Tags removed together with their content
    pub ignored_tags: Vec<String>,
    /// Class attribute fragments marking boilerplate (substring match)
    pub ignored_classes: Vec<String>,
    /// Tags removed when they have no element children and only whitespace text
    pub removable_if_empty: Vec<String>,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            ignored_tags: IGNORED_TAGS.iter().map(|s| s.to_string()).collect(),
            ignored_classes: IGNORED_CLASSES.iter().map(|s| s.to_string()).collect(),
            removable_if_empty: REMOVABLE_IF_EMPTY.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Parse `html`, normalize its body and serialize the result.
///
/// Documents without a body are returned re-serialized but otherwise untouched.
pub fn preprocess_html(html: &str, config: &PreprocessConfig) -> Result<String> {
    let mut doc = Document::parse(html)?;
    if let Some(body) = doc.body_id() {
        normalize(&mut doc, body, config);
    }
    Ok(doc.as_string())
}

/// What to do with a node when the traversal enters it
enum EnterAction {
    Remove,
    Descend,
    Skip,
}

enum Visit {
    Enter(NodeId),
    Leave(NodeId),
}

/// Normalize the subtree rooted at `body` in place.
///
/// Ignored tags go first. Then a single depth-first pass removes comments and
/// blocklisted classes on the way down (without descending into them). On the
/// way back up it unwraps inline emphasis inside `<p>`, once the paragraph's
/// descendants have been through the class check, and removes elements that
/// ended up empty. The body element itself is never removed.
pub fn normalize(doc: &mut Document, body: NodeId, config: &PreprocessConfig) {
    let mut removed = remove_ignored_tags(doc, body, config);
    let mut unwrapped = 0usize;

    let mut stack = vec![Visit::Enter(body)];
    while let Some(visit) = stack.pop() {
        match visit {
            Visit::Enter(id) => {
                match enter_action(doc, id, body, config) {
                    EnterAction::Remove => {
                        doc.remove(id);
                        removed += 1;
                        continue;
                    }
                    EnterAction::Skip => continue,
                    EnterAction::Descend => {}
                }

                stack.push(Visit::Leave(id));
                let children: Vec<NodeId> = doc
                    .html()
                    .tree
                    .get(id)
                    .map(|node| node.children().map(|child| child.id()).collect())
                    .unwrap_or_default();
                stack.extend(children.into_iter().rev().map(Visit::Enter));
            }
            Visit::Leave(id) => {
                if is_paragraph(doc, id) {
                    unwrapped += unwrap_inline(doc, id);
                }
                if id != body && is_empty_removable(doc, id, config) {
                    doc.remove(id);
                    removed += 1;
                }
            }
        }
    }

    debug!(removed, unwrapped, "normalized body");
}

fn remove_ignored_tags(doc: &mut Document, body: NodeId, config: &PreprocessConfig) -> usize {
    let ignored: Vec<NodeId> = match doc.html().tree.get(body) {
        Some(body) => body
            .descendants()
            .filter(|node| {
                matches!(node.value(), Node::Element(element)
                    if config.ignored_tags.iter().any(|tag| tag == element.name()))
            })
            .map(|node| node.id())
            .collect(),
        None => return 0,
    };

    let count = ignored.len();
    for id in ignored {
        doc.remove(id);
    }
    count
}

fn enter_action(doc: &Document, id: NodeId, body: NodeId, config: &PreprocessConfig) -> EnterAction {
    let Some(node) = doc.html().tree.get(id) else {
        return EnterAction::Skip;
    };

    match node.value() {
        Node::Comment(_) => EnterAction::Remove,
        Node::Element(element) => {
            if id != body
                && let Some(class) = element.attr("class")
                && config.ignored_classes.iter().any(|fragment| class.contains(fragment.as_str()))
            {
                return EnterAction::Remove;
            }
            EnterAction::Descend
        }
        _ => EnterAction::Skip,
    }
}

fn is_paragraph(doc: &Document, id: NodeId) -> bool {
    matches!(doc.html().tree.get(id).map(|node| node.value()), Some(Node::Element(element)) if element.name() == "p")
}

/// Unwrap every inline emphasis descendant of the `<p>` at `id`
fn unwrap_inline(doc: &mut Document, id: NodeId) -> usize {
    let targets: Vec<NodeId> = match doc.html().tree.get(id) {
        Some(p) => p
            .descendants()
            .skip(1)
            .filter(|node| matches!(node.value(), Node::Element(element) if INLINE_EMPHASIS.contains(&element.name())))
            .map(|node| node.id())
            .collect(),
        None => return 0,
    };

    let count = targets.len();
    for target in targets {
        doc.unwrap_element(target);
    }
    count
}

/// True for a `<p>` or removable-if-empty tag with no element children and blank text
fn is_empty_removable(doc: &Document, id: NodeId, config: &PreprocessConfig) -> bool {
    let Some(element) = doc.html().tree.get(id).and_then(ElementRef::wrap) else {
        return false;
    };

    let name = element.value().name();
    if name != "p" && !config.removable_if_empty.iter().any(|tag| tag == name) {
        return false;
    }

    let has_element_children = element.children().any(|child| child.value().is_element());
    !has_element_children && element.text().all(|text| text.trim().is_empty())
}
