//! Title, author and publish time extraction.
//!
//! Every extractor reads the same list of [`HeadEntry`] values collected once
//! from `<meta>` tags, then falls back to the (normalized) body. All of them
//! return an empty string when nothing matches.

use std::sync::LazyLock;

use regex::Regex;

use crate::dom_tree::DomTree;
use crate::scoring::collapse_whitespace;

/// Title patterns matched against [`HeadEntry::key`], most specific first
const TITLE_PATTERNS: &[&str] = &["articletitle", ":title", "title"];

const AUTHOR_PATTERNS: &[&str] = &["author", "creator", "byline"];

const PUBLISH_TIME_PATTERNS: &[&str] = &[
    "published_time",
    "publishdate",
    "publish_date",
    "pubdate",
    "datepublished",
    "release_date",
    "publish",
    "date",
    "time",
];

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4"];

/// Bounds (inclusive, in characters) for meta values and author names
const MIN_VALUE_CHARS: usize = 2;
const MAX_VALUE_CHARS: usize = 50;

static AUTHOR_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:(?:written\s+)?by\b|(?:作者|记者|文)\s*[:：])\s*[:：]?\s*").expect("valid author label regex")
});

static CJK_BYLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:作者|记者)\s*[:：]\s*([\p{Han}·A-Za-z]{2,20})").expect("valid byline regex"));

static LATIN_BYLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bBy\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+){1,2})\b").expect("valid byline regex")
});

static DATE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\d{4}[-/.]\d{1,2}[-/.]\d{1,2}|\d{4}年\d{1,2}月\d{1,2}日)(?:\s*\d{1,2}:\d{2}(?::\d{2})?)?")
        .expect("valid date regex")
});

/// A `<meta>` key/value pair from the document head
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadEntry {
    /// Lowercased `name` or `property` attribute
    pub key: String,
    /// Trimmed `content` attribute
    pub value: String,
}

/// Collect the [`HeadEntry`] list of a document.
///
/// Tags carrying `charset` or `http-equiv` are skipped, as are values outside
/// 2..=50 characters. Entries are sorted by key length, longest first; equal
/// lengths keep document order.
pub fn head_entries(tree: &DomTree) -> Vec<HeadEntry> {
    let Some(head) = tree.head() else {
        return Vec::new();
    };

    let mut entries: Vec<HeadEntry> = tree
        .find_all(head, &["meta"])
        .filter(|meta| tree.attr(*meta, "charset").is_none() && tree.attr(*meta, "http-equiv").is_none())
        .filter_map(|meta| {
            let key = tree
                .attr(meta, "name")
                .filter(|name| !name.is_empty())
                .or_else(|| tree.attr(meta, "property"))?;
            let value = tree.attr(meta, "content")?.trim();
            if key.is_empty() || !has_value_length(value) {
                return None;
            }
            Some(HeadEntry { key: key.to_lowercase(), value: value.to_string() })
        })
        .collect();

    entries.sort_by(|a, b| b.key.len().cmp(&a.key.len()));
    entries
}

fn has_value_length(value: &str) -> bool {
    (MIN_VALUE_CHARS..=MAX_VALUE_CHARS).contains(&value.chars().count())
}

/// Everything before the first `_` or `|`, trimmed
fn strip_site_suffix(title: &str) -> &str {
    title.split(['_', '|']).next().unwrap_or_default().trim()
}

/// Extract the article title.
///
/// Tries, in order: a head entry whose key contains `articletitle`, `:title`
/// or `title`; the `<title>` element; the first `h1`-`h4` found in the
/// subtree of the content root's nearest ancestor that has one.
pub fn extract_title(entries: &[HeadEntry], tree: &DomTree, content_root: usize) -> String {
    for entry in entries {
        for pattern in TITLE_PATTERNS {
            if entry.key.contains(pattern) {
                let title = strip_site_suffix(&entry.value);
                if !title.is_empty() {
                    return title.to_string();
                }
            }
        }
    }

    if let Some(title) = tree.find_all(tree.root(), &["title"]).next() {
        let text = tree.text(title);
        let title = strip_site_suffix(&text);
        if !title.is_empty() {
            return title.to_string();
        }
    }

    find_heading(tree, content_root)
}

/// Walk up from the parent of `content_root`, returning the text of the first
/// heading in the subtree of each ancestor in turn.
fn find_heading(tree: &DomTree, content_root: usize) -> String {
    let mut current = tree.get_parent(content_root);
    while let Some(ancestor) = current {
        if let Some(heading) = tree.find_all(ancestor, HEADINGS).next() {
            return collapse_whitespace(&tree.text(heading));
        }
        current = tree.get_parent(ancestor);
    }
    String::new()
}

/// Extract the author name.
///
/// Tries, in order: head entries keyed `author`/`creator`/`byline` (URL values
/// are skipped); a body element marked up as an author (`itemprop`, `rel`, or a
/// class/id mentioning `author` or `byline`); a byline phrase in the body text.
pub fn extract_author(entries: &[HeadEntry], tree: &DomTree, body: usize) -> String {
    for entry in entries {
        if AUTHOR_PATTERNS.iter().any(|pattern| entry.key.contains(pattern)) && !is_url(&entry.value) {
            return entry.value.clone();
        }
    }

    if let Some(author) = author_from_markup(tree, body) {
        return author;
    }

    let text = collapse_whitespace(&tree.text(body));
    [&*CJK_BYLINE, &*LATIN_BYLINE]
        .iter()
        .find_map(|re| re.captures(&text).and_then(|caps| caps.get(1)))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

fn is_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://") || value.starts_with("//")
}

fn is_author_markup(tree: &DomTree, id: usize) -> bool {
    if tree.attr(id, "itemprop") == Some("author") || tree.attr(id, "rel") == Some("author") {
        return true;
    }
    ["class", "id"].iter().any(|name| {
        tree.attr(id, name).is_some_and(|value| {
            let value = value.to_lowercase();
            value.contains("author") || value.contains("byline")
        })
    })
}

fn author_from_markup(tree: &DomTree, body: usize) -> Option<String> {
    tree.descendants(body)
        .filter(|id| tree.is_element(*id) && is_author_markup(tree, *id))
        .find_map(|id| {
            let text = collapse_whitespace(&tree.text(id));
            let name = AUTHOR_LABEL.replace(&text, "").trim().to_string();
            has_value_length(&name).then_some(name)
        })
}

/// Extract the publish time as written in the page.
///
/// Tries, in order: head entries matching the date patterns (by pattern
/// priority, values must contain a digit); the first `<time>` element's
/// `datetime` or text; the first date-like token in the body text.
pub fn extract_publish_time(entries: &[HeadEntry], tree: &DomTree, body: usize) -> String {
    for pattern in PUBLISH_TIME_PATTERNS {
        if let Some(entry) = entries
            .iter()
            .find(|entry| entry.key.contains(pattern) && entry.value.chars().any(|c| c.is_ascii_digit()))
        {
            return entry.value.clone();
        }
    }

    if let Some(time) = tree.find_all(body, &["time"]).next() {
        if let Some(datetime) = tree.attr(time, "datetime").map(str::trim)
            && !datetime.is_empty()
        {
            return datetime.to_string();
        }
        let text = collapse_whitespace(&tree.text(time));
        if !text.is_empty() {
            return text;
        }
    }

    let text = collapse_whitespace(&tree.text(body));
    DATE_TOKEN.find(&text).map(|m| m.as_str().to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::Document;

    fn tree(html: &str) -> DomTree {
        DomTree::from_document(&Document::parse(html).unwrap())
    }

    fn entry(key: &str, value: &str) -> HeadEntry {
        HeadEntry { key: key.to_string(), value: value.to_string() }
    }

    #[test]
    fn test_head_entries() {
        let tree = tree(
            r#"<html><head>
                <meta charset="utf-8">
                <meta http-equiv="refresh" content="30">
                <meta name="Author" content="  Jane Doe ">
                <meta property="og:title" content="Budget approved | City News">
                <meta name="description" content="x">
                <meta name="keywords" content="this value is far too long to be kept as a head entry value">
                <meta name="viewport" content="width=device-width">
            </head><body></body></html>"#,
        );
        let entries = head_entries(&tree);

        assert_eq!(
            entries,
            vec![
                entry("og:title", "Budget approved | City News"),
                entry("viewport", "width=device-width"),
                entry("author", "Jane Doe"),
            ]
        );
    }

    #[test]
    fn test_head_entry_empty_name_falls_back_to_property() {
        let tree = tree(
            r#"<html><head><meta name="" property="og:title" content="Budget approved"></head><body></body></html>"#,
        );
        assert_eq!(head_entries(&tree), vec![entry("og:title", "Budget approved")]);
    }

    #[test]
    fn test_head_entries_without_head_metas() {
        let tree = tree("<html><body><meta name=\"author\" content=\"Body Meta\"></body></html>");
        assert!(head_entries(&tree).is_empty());
    }

    #[test]
    fn test_meta_title_beats_title_tag() {
        let tree = tree(
            r#"<html><head><title>Site | Something else</title>
                <meta property="og:title" content="Real Headline_Site"></head>
                <body><div><p>Text</p></div></body></html>"#,
        );
        let entries = head_entries(&tree);
        let content = tree.find_all(tree.root(), &["div"]).next().unwrap();
        assert_eq!(extract_title(&entries, &tree, content), "Real Headline");
    }

    #[test]
    fn test_articletitle_pattern_wins_over_shorter_keys() {
        let entries = vec![entry("twitter:title", "Twitter Title"), entry("title", "Plain")];
        let tree = tree("<html><body><p>x</p></body></html>");
        let body = tree.body().unwrap();
        assert_eq!(extract_title(&entries, &tree, body), "Twitter Title");

        let entries = vec![entry("og:articletitle", "Article Title"), entry("og:title", "Other")];
        assert_eq!(extract_title(&entries, &tree, body), "Article Title");
    }

    #[test]
    fn test_title_tag_with_site_suffix() {
        let tree = tree("<html><head><title> Budget approved | City News </title></head><body><p>x</p></body></html>");
        let p = tree.find_all(tree.root(), &["p"]).next().unwrap();
        assert_eq!(extract_title(&[], &tree, p), "Budget approved");
    }

    #[test]
    fn test_title_falls_back_to_nearest_heading() {
        let tree = tree(
            r#"<html><body>
                <div id="outer"><h2>Outer heading</h2>
                    <div id="wrap"><h3>  Near   heading </h3><div id="content"><p>Body text.</p></div></div>
                </div>
            </body></html>"#,
        );
        let content = tree
            .find_all(tree.root(), &["div"])
            .find(|id| tree.attr(*id, "id") == Some("content"))
            .unwrap();
        assert_eq!(extract_title(&[], &tree, content), "Near heading");
    }

    #[test]
    fn test_title_empty_when_nothing_found() {
        let tree = tree("<html><body><div><p>No headings here.</p></div></body></html>");
        let p = tree.find_all(tree.root(), &["p"]).next().unwrap();
        assert_eq!(extract_title(&[], &tree, p), "");
    }

    #[test]
    fn test_author_from_meta() {
        let tree = tree(r#"<html><head><meta name="author" content="Jane Doe"></head><body><p>Text</p></body></html>"#);
        let entries = head_entries(&tree);
        assert_eq!(extract_author(&entries, &tree, tree.body().unwrap()), "Jane Doe");
    }

    #[test]
    fn test_author_skips_profile_urls() {
        let tree = tree(
            r#"<html><head><meta property="article:author" content="https://example.com/jane"></head>
                <body><span class="byline">By John Smith</span><p>Text</p></body></html>"#,
        );
        let entries = head_entries(&tree);
        assert_eq!(extract_author(&entries, &tree, tree.body().unwrap()), "John Smith");
    }

    #[test]
    fn test_author_from_markup() {
        let tree = tree(r#"<html><body><a rel="author" href="/u/ana">Ana Lima</a><p>Text</p></body></html>"#);
        assert_eq!(extract_author(&[], &tree, tree.body().unwrap()), "Ana Lima");

        let tree = self::tree(r#"<html><body><div class="post-author">作者：李明</div></body></html>"#);
        assert_eq!(extract_author(&[], &tree, tree.body().unwrap()), "李明");
    }

    #[test]
    fn test_author_label_needs_word_boundary() {
        let tree = tree(r#"<html><body><span itemprop="author">Byron Black</span></body></html>"#);
        assert_eq!(extract_author(&[], &tree, tree.body().unwrap()), "Byron Black");
    }

    #[test]
    fn test_author_from_body_text() {
        let tree = tree("<html><body><p>本报讯 记者：王小二 报道</p></body></html>");
        assert_eq!(extract_author(&[], &tree, tree.body().unwrap()), "王小二");

        let tree = self::tree("<html><body><p>Story by the desk. By Maria Garcia, staff writer.</p></body></html>");
        assert_eq!(extract_author(&[], &tree, tree.body().unwrap()), "Maria Garcia");
    }

    #[test]
    fn test_author_empty_when_unknown() {
        let tree = tree("<html><body><p>nothing to see</p></body></html>");
        assert_eq!(extract_author(&[], &tree, tree.body().unwrap()), "");
    }

    #[test]
    fn test_publish_time_pattern_priority() {
        let entries = vec![
            entry("article:modified_time", "2024-03-06T09:00:00Z"),
            entry("article:published_time", "2024-03-05T10:30:00Z"),
        ];
        let tree = tree("<html><body><p>x</p></body></html>");
        let body = tree.body().unwrap();
        assert_eq!(extract_publish_time(&entries, &tree, body), "2024-03-05T10:30:00Z");

        let entries = vec![entry("og:date", "yesterday"), entry("pubdate", "2023-01-02")];
        assert_eq!(extract_publish_time(&entries, &tree, body), "2023-01-02");
    }

    #[test]
    fn test_publish_time_from_time_element() {
        let tree = tree(
            r#"<html><body><p>Posted <time datetime="2022-11-01T08:00">Nov 1</time></p><time>2020-01-01</time></body></html>"#,
        );
        assert_eq!(extract_publish_time(&[], &tree, tree.body().unwrap()), "2022-11-01T08:00");

        let tree = self::tree("<html><body><time> March 3, 2021 </time></body></html>");
        assert_eq!(extract_publish_time(&[], &tree, tree.body().unwrap()), "March 3, 2021");
    }

    #[test]
    fn test_publish_time_from_body_text() {
        let tree = tree("<html><body><p>发布时间：2024年3月5日 10:30 来源：新华社</p></body></html>");
        assert_eq!(extract_publish_time(&[], &tree, tree.body().unwrap()), "2024年3月5日 10:30");

        let tree = self::tree("<html><body><p>Updated 2023/07/14, see below.</p></body></html>");
        assert_eq!(extract_publish_time(&[], &tree, tree.body().unwrap()), "2023/07/14");
    }

    #[test]
    fn test_publish_time_empty_when_unknown() {
        let tree = tree("<html><body><p>no dates</p></body></html>");
        assert_eq!(extract_publish_time(&[], &tree, tree.body().unwrap()), "");
    }
}
