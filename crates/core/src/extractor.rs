//! Main extraction API.
//!
//! [`Extractor`] runs the whole pipeline: parse, normalize the body, freeze
//! the tree, then score content and look up metadata concurrently. The free
//! functions [`extract`], [`extract_with_url`] and [`fetch_and_extract`] use the
//! default configuration.
//!
//! # Example
//!
//! ```rust
//! use densa_core::extract;
//!
//! let html = r#"<html><head><meta name="author" content="Jane Doe"></head>
//!     <body><div><p>The council approved the budget on Tuesday, after weeks of debate.</p></div></body></html>"#;
//! let article = extract(html).unwrap();
//! assert_eq!(article.author, "Jane Doe");
//! assert!(article.content.contains("approved the budget"));
//! ```

use std::thread;

use tracing::{debug, warn};
use url::Url;

use crate::article::Article;
use crate::dom_tree::DomTree;
use crate::extract::{DensityConfig, collect_images, extract_content};
#[cfg(feature = "fetch")]
use crate::fetch::{FetchConfig, fetch_url};
use crate::metadata::{extract_author, extract_publish_time, extract_title, head_entries};
use crate::parse::Document;
use crate::preprocess::{PreprocessConfig, normalize};
use crate::{DensaError, Result};

/// Configuration for an [`Extractor`].
///
/// # Example
///
/// ```rust
/// use densa_core::ExtractorConfig;
///
/// let config = ExtractorConfig::builder()
///     .weight_by_density_std(true)
///     .resolve_urls(false)
///     .build();
/// assert!(config.density.weight_by_density_std);
/// ```
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Density analyzer options.
    pub density: DensityConfig,

    /// Body normalization options.
    pub preprocess: PreprocessConfig,

    /// Resolve image sources against the page URL when one is known (default: true).
    pub resolve_urls: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self { density: DensityConfig::default(), preprocess: PreprocessConfig::default(), resolve_urls: true }
    }
}

impl ExtractorConfig {
    /// Creates a new builder for ExtractorConfig.
    pub fn builder() -> ExtractorConfigBuilder {
        ExtractorConfigBuilder::new()
    }
}

/// Builder for ExtractorConfig.
pub struct ExtractorConfigBuilder {
    config: ExtractorConfig,
}

impl ExtractorConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: ExtractorConfig::default() }
    }

    /// Sets whether every node's score is emitted as a debug event.
    pub fn debug_density(mut self, value: bool) -> Self {
        self.config.density.debug = value;
        self
    }

    /// Sets whether scores are weighted by the log of the density deviation.
    pub fn weight_by_density_std(mut self, value: bool) -> Self {
        self.config.density.weight_by_density_std = value;
        self
    }

    /// Replaces the tags removed before scoring.
    pub fn ignored_tags(mut self, tags: Vec<String>) -> Self {
        self.config.preprocess.ignored_tags = tags;
        self
    }

    /// Replaces the class fragments marking boilerplate.
    pub fn ignored_classes(mut self, classes: Vec<String>) -> Self {
        self.config.preprocess.ignored_classes = classes;
        self
    }

    /// Sets whether image sources are resolved against the page URL.
    pub fn resolve_urls(mut self, value: bool) -> Self {
        self.config.resolve_urls = value;
        self
    }

    /// Builds the config.
    pub fn build(self) -> ExtractorConfig {
        self.config
    }
}

impl Default for ExtractorConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Output of the content task
struct ContentParts {
    node: usize,
    text: String,
    title: String,
    images: Vec<String>,
}

/// Main entry point for article extraction.
///
/// An `Extractor` holds no per-document state and can be shared between
/// threads.
///
/// # Example
///
/// ```rust
/// use densa_core::Extractor;
///
/// let extractor = Extractor::new();
/// let html = "<html><body><article><p>Some text, with punctuation.</p></article></body></html>";
/// let article = extractor.extract(html).unwrap();
/// assert!(article.content.contains("Some text"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    config: ExtractorConfig,
}

impl Extractor {
    /// Creates a new Extractor with default settings.
    pub fn new() -> Self {
        Self { config: ExtractorConfig::default() }
    }

    /// Creates a new Extractor with a custom configuration.
    pub fn with_config(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extracts the main article from an HTML string.
    ///
    /// # Errors
    ///
    /// - [`DensaError::HtmlParseError`] if there is nothing to parse
    /// - [`DensaError::MissingBody`] if the document has no `<body>`
    /// - [`DensaError::NoCandidate`] if the normalized body holds no text
    pub fn extract(&self, html: &str) -> Result<Article> {
        self.run(html, None)
    }

    /// Extracts the main article, resolving image sources against `url`.
    ///
    /// # Errors
    ///
    /// Returns [`DensaError::InvalidUrl`] if `url` does not parse, otherwise
    /// the same errors as [`Extractor::extract`].
    pub fn extract_with_url(&self, html: &str, url: &str) -> Result<Article> {
        let base_url = Url::parse(url).map_err(|e| DensaError::InvalidUrl(e.to_string()))?;
        self.run(html, Some(&base_url))
    }

    /// Fetches `url` with the default fetch configuration and extracts it.
    #[cfg(feature = "fetch")]
    pub async fn fetch_and_extract(&self, url: &str) -> Result<Article> {
        self.fetch_and_extract_with_config(url, &FetchConfig::default()).await
    }

    /// Fetches `url` with a custom fetch configuration and extracts it.
    #[cfg(feature = "fetch")]
    pub async fn fetch_and_extract_with_config(&self, url: &str, fetch_config: &FetchConfig) -> Result<Article> {
        let html = fetch_url(url, fetch_config).await?;
        self.extract_with_url(&html, url)
    }

    fn run(&self, html: &str, base_url: Option<&Url>) -> Result<Article> {
        let mut doc = Document::parse(html)?;
        let body_source = doc.body_id().ok_or(DensaError::MissingBody)?;
        normalize(&mut doc, body_source, &self.config.preprocess);

        let tree = DomTree::from_document(&doc);
        let body = tree.body().ok_or(DensaError::MissingBody)?;
        let entries = head_entries(&tree);
        let image_base = base_url.filter(|_| self.config.resolve_urls);

        debug!(nodes = tree.len(), head_entries = entries.len(), "document ready");

        let (publish_time, author, content) = thread::scope(|s| {
            let time_task = s.spawn(|| extract_publish_time(&entries, &tree, body));
            let author_task = s.spawn(|| extract_author(&entries, &tree, body));
            let content_task = s.spawn(|| -> Result<ContentParts> {
                let extraction = extract_content(&tree, body, &self.config.density)?;
                let node = extraction.root.node;
                let title = extract_title(&entries, &tree, node);
                let images = collect_images(&tree, node, image_base);
                Ok(ContentParts { node, text: extraction.root.density.combined_text, title, images })
            });

            (
                degrade("publish_time", time_task.join()),
                degrade("author", author_task.join()),
                content_task.join(),
            )
        });

        let content = match content {
            Ok(result) => result?,
            Err(panic) => std::panic::resume_unwind(panic),
        };

        let content_html = tree
            .source_id(content.node)
            .and_then(|id| doc.element(id))
            .map(|element| element.inner_html())
            .unwrap_or_default();

        let article = Article {
            title: content.title,
            images: content.images,
            author,
            publish_time,
            content: content.text,
            content_html,
        };

        debug!(
            title = %article.title,
            images = article.images.len(),
            length = article.length(),
            "extracted article"
        );

        Ok(article)
    }
}

/// A panicked metadata task leaves its field empty
fn degrade(field: &str, result: thread::Result<String>) -> String {
    result.unwrap_or_else(|_| {
        warn!(field, "metadata extractor panicked, leaving field empty");
        String::new()
    })
}

/// Extracts the main article from HTML with the default configuration.
///
/// # Example
///
/// ```rust
/// use densa_core::extract;
///
/// let article = extract("<html><body><p>Hello world.</p></body></html>").unwrap();
/// assert!(article.content.contains("Hello world."));
/// ```
pub fn extract(html: &str) -> Result<Article> {
    Extractor::new().extract(html)
}

/// Extracts with the default configuration, resolving images against `url`.
///
/// # Errors
///
/// Returns [`DensaError::InvalidUrl`] if the URL is invalid.
pub fn extract_with_url(html: &str, url: &str) -> Result<Article> {
    Extractor::new().extract_with_url(html, url)
}

/// Fetches a page and extracts it, all with default configuration.
///
/// # Example
///
/// ```no_run
/// use densa_core::fetch_and_extract;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let article = fetch_and_extract("https://example.com/article").await?;
///     println!("Title: {}", article.title);
///     Ok(())
/// }
/// ```
#[cfg(feature = "fetch")]
pub async fn fetch_and_extract(url: &str) -> Result<Article> {
    Extractor::new().fetch_and_extract(url).await
}
