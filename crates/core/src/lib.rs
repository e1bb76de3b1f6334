//! Density-based extraction of the main article from an HTML page.
//!
//! The body is normalized, every element is scored by its text density
//! and punctuation density, and the highest scoring node becomes the article
//! content. Title, author and publish time are read from `<meta>` tags with
//! fallbacks into the body.
//!
//! ```rust
//! use densa_core::{Extractor, ExtractorConfig};
//!
//! let html = r#"<html><head><title>Budget approved | City News</title></head>
//!     <body><div><p>The council approved the budget on Tuesday, after weeks of debate.</p></div></body></html>"#;
//!
//! let extractor = Extractor::with_config(ExtractorConfig::builder().resolve_urls(false).build());
//! let article = extractor.extract(html).unwrap();
//! assert_eq!(article.title, "Budget approved");
//! ```

pub mod article;
pub mod dom_tree;
pub mod error;
pub mod extract;
pub mod extractor;
pub mod fetch;
pub mod metadata;
pub mod parse;
pub mod preprocess;
pub mod scoring;

pub use article::Article;
#[doc(hidden)]
pub use dom_tree::{DomNode, DomTree, NodeKind};
pub use error::{DensaError, Result};
#[doc(hidden)]
pub use extract::{ContentExtraction, NodeInfo};
pub use extract::{DensityConfig, collect_images, extract_content};
#[cfg(feature = "fetch")]
pub use extractor::fetch_and_extract;
pub use extractor::{Extractor, ExtractorConfig, ExtractorConfigBuilder, extract, extract_with_url};
#[cfg(feature = "fetch")]
pub use fetch::{FetchConfig, fetch_url};
pub use fetch::{fetch_file, fetch_stdin};
pub use metadata::{HeadEntry, extract_author, extract_publish_time, extract_title, head_entries};
pub use parse::Document;
#[doc(hidden)]
pub use preprocess::PreprocessConfig;
pub use preprocess::{normalize, preprocess_html};
#[doc(hidden)]
pub use scoring::{TextDensity, calculate_score, symbol_density, text_density};
