//! Error types for Densa operations.
//!
//! This module defines the main error type [`DensaError`] which represents
//! all possible errors that can occur during parsing, content extraction,
//! fetching and serialization.
//!
//! # Example
//!
//! ```rust
//! use densa_core::{DensaError, Result};
//!
//! fn ensure_markup(html: &str) -> Result<()> {
//!     if html.trim().is_empty() {
//!         return Err(DensaError::HtmlParseError("document is empty".to_string()));
//!     }
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for density-based extraction.
///
/// Metadata extractors never produce an error: a missing title, author or
/// publish time degrades to an empty field. Only the failures below abort
/// an extraction call.
///
/// # Example
///
/// ```rust
/// use densa_core::{DensaError, extract};
///
/// match extract("<html><body></body></html>") {
///     Ok(article) => println!("{}", article.content),
///     Err(DensaError::NoCandidate) => println!("nothing to extract"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum DensaError {
    /// HTTP request errors from reqwest.
    ///
    /// This variant wraps network errors, DNS failures, connection issues,
    /// and other HTTP-related problems.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    ///
    /// Returned when an HTTP request exceeds the configured timeout duration.
    #[cfg(feature = "fetch")]
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The input could not be turned into a document tree.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// The parsed document has no `<body>` element (e.g. a frameset page).
    #[error("Document has no <body> element")]
    MissingBody,

    /// The normalized body contains no node with any text to score.
    ///
    /// Surfaced instead of returning an empty content node.
    #[error("No scorable content candidate found in the document")]
    NoCandidate,

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// I/O errors while reading input or writing output.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serializing an [`Article`](crate::Article) failed.
    #[error("Failed to serialize article: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type alias for DensaError.
///
/// This is a convenience alias for `std::result::Result<T, DensaError>`.
pub type Result<T> = std::result::Result<T, DensaError>;
