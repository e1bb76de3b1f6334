//! Article output type.
//!
//! [`Article`] is the complete result of an extraction: the winning node's
//! text and HTML plus the metadata found around it. Every field is omitted
//! from JSON output when empty.

use serde::{Deserialize, Serialize};

use crate::Result;

/// The extracted main article of an HTML page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Article title, empty if none was found.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,

    /// `src` of every image inside the content node, in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,

    /// Author name, empty if none was found.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub author: String,

    /// Publish time as written in the page.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub publish_time: String,

    /// Plain text of the content node, one line per text block.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,

    /// Serialized HTML of the content node's children.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content_html: String,
}

impl Article {
    /// Serializes the article as single-line JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes the article as JSON indented by four spaces.
    pub fn to_json_pretty(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Number of characters in the plain text content.
    pub fn length(&self) -> usize {
        self.content.chars().count()
    }
}
