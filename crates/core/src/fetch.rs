//! Page retrieval from URLs, files, and stdin.
//!
//! Extraction itself never touches the network; these helpers only produce
//! the HTML string handed to [`Extractor`](crate::Extractor). HTTP fetching is
//! behind the `fetch` feature.

use std::fs;
use std::path::PathBuf;

#[cfg(feature = "fetch")]
use std::time::Duration;

#[cfg(feature = "fetch")]
use reqwest::Client;
#[cfg(feature = "fetch")]
use tracing::debug;
#[cfg(feature = "fetch")]
use url::Url;

use crate::{DensaError, Result};

/// HTTP client configuration for fetching web pages.
#[cfg(feature = "fetch")]
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

#[cfg(feature = "fetch")]
impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: 30, user_agent: format!("Mozilla/5.0 (compatible; densa/{})", env!("CARGO_PKG_VERSION")) }
    }
}

/// Fetches the body of an http(s) URL as text.
///
/// Redirects are followed; a request exceeding `config.timeout` fails with
/// [`DensaError::Timeout`].
#[cfg(feature = "fetch")]
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
    let parsed_url = Url::parse(url).map_err(|e| DensaError::InvalidUrl(e.to_string()))?;

    if !matches!(parsed_url.scheme(), "http" | "https") {
        return Err(DensaError::InvalidUrl(format!("unsupported scheme: {}", parsed_url.scheme())));
    }

    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .build()
        .map_err(DensaError::HttpError)?;

    debug!(url = %parsed_url, timeout = config.timeout, "fetching page");

    let response = client
        .get(parsed_url)
        .header("User-Agent", &config.user_agent)
        .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
        .send()
        .await
        .map_err(|e| if e.is_timeout() { DensaError::Timeout { timeout: config.timeout } } else { DensaError::HttpError(e) })?
        .error_for_status()?;

    let content = response.text().await?;
    debug!(bytes = content.len(), "fetched page");

    Ok(content)
}

/// Reads HTML content from a local file.
pub fn fetch_file(path: &str) -> Result<String> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() { Err(DensaError::FileNotFound(path_buf)) } else { Ok(fs::read_to_string(&path_buf)?) }
}

/// Reads HTML content from standard input until EOF.
pub fn fetch_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    Ok(buffer)
}
