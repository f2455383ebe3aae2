//! GitHub API gateway.
//!
//! Anonymous GET requests against the repository contents and gist
//! endpoints, plus raw downloads of listing documents and archives.

use super::types::CatalogError;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Default GitHub REST API root.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Media type requested from the REST API.
const API_ACCEPT: &str = "application/vnd.github.v3+json";

/// Capability for issuing anonymous GET requests.
///
/// Implementations never retry; callers decide how to react to failures.
pub trait RemoteApi: Send + Sync {
    /// Fetches a URL and returns the body as text.
    fn fetch_text(&self, url: &str) -> Result<String, CatalogError>;

    /// Fetches a URL and returns the raw body.
    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, CatalogError>;
}

/// Fetches a URL and decodes the body as JSON.
pub fn fetch_json<T: DeserializeOwned>(api: &dyn RemoteApi, url: &str) -> Result<T, CatalogError> {
    let body = api.fetch_text(url)?;
    serde_json::from_str(&body).map_err(|e| {
        warn!("[CATALOG] Failed to parse JSON from {}: {}", url, e);
        CatalogError::Network(format!("Failed to parse response: {}", e))
    })
}

/// Entry of a repository contents listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentEntry {
    /// File or directory name.
    pub name: String,
    /// Entry type ("file" or "dir").
    #[serde(rename = "type", default)]
    pub entry_type: String,
    /// Blob sha.
    #[serde(default)]
    pub sha: String,
    /// Raw download URL (files only).
    #[serde(default)]
    pub download_url: Option<String>,
}

impl ContentEntry {
    /// Returns true if this entry is a file.
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.entry_type == "file"
    }
}

/// Gist metadata as returned by the gists endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GistInfo {
    /// Files of the gist keyed by filename.
    pub files: HashMap<String, GistFile>,
}

/// One file of a gist.
#[derive(Debug, Clone, Deserialize)]
pub struct GistFile {
    /// Declared filename.
    pub filename: String,
    /// Detected language, absent for unknown file types.
    #[serde(default)]
    pub language: Option<String>,
    /// Inline content (may be cut short for large files).
    #[serde(default)]
    pub content: Option<String>,
    /// Whether `content` was truncated by the API.
    #[serde(default)]
    pub truncated: bool,
    /// URL of the full raw content.
    #[serde(default)]
    pub raw_url: Option<String>,
}

/// Builds the contents listing URL for a repository.
#[must_use]
pub fn contents_url(api_url: &str, owner: &str, repo: &str) -> String {
    format!("{}/repos/{}/{}/contents", api_url.trim_end_matches('/'), owner, repo)
}

/// Builds the metadata URL for a gist.
#[must_use]
pub fn gist_url(api_url: &str, gist_id: &str) -> String {
    format!("{}/gists/{}", api_url.trim_end_matches('/'), gist_id)
}

/// Blocking GitHub client used in production.
pub struct GitHubClient {
    /// HTTP client.
    client: reqwest::blocking::Client,
    /// API root, used to decide which requests get the API media type.
    api_url: String,
}

impl Default for GitHubClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL, Some(Duration::from_secs(30)))
    }
}

impl GitHubClient {
    /// Creates a new client.
    ///
    /// `timeout` of `None` leaves requests unbounded.
    #[must_use]
    pub fn new(api_url: &str, timeout: Option<Duration>) -> Self {
        assert!(!api_url.is_empty(), "API URL must not be empty");

        let mut builder = reqwest::blocking::Client::builder().user_agent("toolshelf");
        builder = builder.timeout(timeout);
        let client = builder
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());

        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    /// Sends a GET request and checks the status.
    fn get(&self, url: &str) -> Result<reqwest::blocking::Response, CatalogError> {
        assert!(!url.is_empty(), "URL must not be empty");

        debug!("[CATALOG] GET {}", url);
        let start = Instant::now();

        let mut request = self.client.get(url);
        if url.starts_with(&self.api_url) {
            request = request.header("Accept", API_ACCEPT);
        }

        let response = request.send().map_err(|e| {
            warn!("[CATALOG] HTTP request failed: {}", e);
            CatalogError::Network(e.to_string())
        })?;

        let status = response.status();
        debug!("[CATALOG] Response: {} in {:?}", status, start.elapsed());

        if !status.is_success() {
            warn!("[CATALOG] Request to {} failed: {}", url, status);
            return Err(CatalogError::Network(format!("HTTP {} for {}", status, url)));
        }

        Ok(response)
    }
}

impl RemoteApi for GitHubClient {
    fn fetch_text(&self, url: &str) -> Result<String, CatalogError> {
        let response = self.get(url)?;
        let content = response
            .text()
            .map_err(|e| CatalogError::Network(format!("Failed to read content: {}", e)))?;

        info!("[CATALOG] Downloaded {} bytes from {}", content.len(), url);
        Ok(content)
    }

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, CatalogError> {
        let response = self.get(url)?;
        let bytes = response
            .bytes()
            .map_err(|e| CatalogError::Network(format!("Failed to read content: {}", e)))?;

        info!("[CATALOG] Downloaded {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}
