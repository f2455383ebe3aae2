//! In-memory `RemoteApi` for integration tests.
//!
//! Serves canned responses by exact URL and counts every request so
//! tests can assert on network traffic.

#![allow(dead_code, clippy::expect_used, clippy::unwrap_used)]

use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::sync::Mutex;

use toolshelf::catalog::{CatalogError, RemoteApi};
use zip::write::SimpleFileOptions;

/// Canned-response gateway.
#[derive(Default)]
pub struct FakeRemote {
    responses: Mutex<HashMap<String, Vec<u8>>>,
    requests: Mutex<Vec<String>>,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `body` for `url`.
    pub fn serve(&self, url: &str, body: impl Into<Vec<u8>>) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), body.into());
    }

    /// Number of requests made for `url`.
    pub fn request_count(&self, url: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.as_str() == url)
            .count()
    }

    /// Total number of requests.
    pub fn total_requests(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn lookup(&self, url: &str) -> Result<Vec<u8>, CatalogError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.responses
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| CatalogError::Network(format!("HTTP 404 Not Found for {}", url)))
    }
}

impl RemoteApi for FakeRemote {
    fn fetch_text(&self, url: &str) -> Result<String, CatalogError> {
        let bytes = self.lookup(url)?;
        String::from_utf8(bytes).map_err(|e| CatalogError::Network(e.to_string()))
    }

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, CatalogError> {
        self.lookup(url)
    }
}

/// Builds a zip archive; names ending in `/` become directory entries.
pub fn zip_archive(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    for (name, content) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
    }

    writer.finish().unwrap().into_inner()
}

/// Serializes gist metadata with the given `(filename, language, content)` files.
pub fn gist_json(files: &[(&str, Option<&str>, &str)]) -> String {
    let files: serde_json::Map<String, serde_json::Value> = files
        .iter()
        .map(|(name, language, content)| {
            (
                (*name).to_string(),
                serde_json::json!({
                    "filename": name,
                    "language": language,
                    "content": content,
                    "truncated": false,
                }),
            )
        })
        .collect();

    serde_json::json!({ "id": "abcdef1234567890", "files": files }).to_string()
}
