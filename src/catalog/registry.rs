//! Tool registry with a per-process listing cache.
//!
//! Listing documents are fetched and parsed once per URL; later lookups
//! return the cached map without touching the network.

use super::github::RemoteApi;
use super::listing::parse_listing;
use super::types::{CatalogError, ToolMap};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Instant;
use tracing::{debug, info};

/// Parsed listings keyed by document URL.
///
/// Entries never expire; a fresh process starts empty.
#[derive(Debug, Default)]
pub struct ListingCache {
    entries: RwLock<HashMap<String, Arc<ToolMap>>>,
}

impl ListingCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached listing for a URL.
    #[must_use]
    pub fn get(&self, url: &str) -> Option<Arc<ToolMap>> {
        self.entries
            .read()
            .ok()
            .and_then(|entries| entries.get(url).cloned())
    }

    /// Stores a listing, keeping an entry that raced in first.
    pub fn insert(&self, url: &str, tools: ToolMap) -> Arc<ToolMap> {
        let fresh = Arc::new(tools);
        match self.entries.write() {
            Ok(mut entries) => Arc::clone(entries.entry(url.to_string()).or_insert(fresh)),
            Err(_) => fresh,
        }
    }

    /// Returns true if a listing for the URL is cached.
    #[must_use]
    pub fn contains(&self, url: &str) -> bool {
        self.entries
            .read()
            .map(|entries| entries.contains_key(url))
            .unwrap_or(false)
    }

    /// Number of cached listings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    /// Returns true if nothing has been cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolves category listing documents into tool maps.
pub struct ToolRegistry {
    /// Gateway used for document downloads.
    remote: Arc<dyn RemoteApi>,
    /// Parsed listings.
    cache: ListingCache,
}

impl ToolRegistry {
    /// Creates a registry with an empty cache.
    #[must_use]
    pub fn new(remote: Arc<dyn RemoteApi>) -> Self {
        Self {
            remote,
            cache: ListingCache::new(),
        }
    }

    /// Returns the tools listed in the document at `url`.
    ///
    /// The first successful call per URL fetches and parses the document;
    /// later calls return the same `Arc`. Failures are not cached.
    pub fn list_tools(&self, url: &str) -> Result<Arc<ToolMap>, CatalogError> {
        if let Some(tools) = self.cache.get(url) {
            debug!("[CATALOG] Returning {} cached tools for {}", tools.len(), url);
            return Ok(tools);
        }

        let start = Instant::now();
        let text = self.remote.fetch_text(url)?;
        let tools = parse_listing(&text);
        info!(
            "[CATALOG] Parsed {} tools from {} in {:?}",
            tools.len(),
            url,
            start.elapsed()
        );

        Ok(self.cache.insert(url, tools))
    }

    /// Returns the listing cache.
    #[must_use]
    pub fn cache(&self) -> &ListingCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::ToolEntry;

    #[test]
    fn test_cache_insert_and_get() {
        let cache = ListingCache::new();
        assert!(cache.is_empty());
        assert!(cache.get("http://a").is_none());

        let mut tools = ToolMap::new();
        tools.insert(
            "Foo".to_string(),
            ToolEntry::new("Foo".to_string(), "http://x".to_string(), String::new()),
        );

        let stored = cache.insert("http://a", tools);
        let fetched = cache.get("http://a").unwrap();

        assert!(Arc::ptr_eq(&stored, &fetched));
        assert!(cache.contains("http://a"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_keeps_first_entry() {
        let cache = ListingCache::new();
        let first = cache.insert("http://a", ToolMap::new());
        let second = cache.insert("http://a", ToolMap::new());

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }
}
