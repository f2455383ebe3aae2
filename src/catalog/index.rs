//! Category index builder.
//!
//! Enumerates the listing documents at the root of the catalog repository.

use super::github::{ContentEntry, RemoteApi, contents_url, fetch_json};
use super::types::{CatalogError, Category};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Default catalog repository owner.
pub const DEFAULT_LISTING_OWNER: &str = "Pythonista-Tools";

/// Default catalog repository name.
pub const DEFAULT_LISTING_REPO: &str = "Pythonista-Tools";

/// Builds the category index of one catalog repository.
pub struct CategoryIndex {
    /// Gateway used for the contents listing.
    remote: Arc<dyn RemoteApi>,
    /// REST API root.
    api_url: String,
    /// Repository owner.
    owner: String,
    /// Repository name.
    repo: String,
}

impl CategoryIndex {
    /// Creates an index for `owner/repo`.
    #[must_use]
    pub fn new(remote: Arc<dyn RemoteApi>, api_url: &str, owner: &str, repo: &str) -> Self {
        assert!(!owner.is_empty(), "Owner must not be empty");
        assert!(!repo.is_empty(), "Repository must not be empty");

        Self {
            remote,
            api_url: api_url.to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
        }
    }

    /// Lists every category, keyed by name.
    ///
    /// Rebuilt from the remote listing on each call.
    pub fn list_categories(&self) -> Result<BTreeMap<String, Category>, CatalogError> {
        let url = contents_url(&self.api_url, &self.owner, &self.repo);
        info!("[CATALOG] Listing categories of {}/{}", self.owner, self.repo);

        let entries: Vec<ContentEntry> = fetch_json(self.remote.as_ref(), &url).map_err(|e| {
            warn!("[CATALOG] Category listing failed: {}", e);
            CatalogError::RemoteListing(e.to_string())
        })?;

        let categories = build_categories(entries);
        info!("[CATALOG] Found {} categories", categories.len());
        Ok(categories)
    }
}

/// Keeps listing documents and derives their category names.
fn build_categories(entries: Vec<ContentEntry>) -> BTreeMap<String, Category> {
    let mut categories = BTreeMap::new();

    for entry in entries {
        let Some(download_url) = entry.download_url else {
            debug!("[CATALOG] Skipping '{}': no download URL", entry.name);
            continue;
        };

        if let Some(category) = Category::from_document(&entry.name, download_url, entry.sha) {
            categories.insert(category.name.clone(), category);
        }
    }

    categories
}
