//! Catalog type definitions.
//!
//! Categories and tool entries as exposed to callers, plus the error
//! type shared by every network-facing catalog component.

use std::collections::BTreeMap;

use thiserror::Error;

/// Extension carried by every listing document.
pub const LISTING_EXTENSION: &str = ".md";

/// Overview document excluded from the category index.
pub const OVERVIEW_DOCUMENT: &str = "README.md";

/// Tools of one category, keyed and sorted by tool name.
pub type ToolMap = BTreeMap<String, ToolEntry>;

/// A named group of tools backed by one listing document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Listing filename without its extension.
    pub name: String,
    /// Raw download URL of the listing document.
    pub source_url: String,
    /// Opaque revision marker (the blob sha).
    pub content_hash: String,
}

impl Category {
    /// Creates a category from a listing document name.
    ///
    /// Returns `None` when the name does not carry the listing extension
    /// or is the overview document.
    #[must_use]
    pub fn from_document(file_name: &str, source_url: String, content_hash: String) -> Option<Self> {
        if file_name == OVERVIEW_DOCUMENT {
            return None;
        }

        let name = file_name.strip_suffix(LISTING_EXTENSION)?;
        if name.is_empty() {
            return None;
        }

        Some(Self {
            name: name.to_string(),
            source_url,
            content_hash,
        })
    }
}

/// A single installable tool from a listing document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolEntry {
    /// Tool name, unique within its category.
    pub name: String,
    /// Resolved source URL (never empty).
    pub source_url: String,
    /// Free-form description, possibly itself a resolved URL.
    pub description: String,
}

impl ToolEntry {
    /// Creates a new tool entry.
    #[must_use]
    pub fn new(name: String, source_url: String, description: String) -> Self {
        assert!(!source_url.is_empty(), "Tool source URL must not be empty");
        Self {
            name,
            source_url,
            description,
        }
    }
}

/// Errors raised while reading the remote catalog.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Transport failure, non-success status or undecodable body.
    #[error("Network error: {0}")]
    Network(String),

    /// The category listing of the source repository could not be read.
    #[error("Failed to list categories: {0}")]
    RemoteListing(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_document() {
        let category = Category::from_document(
            "Widgets.md",
            "https://raw.githubusercontent.com/o/r/master/Widgets.md".to_string(),
            "abc123".to_string(),
        )
        .unwrap();

        assert_eq!(category.name, "Widgets");
        assert_eq!(category.content_hash, "abc123");
    }

    #[test]
    fn test_category_rejects_overview_and_other_files() {
        assert!(Category::from_document("README.md", String::new(), String::new()).is_none());
        assert!(Category::from_document("LICENSE", String::new(), String::new()).is_none());
        assert!(Category::from_document("script.py", String::new(), String::new()).is_none());
        assert!(Category::from_document(".md", String::new(), String::new()).is_none());
    }

    #[test]
    #[should_panic(expected = "Tool source URL must not be empty")]
    fn test_tool_entry_requires_url() {
        let _ = ToolEntry::new("Foo".to_string(), String::new(), String::new());
    }

    #[test]
    fn test_catalog_error_display() {
        let err = CatalogError::Network("timed out".to_string());
        assert_eq!(err.to_string(), "Network error: timed out");
    }
}
