//! Remote tool catalog.
//!
//! Reads the curated catalog repository: its category index, the
//! listing document of each category, and the GitHub endpoints the
//! installers need.
//!
//! # Architecture
//!
//! - **types**: `Category`, `ToolEntry`, `CatalogError`
//! - **github**: `RemoteApi` capability and the blocking `GitHubClient`
//! - **index**: category enumeration from the repository contents
//! - **listing**: two-stage listing document parser
//! - **registry**: cached listing lookups

mod github;
mod index;
mod listing;
mod registry;
mod types;

pub use github::{
    ContentEntry, DEFAULT_API_URL, GistFile, GistInfo, GitHubClient, RemoteApi, contents_url,
    fetch_json, gist_url,
};
pub use index::{CategoryIndex, DEFAULT_LISTING_OWNER, DEFAULT_LISTING_REPO};
pub use listing::{LabelTable, parse_listing};
pub use registry::{ListingCache, ToolRegistry};
pub use types::{
    CatalogError, Category, LISTING_EXTENSION, OVERVIEW_DOCUMENT, ToolEntry, ToolMap,
};
