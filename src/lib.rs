//! toolshelf
//!
//! Installs tools listed in a curated GitHub catalog. The catalog is a
//! repository of markdown listing documents, one per category; each tool
//! is installed either from a zip snapshot of its GitHub repository or
//! from a single-file gist.
//!
//! # Architecture
//!
//! - **Catalog Module**: category index, listing parser, GitHub gateway
//! - **Installer Module**: source classification, archive and gist installers,
//!   orchestration and background execution
//! - **Config Module**: `~/.toolshelf/config.toml`
//! - **Logging Module**: file logging under `~/.toolshelf/logs/`
//!
//! # Usage
//!
//! ```no_run
//! use toolshelf::config::Config;
//! use toolshelf::installer::ToolManager;
//!
//! let manager = ToolManager::new(&Config::default());
//! for (name, category) in manager.list_categories().unwrap_or_default() {
//!     println!("{}: {}", name, category.source_url);
//! }
//! ```

// Clippy configuration - allow common patterns
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

pub mod catalog;
pub mod config;
pub mod installer;
pub mod logging;

// Re-export main types
pub use catalog::{Category, ToolEntry, ToolMap};
pub use config::Config;
pub use installer::{InstallOutcome, ToolManager, UninstallOutcome};
