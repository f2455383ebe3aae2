//! Tool installation.
//!
//! Classifies a tool's source URL and materializes it under
//! `<installation root>/<category>/<tool>/`.
//!
//! # Architecture
//!
//! - **types**: `InstallError`, `InstallOutcome`, `UninstallOutcome`
//! - **source**: URL classification (repository archive, gist, other)
//! - **archive**: zip snapshot download and extraction
//! - **gist**: single-file gist download
//! - **opener**: browser fallback for non-installable sources
//! - **manager**: `ToolManager`, the caller-facing facade
//! - **worker**: `BackgroundInstaller`, runs jobs off the caller's thread
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use toolshelf::config::Config;
//! use toolshelf::installer::{BackgroundInstaller, ToolManager};
//!
//! let manager = Arc::new(ToolManager::new(&Config::default()));
//! let worker = BackgroundInstaller::new(Arc::clone(&manager));
//! worker.submit_install("Widgets", "Foo", "https://github.com/alice/foo");
//! // ... poll_result() in the event loop
//! ```

mod archive;
mod gist;
mod manager;
mod opener;
mod source;
mod types;
mod worker;

pub use archive::{ARCHIVE_BRANCH, RepoArchiveInstaller, extract_archive, wrapper_prefix};
pub use gist::{DEFAULT_SOURCE_LANGUAGE, GistInstaller};
pub use manager::ToolManager;
pub use opener::{SystemOpener, UrlOpener};
pub use source::{SourceKind, gist_id};
pub use types::{InstallError, InstallOutcome, UninstallOutcome};
pub use worker::{BackgroundInstaller, JobRequest, JobResult, ToolRef, WorkerStatus};
