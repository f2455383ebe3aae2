//! Installer type definitions.
//!
//! Error kinds raised by the installers and the reduced outcomes the
//! orchestration layer reports to callers.

use crate::catalog::CatalogError;
use std::io;
use thiserror::Error;

/// Errors raised while installing a single tool.
#[derive(Debug, Error)]
pub enum InstallError {
    /// URL does not match the gist pattern.
    #[error("Not a gist URL: {0}")]
    InvalidGistUrl(String),

    /// Gist metadata could not be fetched or decoded.
    #[error("Failed to download gist")]
    GistDownload,

    /// No gist file is written in the expected language.
    #[error("Gist has no file in the expected language")]
    NoFilesInGist,

    /// More than one gist file is written in the expected language.
    #[error("Gist has {0} files in the expected language")]
    MultipleFilesInGist(usize),

    /// Repository snapshot could not be downloaded or stored.
    #[error("Archive download failed: {0}")]
    ArchiveDownload(String),

    /// Repository snapshot could not be unpacked.
    #[error("Extraction failed: {0}")]
    Extraction(String),

    /// A name that would escape its target directory.
    #[error("Unsafe path: {0}")]
    UnsafePath(String),

    /// Remote catalog failure.
    #[error(transparent)]
    Network(#[from] CatalogError),

    /// Local filesystem failure.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Caller-facing result of an install request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The tool's target directory was populated.
    Installed,
    /// The source is not installable and was handed to the browser.
    OpenedExternally,
    /// Installation failed; details are in the log.
    Failed,
}

impl InstallOutcome {
    /// Returns true unless the install failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed)
    }

    /// Returns a display string for this outcome.
    #[must_use]
    pub fn display(&self) -> &'static str {
        match self {
            Self::Installed => "installed",
            Self::OpenedExternally => "opened in browser",
            Self::Failed => "installation failed",
        }
    }
}

/// Caller-facing result of an uninstall request.
///
/// Uninstall never fails from the caller's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UninstallOutcome {
    /// The tool's target directory is gone.
    Uninstalled,
}

impl UninstallOutcome {
    /// Returns a display string for this outcome.
    #[must_use]
    pub fn display(&self) -> &'static str {
        match self {
            Self::Uninstalled => "uninstalled",
        }
    }
}
