//! Gist installer.
//!
//! Picks the single source file of a gist and writes it into the target
//! directory.

use super::source::gist_id;
use super::types::InstallError;
use crate::catalog::{GistFile, GistInfo, RemoteApi, fetch_json, gist_url};
use std::fs;
use std::path::{Component, Path};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Default language of installable gist files.
pub const DEFAULT_SOURCE_LANGUAGE: &str = "Python";

/// Installs tools distributed as gists.
pub struct GistInstaller {
    /// Gateway used for gist metadata.
    remote: Arc<dyn RemoteApi>,
    /// REST API root.
    api_url: String,
    /// Language a file must declare to be installed.
    language: String,
}

impl GistInstaller {
    /// Creates a new gist installer.
    #[must_use]
    pub fn new(remote: Arc<dyn RemoteApi>, api_url: &str, language: &str) -> Self {
        assert!(!language.is_empty(), "Source language must not be empty");

        Self {
            remote,
            api_url: api_url.to_string(),
            language: language.to_string(),
        }
    }

    /// Downloads the gist at `url` and writes its source file into `target_dir`.
    ///
    /// Nothing is written unless exactly one file qualifies.
    pub fn install(&self, url: &str, target_dir: &Path) -> Result<(), InstallError> {
        let (filename, content) = self.download(url)?;
        ensure_plain_file_name(&filename)?;

        let dest = target_dir.join(&filename);
        fs::write(&dest, content)?;

        info!("[INSTALL] Wrote gist file {:?}", dest);
        Ok(())
    }

    /// Resolves the gist and returns the selected file's name and content.
    pub fn download(&self, url: &str) -> Result<(String, String), InstallError> {
        let id = gist_id(url).ok_or_else(|| InstallError::InvalidGistUrl(url.to_string()))?;

        let api = gist_url(&self.api_url, &id);
        info!("[INSTALL] Fetching gist metadata: {}", api);

        let info: GistInfo = fetch_json(self.remote.as_ref(), &api).map_err(|e| {
            warn!("[INSTALL] Gist {} download failed: {}", id, e);
            InstallError::GistDownload
        })?;

        let file = select_source_file(info, &self.language)?;
        debug!(
            "[INSTALL] Selected '{}' from gist {} (truncated={})",
            file.filename, id, file.truncated
        );

        let content = match (file.truncated, file.raw_url.as_deref(), file.content) {
            (true, Some(raw_url), _) => self.remote.fetch_text(raw_url).map_err(|e| {
                warn!("[INSTALL] Raw content of '{}' failed: {}", file.filename, e);
                InstallError::GistDownload
            })?,
            (false, _, Some(content)) => content,
            (truncated, _, _) => {
                warn!(
                    "[INSTALL] Gist {} has no usable content for '{}' (truncated={})",
                    id, file.filename, truncated
                );
                return Err(InstallError::GistDownload);
            }
        };

        Ok((file.filename, content))
    }
}

/// Selects the only file written in `language`.
fn select_source_file(info: GistInfo, language: &str) -> Result<GistFile, InstallError> {
    let mut matching: Vec<GistFile> = info
        .files
        .into_values()
        .filter(|f| f.language.as_deref() == Some(language))
        .collect();

    match matching.len() {
        0 => Err(InstallError::NoFilesInGist),
        1 => Ok(matching.remove(0)),
        n => Err(InstallError::MultipleFilesInGist(n)),
    }
}

/// Rejects file names that would nest or escape the target directory.
fn ensure_plain_file_name(filename: &str) -> Result<(), InstallError> {
    let mut components = Path::new(filename).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(InstallError::UnsafePath(filename.to_string())),
    }
}
