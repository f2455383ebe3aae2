//! Repository archive installer.
//!
//! Downloads the `master` zip snapshot of a GitHub repository and unpacks
//! it into a target directory without the archive's wrapper folder.

use super::types::InstallError;
use crate::catalog::RemoteApi;
use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Branch whose snapshot is installed.
pub const ARCHIVE_BRANCH: &str = "master";

/// Installs tools distributed as plain GitHub repositories.
pub struct RepoArchiveInstaller {
    /// Gateway used for the snapshot download.
    remote: Arc<dyn RemoteApi>,
    /// Directory holding downloaded snapshots.
    temp_dir: PathBuf,
}

impl RepoArchiveInstaller {
    /// Creates a new archive installer.
    #[must_use]
    pub fn new(remote: Arc<dyn RemoteApi>, temp_dir: PathBuf) -> Self {
        Self { remote, temp_dir }
    }

    /// Builds the snapshot URL, e.g. `https://github.com/o/r/archive/master.zip`.
    #[must_use]
    pub fn archive_url(origin: &str, owner: &str, repo: &str) -> String {
        format!(
            "{}/{}/{}/archive/{}.zip",
            origin.trim_end_matches('/'),
            owner,
            repo,
            ARCHIVE_BRANCH
        )
    }

    /// Returns where the snapshot of `repo` is stored.
    #[must_use]
    pub fn archive_path(&self, repo: &str) -> PathBuf {
        self.temp_dir.join(format!("{}-{}.zip", repo, ARCHIVE_BRANCH))
    }

    /// Downloads and unpacks `owner/repo` into `target_dir`.
    ///
    /// The downloaded archive is left in the temp directory.
    pub fn install(
        &self,
        origin: &str,
        owner: &str,
        repo: &str,
        target_dir: &Path,
    ) -> Result<(), InstallError> {
        assert!(!owner.is_empty(), "Owner must not be empty");
        assert!(!repo.is_empty(), "Repository must not be empty");

        info!("[INSTALL] Installing {}/{} into {:?}", owner, repo, target_dir);

        let archive = self.download(origin, owner, repo)?;
        extract_archive(&archive, &wrapper_prefix(repo), target_dir)?;

        info!("[INSTALL] Extracted {}/{} into {:?}", owner, repo, target_dir);
        Ok(())
    }

    /// Downloads the snapshot to the temp directory.
    fn download(&self, origin: &str, owner: &str, repo: &str) -> Result<PathBuf, InstallError> {
        let url = Self::archive_url(origin, owner, repo);
        let dest = self.archive_path(repo);

        info!("[INSTALL] Downloading {}", url);
        let bytes = self.remote.fetch_bytes(&url).map_err(|e| {
            warn!("[INSTALL] Archive download failed: {}", e);
            InstallError::ArchiveDownload(e.to_string())
        })?;

        fs::create_dir_all(&self.temp_dir)
            .and_then(|()| fs::write(&dest, &bytes))
            .map_err(|e| {
                warn!("[INSTALL] Failed to store archive at {:?}: {}", dest, e);
                InstallError::ArchiveDownload(format!("{}: {}", dest.display(), e))
            })?;

        debug!("[INSTALL] Stored {} bytes at {:?}", bytes.len(), dest);
        Ok(dest)
    }
}

/// Name of the single folder GitHub wraps snapshot contents in.
#[must_use]
pub fn wrapper_prefix(repo: &str) -> String {
    format!("{}-{}/", repo, ARCHIVE_BRANCH)
}

/// Maps an archive entry name to its path relative to the target directory.
///
/// Returns `Ok(None)` for the wrapper folder itself.
fn relative_entry_path(name: &str, prefix: &str) -> Result<Option<PathBuf>, InstallError> {
    let stripped = name.strip_prefix(prefix).unwrap_or(name);
    if stripped.is_empty() {
        return Ok(None);
    }

    let path = Path::new(stripped);
    if !path.components().all(|c| matches!(c, Component::Normal(_))) {
        return Err(InstallError::Extraction(format!(
            "entry escapes target directory: {}",
            name
        )));
    }

    Ok(Some(path.to_path_buf()))
}

/// Unpacks every entry of a zip archive below `dest`, stripping `prefix`.
///
/// Aborts on the first failing entry; files written so far stay in place.
pub fn extract_archive(archive: &Path, prefix: &str, dest: &Path) -> Result<(), InstallError> {
    let file = File::open(archive)
        .map_err(|e| InstallError::Extraction(format!("{}: {}", archive.display(), e)))?;
    let mut zip = zip::ZipArchive::new(file)
        .map_err(|e| InstallError::Extraction(format!("Failed to open archive: {}", e)))?;

    fs::create_dir_all(dest)?;

    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).map_err(|e| {
            InstallError::Extraction(format!("Failed to read archive entry: {}", e))
        })?;

        let name = entry.name().to_string();
        let Some(relative) = relative_entry_path(&name, prefix)? else {
            continue;
        };
        let outpath = dest.join(relative);

        let written = if name.ends_with('/') {
            fs::create_dir_all(&outpath)
        } else {
            write_entry(&mut entry, &outpath)
        };

        written.map_err(|e| {
            warn!("[INSTALL] Failed to extract '{}': {}", name, e);
            InstallError::Extraction(format!("{}: {}", name, e))
        })?;
    }

    debug!("[INSTALL] Extracted {} entries into {:?}", zip.len(), dest);
    Ok(())
}

/// Writes one file entry, creating parent directories as needed.
fn write_entry(entry: &mut impl io::Read, outpath: &Path) -> io::Result<()> {
    if let Some(parent) = outpath.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut outfile = File::create(outpath)?;
    io::copy(entry, &mut outfile)?;
    Ok(())
}
