//! Install/uninstall orchestration.
//!
//! `ToolManager` is the only surface the presentation layer talks to. It
//! owns the catalog components and both installers, and reduces every
//! installer error to an [`InstallOutcome`] after logging it.

use super::archive::RepoArchiveInstaller;
use super::gist::GistInstaller;
use super::opener::{SystemOpener, UrlOpener};
use super::source::SourceKind;
use super::types::{InstallError, InstallOutcome, UninstallOutcome};
use crate::catalog::{
    CatalogError, Category, CategoryIndex, GitHubClient, RemoteApi, ToolMap, ToolRegistry,
};
use crate::config::Config;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Facade over catalog lookups and tool installation.
pub struct ToolManager {
    /// Root holding `<category>/<tool>/` directories.
    installation_root: PathBuf,
    /// Category index of the catalog repository.
    index: CategoryIndex,
    /// Cached listing lookups.
    registry: ToolRegistry,
    /// Installer for repository snapshots.
    archive_installer: RepoArchiveInstaller,
    /// Installer for gists.
    gist_installer: GistInstaller,
    /// Fallback for sources that cannot be installed.
    opener: Box<dyn UrlOpener>,
}

impl ToolManager {
    /// Creates a manager talking to GitHub.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let remote = Arc::new(GitHubClient::new(&config.api_url, config.request_timeout()));
        Self::with_remote(config, remote, Box::new(SystemOpener))
    }

    /// Creates a manager with explicit gateway and opener.
    #[must_use]
    pub fn with_remote(
        config: &Config,
        remote: Arc<dyn RemoteApi>,
        opener: Box<dyn UrlOpener>,
    ) -> Self {
        Self {
            installation_root: config.installation_root.clone(),
            index: CategoryIndex::new(
                Arc::clone(&remote),
                &config.api_url,
                &config.listing_owner,
                &config.listing_repo,
            ),
            registry: ToolRegistry::new(Arc::clone(&remote)),
            archive_installer: RepoArchiveInstaller::new(
                Arc::clone(&remote),
                config.temp_dir.clone(),
            ),
            gist_installer: GistInstaller::new(remote, &config.api_url, &config.source_language),
            opener,
        }
    }

    /// Lists the categories of the catalog.
    pub fn list_categories(&self) -> Result<BTreeMap<String, Category>, CatalogError> {
        self.index.list_categories()
    }

    /// Lists the tools of the category whose listing lives at `category_url`.
    pub fn list_tools(&self, category_url: &str) -> Result<Arc<ToolMap>, CatalogError> {
        self.registry.list_tools(category_url)
    }

    /// Classifies a tool's source URL.
    #[must_use]
    pub fn classify_source(&self, url: &str) -> SourceKind {
        SourceKind::classify(url)
    }

    /// Returns `<root>/<category>/<tool>`, if both names are plain path components.
    #[must_use]
    pub fn target_dir(&self, category: &str, tool: &str) -> Option<PathBuf> {
        if is_plain_component(category) && is_plain_component(tool) {
            Some(self.installation_root.join(category).join(tool))
        } else {
            None
        }
    }

    /// Returns true if the tool's directory exists.
    ///
    /// A partially written install also counts as installed.
    #[must_use]
    pub fn is_installed(&self, category: &str, tool: &str) -> bool {
        self.target_dir(category, tool)
            .is_some_and(|dir| dir.exists())
    }

    /// Installs a tool from its source URL.
    ///
    /// Errors are logged and reported as [`InstallOutcome::Failed`].
    pub fn install(&self, category: &str, tool: &str, url: &str) -> InstallOutcome {
        info!("[INSTALL] Install requested: {}/{} from {}", category, tool, url);

        let source = self.classify_source(url);
        if !source.is_installable() {
            if let Err(e) = self.opener.open(url) {
                warn!("[INSTALL] Failed to open {} externally: {}", url, e);
            }
            return InstallOutcome::OpenedExternally;
        }

        let Some(target) = self.target_dir(category, tool) else {
            error!("[INSTALL] Refusing unsafe target {:?}/{:?}", category, tool);
            return InstallOutcome::Failed;
        };

        let created = !target.exists();
        match self.install_source(&source, url, &target) {
            Ok(()) => {
                info!("[INSTALL] {}/{} installed into {:?}", category, tool, target);
                InstallOutcome::Installed
            }
            Err(e) => {
                error!("[INSTALL] {}/{} failed: {:?} ({})", category, tool, e, e);
                if created {
                    remove_if_empty(&target);
                }
                InstallOutcome::Failed
            }
        }
    }

    /// Creates the target directory and dispatches to the matching installer.
    fn install_source(
        &self,
        source: &SourceKind,
        url: &str,
        target: &Path,
    ) -> Result<(), InstallError> {
        fs::create_dir_all(target)?;

        match source {
            SourceKind::RepositoryArchive {
                origin,
                owner,
                repo,
            } => self.archive_installer.install(origin, owner, repo, target),
            SourceKind::Gist { .. } => self.gist_installer.install(url, target),
            SourceKind::Unknown => Err(InstallError::InvalidGistUrl(url.to_string())),
        }
    }

    /// Removes a tool's directory.
    ///
    /// Always reports success; a missing directory is already uninstalled.
    pub fn uninstall(&self, category: &str, tool: &str, url: &str) -> UninstallOutcome {
        info!("[INSTALL] Uninstall requested: {}/{} ({})", category, tool, url);

        let Some(target) = self.target_dir(category, tool) else {
            warn!("[INSTALL] Ignoring unsafe target {:?}/{:?}", category, tool);
            return UninstallOutcome::Uninstalled;
        };

        if target.exists() {
            match fs::remove_dir_all(&target) {
                Ok(()) => info!("[INSTALL] Removed {:?}", target),
                Err(e) => warn!("[INSTALL] Failed to remove {:?}: {}", target, e),
            }
        } else {
            debug!("[INSTALL] {:?} already absent", target);
        }

        UninstallOutcome::Uninstalled
    }
}

/// Returns true if `name` is exactly one normal path component.
fn is_plain_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

/// Removes a directory left empty by a failed install.
fn remove_if_empty(dir: &Path) {
    let empty = fs::read_dir(dir).is_ok_and(|mut entries| entries.next().is_none());
    if empty {
        if let Err(e) = fs::remove_dir(dir) {
            warn!("[INSTALL] Failed to remove empty {:?}: {}", dir, e);
        }
    }
}
