//! Source URL classification.
//!
//! Decides which installer handles a tool's source URL.

use once_cell::sync::Lazy;
use regex::Regex;

/// `http(s)://gist.github.com/<user>/<hex id>`
#[allow(clippy::expect_used)]
static GIST_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(https?://gist\.github\.com)/[0-9A-Za-z_-]*/([0-9a-f]+)")
        .expect("invalid gist regex")
});

/// `http(s)://github.com/<owner>/<repo>`, trailing components ignored.
#[allow(clippy::expect_used)]
static REPOSITORY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(https?://github\.com)/([^/?#]+)/([^/?#]+)").expect("invalid repository regex")
});

/// Installer selected for a source URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// Zip snapshot of a GitHub repository.
    RepositoryArchive {
        /// Scheme and host of the original URL, e.g. `https://github.com`.
        origin: String,
        /// Repository owner.
        owner: String,
        /// Repository name.
        repo: String,
    },
    /// Single source file of a gist.
    Gist {
        /// Hex gist identifier.
        id: String,
    },
    /// Anything else; handed to the browser.
    Unknown,
}

impl SourceKind {
    /// Classifies a source URL.
    #[must_use]
    pub fn classify(url: &str) -> Self {
        if let Some(id) = gist_id(url) {
            return Self::Gist { id };
        }

        if let Some(caps) = REPOSITORY_PATTERN.captures(url) {
            let repo = caps[3].strip_suffix(".git").unwrap_or(&caps[3]);
            if !repo.is_empty() {
                return Self::RepositoryArchive {
                    origin: caps[1].to_string(),
                    owner: caps[2].to_string(),
                    repo: repo.to_string(),
                };
            }
        }

        Self::Unknown
    }

    /// Returns true if one of the installers can handle this source.
    #[must_use]
    pub fn is_installable(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Short label for logs and listings.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::RepositoryArchive { .. } => "repo",
            Self::Gist { .. } => "gist",
            Self::Unknown => "link",
        }
    }
}

/// Extracts the hex gist id from a gist URL.
#[must_use]
pub fn gist_id(url: &str) -> Option<String> {
    GIST_PATTERN.captures(url).map(|caps| caps[2].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_repository() {
        assert_eq!(
            SourceKind::classify("https://github.com/alice/tool"),
            SourceKind::RepositoryArchive {
                origin: "https://github.com".to_string(),
                owner: "alice".to_string(),
                repo: "tool".to_string(),
            }
        );
    }

    #[test]
    fn test_classify_repository_ignores_trailing_components() {
        let kind = SourceKind::classify("http://github.com/alice/tool/tree/master/src");
        assert_eq!(
            kind,
            SourceKind::RepositoryArchive {
                origin: "http://github.com".to_string(),
                owner: "alice".to_string(),
                repo: "tool".to_string(),
            }
        );

        let kind = SourceKind::classify("https://github.com/alice/tool.git");
        assert!(matches!(kind, SourceKind::RepositoryArchive { ref repo, .. } if repo == "tool"));
    }

    #[test]
    fn test_classify_gist() {
        assert_eq!(
            SourceKind::classify("https://gist.github.com/bob/abcdef1234567890"),
            SourceKind::Gist {
                id: "abcdef1234567890".to_string()
            }
        );
        assert_eq!(
            SourceKind::classify("http://gist.github.com/abcdef1234567890"),
            SourceKind::Unknown
        );
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(
            SourceKind::classify("https://itunes.apple.com/us/app/pythonista/id528579881"),
            SourceKind::Unknown
        );
        assert_eq!(SourceKind::classify("https://github.com/alice"), SourceKind::Unknown);
        assert_eq!(SourceKind::classify("not a url"), SourceKind::Unknown);
        assert!(!SourceKind::Unknown.is_installable());
    }

    #[test]
    fn test_gist_id() {
        assert_eq!(
            gist_id("https://gist.github.com/some-user/0a1b2c"),
            Some("0a1b2c".to_string())
        );
        assert_eq!(gist_id("https://github.com/alice/tool"), None);
        assert_eq!(gist_id("https://gist.github.com/bob/"), None);
    }
}
