//! Version resolution for release branches
//!
//! Computes the build version from a release branch and the tags already
//! present. Resolution is pure: the tag namespace is read by the caller and
//! handed in as a [`TagSet`], and nothing here writes tags.

use tracing::debug;

use crate::domain::{BuildVersion, ReleaseBranch, ReleaseKind, TagSet};
use crate::error::{ReleaseError, Result};

/// Derives build versions for `release/<version>` branches
#[derive(Debug, Clone)]
pub struct VersionResolver {
    branch_prefix: String,
}

impl Default for VersionResolver {
    fn default() -> Self {
        VersionResolver::new(crate::domain::branch::DEFAULT_BRANCH_PREFIX)
    }
}

impl VersionResolver {
    /// Create a resolver for branches starting with `branch_prefix`
    pub fn new(branch_prefix: impl Into<String>) -> Self {
        VersionResolver {
            branch_prefix: branch_prefix.into(),
        }
    }

    pub fn parse_branch(&self, branch: &str) -> Result<ReleaseBranch> {
        ReleaseBranch::parse_with_prefix(branch, &self.branch_prefix)
    }

    /// Next release candidate for `branch`
    ///
    /// The candidate number is one past the numeric maximum of every
    /// `<version>rc<N>` tag in `tags`, or 1 when there is none. A candidate
    /// tag whose number is out of range is an error.
    ///
    /// # Example
    /// ```
    /// # use release_tagger::resolver::VersionResolver;
    /// # use release_tagger::domain::TagSet;
    /// let tags: TagSet = ["1.3.0rc1", "1.3.0rc2", "0.9.0"].into_iter().collect();
    /// let version = VersionResolver::default()
    ///     .resolve_candidate("release/1.3.0", &tags)
    ///     .unwrap();
    /// assert_eq!(version.to_string(), "1.3.0rc3");
    /// ```
    pub fn resolve_candidate(&self, branch: &str, tags: &TagSet) -> Result<BuildVersion> {
        let release = self.parse_branch(branch)?;

        let number = match tags.highest_candidate(&release.version)? {
            Some(highest) => highest.checked_add(1).ok_or_else(|| {
                ReleaseError::version(format!(
                    "Candidate number for {} overflows after rc{}",
                    release.version, highest
                ))
            })?,
            None => 1,
        };

        debug!(version = %release.version, number, "resolved release candidate");
        Ok(BuildVersion::candidate(release.version, number))
    }

    /// Formal release version for `branch`: the branch version unchanged
    pub fn resolve_formal(&self, branch: &str) -> Result<BuildVersion> {
        let release = self.parse_branch(branch)?;
        debug!(version = %release.version, "resolved formal release");
        Ok(BuildVersion::formal(release.version))
    }

    /// Resolve for the given release kind
    pub fn resolve(&self, branch: &str, tags: &TagSet, kind: ReleaseKind) -> Result<BuildVersion> {
        match kind {
            ReleaseKind::Candidate => self.resolve_candidate(branch, tags),
            ReleaseKind::Formal => self.resolve_formal(branch),
        }
    }
}
