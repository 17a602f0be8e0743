use crate::error::{ReleaseError, Result};

/// Default prefix identifying release branches
pub const DEFAULT_BRANCH_PREFIX: &str = "release/";

/// A release branch of the form `<prefix><version>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseBranch {
    pub name: String,
    pub version: String,
}

impl ReleaseBranch {
    /// Parse a branch name using the default `release/` prefix
    pub fn parse(name: &str) -> Result<Self> {
        Self::parse_with_prefix(name, DEFAULT_BRANCH_PREFIX)
    }

    /// Parse a branch name, stripping `prefix` to obtain the release version
    ///
    /// Accepts fully qualified refs (`refs/heads/release/1.2.0`) as well.
    pub fn parse_with_prefix(name: &str, prefix: &str) -> Result<Self> {
        let short = name.strip_prefix("refs/heads/").unwrap_or(name);

        let version = short.strip_prefix(prefix).ok_or_else(|| {
            ReleaseError::branch(format!(
                "'{}' is not a release branch (expected '{}<version>')",
                name, prefix
            ))
        })?;

        if version.is_empty() {
            return Err(ReleaseError::branch(format!(
                "Release branch '{}' has an empty version",
                name
            )));
        }

        if version.chars().any(char::is_whitespace) {
            return Err(ReleaseError::branch(format!(
                "Release version '{}' contains whitespace",
                version
            )));
        }

        Ok(ReleaseBranch {
            name: short.to_string(),
            version: version.to_string(),
        })
    }
}
