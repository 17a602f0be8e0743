use std::fmt;

/// Conditions worth telling the user about that do not stop a release.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// The tag already exists and will be force-moved to the current commit
    TagWillMove { tag: String },
    /// The release version is not a semantic version; ordering checks are skipped
    NonSemverVersion { version: String },
    /// The release version is not newer than an existing formal release tag
    VersionNotNewer { version: String, latest: String },
    /// No changelog section is headed by the version
    MissingChangelogSection { version: String, path: String },
    /// Hook failed after the push already happened
    PostPushHookFailed { reason: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::TagWillMove { tag } => {
                write!(f, "Tag '{}' already exists and will be moved", tag)
            }
            BoundaryWarning::NonSemverVersion { version } => {
                write!(
                    f,
                    "Version '{}' is not semver; skipping ordering check",
                    version
                )
            }
            BoundaryWarning::VersionNotNewer { version, latest } => {
                write!(
                    f,
                    "Version '{}' is not newer than existing release '{}'",
                    version, latest
                )
            }
            BoundaryWarning::MissingChangelogSection { version, path } => {
                write!(f, "No changelog section '{}' in {}", version, path)
            }
            BoundaryWarning::PostPushHookFailed { reason } => {
                write!(f, "post-push hook failed: {}", reason)
            }
        }
    }
}
