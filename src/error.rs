use thiserror::Error;

/// Unified error type for release-tagger operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Branch error: {0}")]
    Branch(String),

    #[error("Version error: {0}")]
    Version(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Stamp error: {0}")]
    Stamp(String),

    #[error("Changelog error: {0}")]
    Changelog(String),

    #[error("Revision error: {0}")]
    Revision(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("Hook failed: {0}")]
    Hook(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in release-tagger
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a branch error with context
    pub fn branch(msg: impl Into<String>) -> Self {
        ReleaseError::Branch(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        ReleaseError::Version(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        ReleaseError::Tag(msg.into())
    }

    pub fn stamp(msg: impl Into<String>) -> Self {
        ReleaseError::Stamp(msg.into())
    }

    pub fn changelog(msg: impl Into<String>) -> Self {
        ReleaseError::Changelog(msg.into())
    }

    pub fn revision(msg: impl Into<String>) -> Self {
        ReleaseError::Revision(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        ReleaseError::Remote(msg.into())
    }

    pub fn hook(msg: impl Into<String>) -> Self {
        ReleaseError::Hook(msg.into())
    }
}
