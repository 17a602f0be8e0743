//! Git operations abstraction layer
//!
//! The release workflow talks to version control only through the
//! [Repository] trait, so the tag namespace it mutates is an explicit value
//! passed in by the caller:
//!
//! - [repository::Git2Repository]: a real repository using the `git2` crate
//! - [mock::MockRepository]: an in-memory repository for tests
//!
//! ```rust
//! # use release_tagger::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> Result<(), Box<dyn std::error::Error>> {
//! let head = repo.head_oid()?;
//! repo.force_tag("1.3.0rc1", head)?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use git2::Oid;
use std::path::{Path, PathBuf};

/// Refspec that force-pushes a tag
pub fn tag_refspec(tag: &str) -> String {
    format!("+refs/tags/{}:refs/tags/{}", tag, tag)
}

/// Refspec that pushes a local branch to the same name on the remote
pub fn branch_refspec(branch: &str) -> String {
    format!("refs/heads/{}:refs/heads/{}", branch, branch)
}

/// Version-control operations needed by a release run
///
/// Underlying errors are mapped to [crate::error::ReleaseError] variants.
pub trait Repository {
    /// Root of the working tree; stamp paths are relative to it
    fn workdir(&self) -> Result<PathBuf>;

    /// Short name of the checked-out branch (e.g. "release/1.3.0")
    ///
    /// Fails on a detached HEAD.
    fn current_branch(&self) -> Result<String>;

    /// Commit id at HEAD
    fn head_oid(&self) -> Result<Oid>;

    /// Full message of the HEAD commit
    fn head_message(&self) -> Result<String>;

    /// Names of all tags, in no guaranteed order
    fn list_tags(&self) -> Result<Vec<String>>;

    /// Commit a tag points at, if the tag exists
    fn find_tag_oid(&self, tag_name: &str) -> Result<Option<Oid>>;

    /// Create or move a lightweight tag to `oid`
    ///
    /// An existing tag of the same name is overwritten.
    fn force_tag(&self, name: &str, oid: Oid) -> Result<()>;

    /// Stage `paths` (relative to [Repository::workdir]) and commit on HEAD
    ///
    /// Returns the new commit id.
    fn commit_paths(&self, paths: &[&Path], message: &str) -> Result<Oid>;

    /// Push refspecs to `remote`
    fn push(&self, remote: &str, refspecs: &[String]) -> Result<()>;
}
