//! Persisted monotonic revision counter
//!
//! Formal releases stamp a companion artifact with a revision number that
//! must only ever grow. The last issued value is kept in a small TOML file:
//!
//! ```toml
//! last = 42
//! ```
//!
//! The file is created once with `revision init <N>`; for repositories that
//! previously derived the number from history, initialize it with the last
//! number that was shipped.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{ReleaseError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct RevisionState {
    last: u64,
}

/// File-backed revision counter
#[derive(Debug, Clone)]
pub struct RevisionStore {
    path: PathBuf,
}

impl RevisionStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        RevisionStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Create the counter with `value` as the last issued revision
    pub fn init(&self, value: u64) -> Result<()> {
        if self.exists() {
            return Err(ReleaseError::revision(format!(
                "Revision file {} already exists",
                self.path.display()
            )));
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        self.write(RevisionState { last: value })?;
        info!(path = %self.path.display(), value, "initialized revision counter");
        Ok(())
    }

    /// Last issued revision
    pub fn current(&self) -> Result<u64> {
        Ok(self.read()?.last)
    }

    /// Revision the next call to [`RevisionStore::next`] would issue
    pub fn peek_next(&self) -> Result<u64> {
        let current = self.current()?;
        current
            .checked_add(1)
            .ok_or_else(|| ReleaseError::revision("Revision counter overflow"))
    }

    /// Issue and persist the next revision
    pub fn next(&self) -> Result<u64> {
        let next = self.peek_next()?;
        self.write(RevisionState { last: next })?;
        info!(path = %self.path.display(), revision = next, "issued revision");
        Ok(next)
    }

    fn read(&self) -> Result<RevisionState> {
        if !self.exists() {
            return Err(ReleaseError::revision(format!(
                "Revision file {} not found; run `release-tagger revision init <N>` first",
                self.path.display()
            )));
        }

        let content = fs::read_to_string(&self.path)?;
        toml::from_str(&content).map_err(|e| {
            ReleaseError::revision(format!("Cannot parse {}: {}", self.path.display(), e))
        })
    }

    fn write(&self, state: RevisionState) -> Result<()> {
        let content = toml::to_string(&state)
            .map_err(|e| ReleaseError::revision(format!("Cannot serialize revision: {}", e)))?;

        // Write beside the target, then rename over it
        let tmp = self.path.with_extension("toml.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_then_next() {
        let dir = tempfile::tempdir().unwrap();
        let store = RevisionStore::open(dir.path().join("revision.toml"));

        store.init(41).unwrap();
        assert_eq!(store.current().unwrap(), 41);
        assert_eq!(store.peek_next().unwrap(), 42);
        assert_eq!(store.next().unwrap(), 42);
        assert_eq!(store.next().unwrap(), 43);
        assert_eq!(store.current().unwrap(), 43);
    }

    #[test]
    fn test_init_twice_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = RevisionStore::open(dir.path().join("revision.toml"));

        store.init(0).unwrap();
        let err = store.init(5).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(store.current().unwrap(), 0);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = RevisionStore::open(dir.path().join("missing.toml"));

        let err = store.next().unwrap_err();
        assert!(err.to_string().contains("revision init"));
    }

    #[test]
    fn test_init_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = RevisionStore::open(dir.path().join(".release").join("revision.toml"));

        store.init(7).unwrap();
        assert!(store.exists());
    }

    #[test]
    fn test_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("revision.toml");
        fs::write(&path, "last = \"seven\"").unwrap();

        let err = RevisionStore::open(&path).current().unwrap_err();
        assert!(err.to_string().contains("Cannot parse"));
    }

    #[test]
    fn test_overflow() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("revision.toml");
        fs::write(&path, format!("last = {}", u64::MAX)).unwrap();

        assert!(RevisionStore::open(&path).next().is_err());
    }
}
