use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use git2::Oid;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A commit recorded by [MockRepository::commit_paths]
#[derive(Debug, Clone, PartialEq)]
pub struct MockCommit {
    pub oid: Oid,
    pub message: String,
    pub paths: Vec<PathBuf>,
}

#[derive(Debug, Default)]
struct MockState {
    head: Option<Oid>,
    head_message: String,
    tags: HashMap<String, Oid>,
    commits: Vec<MockCommit>,
    pushes: Vec<(String, Vec<String>)>,
    next_id: u8,
}

/// In-memory repository for testing without actual git operations
pub struct MockRepository {
    workdir: PathBuf,
    branch: Option<String>,
    remotes: Vec<String>,
    state: RefCell<MockState>,
}

/// Deterministic commit id for mock commit number `n`
pub fn mock_oid(n: u8) -> Oid {
    // Oid::from_bytes only fails on a wrong length
    Oid::from_bytes(&[n; 20]).unwrap_or_else(|_| Oid::zero())
}

impl MockRepository {
    /// Create a mock checked out on `branch` with a single HEAD commit
    pub fn new(workdir: impl Into<PathBuf>, branch: impl Into<String>, head_message: &str) -> Self {
        let state = MockState {
            head: Some(mock_oid(1)),
            head_message: head_message.to_string(),
            next_id: 2,
            ..MockState::default()
        };

        MockRepository {
            workdir: workdir.into(),
            branch: Some(branch.into()),
            remotes: vec!["origin".to_string()],
            state: RefCell::new(state),
        }
    }

    /// Detach HEAD from any branch
    pub fn detach(mut self) -> Self {
        self.branch = None;
        self
    }

    /// Remove all remotes so pushes fail
    pub fn without_remotes(mut self) -> Self {
        self.remotes.clear();
        self
    }

    /// Add a tag pointing to an OID
    pub fn add_tag(&self, name: impl Into<String>, oid: Oid) {
        self.state.borrow_mut().tags.insert(name.into(), oid);
    }

    pub fn commits(&self) -> Vec<MockCommit> {
        self.state.borrow().commits.clone()
    }

    pub fn pushes(&self) -> Vec<(String, Vec<String>)> {
        self.state.borrow().pushes.clone()
    }

    pub fn tag_target(&self, name: &str) -> Option<Oid> {
        self.state.borrow().tags.get(name).copied()
    }
}

impl Repository for MockRepository {
    fn workdir(&self) -> Result<PathBuf> {
        Ok(self.workdir.clone())
    }

    fn current_branch(&self) -> Result<String> {
        self.branch
            .clone()
            .ok_or_else(|| ReleaseError::branch("HEAD is detached; pass --branch explicitly"))
    }

    fn head_oid(&self) -> Result<Oid> {
        self.state
            .borrow()
            .head
            .ok_or_else(|| ReleaseError::tag("Repository has no commits"))
    }

    fn head_message(&self) -> Result<String> {
        Ok(self.state.borrow().head_message.clone())
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        Ok(self.state.borrow().tags.keys().cloned().collect())
    }

    fn find_tag_oid(&self, tag_name: &str) -> Result<Option<Oid>> {
        Ok(self.tag_target(tag_name))
    }

    fn force_tag(&self, name: &str, oid: Oid) -> Result<()> {
        self.add_tag(name, oid);
        Ok(())
    }

    fn commit_paths(&self, paths: &[&Path], message: &str) -> Result<Oid> {
        let mut state = self.state.borrow_mut();
        let oid = mock_oid(state.next_id);
        state.next_id = state.next_id.wrapping_add(1);
        state.head = Some(oid);
        state.head_message = message.to_string();
        state.commits.push(MockCommit {
            oid,
            message: message.to_string(),
            paths: paths.iter().map(|p| p.to_path_buf()).collect(),
        });
        Ok(oid)
    }

    fn push(&self, remote: &str, refspecs: &[String]) -> Result<()> {
        if !self.remotes.iter().any(|r| r == remote) {
            return Err(ReleaseError::remote(format!(
                "Cannot find remote '{}'",
                remote
            )));
        }

        self.state
            .borrow_mut()
            .pushes
            .push((remote.to_string(), refspecs.to_vec()));
        Ok(())
    }
}
