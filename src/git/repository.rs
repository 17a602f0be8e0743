use crate::error::{ReleaseError, Result};
use git2::{Oid, Repository as Git2Repo};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn signature(&self) -> Result<git2::Signature<'static>> {
        match self.repo.signature() {
            Ok(sig) => Ok(sig.to_owned()),
            Err(e) => {
                debug!(error = %e, "no configured identity, using default signature");
                Ok(git2::Signature::now(
                    "release-tagger",
                    "release-tagger@localhost",
                )?)
            }
        }
    }
}

fn remote_callbacks<'a>(config: Option<git2::Config>) -> git2::RemoteCallbacks<'a> {
    let mut callbacks = git2::RemoteCallbacks::new();

    callbacks.credentials(move |url, username_from_url, allowed_types| {
        if allowed_types.contains(git2::CredentialType::SSH_KEY) {
            let user = username_from_url.unwrap_or("git");

            if let Ok(cred) = git2::Cred::ssh_key_from_agent(user) {
                return Ok(cred);
            }

            if let Some(home) = dirs::home_dir() {
                for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let path = home.join(".ssh").join(key);
                    if path.exists() {
                        if let Ok(cred) = git2::Cred::ssh_key(user, None, &path, None) {
                            return Ok(cred);
                        }
                    }
                }
            }
        }

        if allowed_types.contains(git2::CredentialType::USER_PASS_PLAINTEXT) {
            if let Some(config) = config.as_ref() {
                if let Ok(cred) = git2::Cred::credential_helper(config, url, username_from_url) {
                    return Ok(cred);
                }
            }
        }

        git2::Cred::default()
    });

    callbacks.push_update_reference(|refname, status| match status {
        Some(status) => {
            warn!(refname, status, "remote rejected reference");
            Err(git2::Error::from_str(&format!(
                "Push rejected for {}: {}",
                refname, status
            )))
        }
        None => Ok(()),
    });

    callbacks
}

impl super::Repository for Git2Repository {
    fn workdir(&self) -> Result<PathBuf> {
        self.repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| ReleaseError::config("Repository has no working tree (bare)"))
    }

    fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;

        if !head.is_branch() {
            return Err(ReleaseError::branch(
                "HEAD is detached; pass --branch explicitly",
            ));
        }

        head.shorthand()
            .map(str::to_string)
            .ok_or_else(|| ReleaseError::branch("Branch name is not valid UTF-8"))
    }

    fn head_oid(&self) -> Result<Oid> {
        let commit = self.repo.head()?.peel_to_commit()?;
        Ok(commit.id())
    }

    fn head_message(&self) -> Result<String> {
        let commit = self.repo.head()?.peel_to_commit()?;
        Ok(commit.message().unwrap_or("").to_string())
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(None)?;

        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn find_tag_oid(&self, tag_name: &str) -> Result<Option<Oid>> {
        let reference_name = format!("refs/tags/{}", tag_name);

        match self.repo.find_reference(&reference_name) {
            Ok(reference) => {
                let oid = reference
                    .peel(git2::ObjectType::Commit)
                    .map_err(|e| ReleaseError::tag(format!("Cannot peel tag: {}", e)))?
                    .id();

                Ok(Some(oid))
            }
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(ReleaseError::tag(format!(
                "Cannot find tag '{}': {}",
                tag_name, e
            ))),
        }
    }

    fn force_tag(&self, name: &str, oid: Oid) -> Result<()> {
        let object = self
            .repo
            .find_object(oid, None)
            .map_err(|e| ReleaseError::tag(format!("Cannot find object: {}", e)))?;

        self.repo
            .tag_lightweight(name, &object, true)
            .map_err(|e| ReleaseError::tag(format!("Cannot create tag '{}': {}", name, e)))?;

        debug!(tag = name, %oid, "tag set");
        Ok(())
    }

    fn commit_paths(&self, paths: &[&Path], message: &str) -> Result<Oid> {
        let mut index = self.repo.index()?;
        for path in paths {
            index.add_path(path)?;
        }
        index.write()?;

        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let parent = self.repo.head()?.peel_to_commit()?;
        let sig = self.signature()?;

        let oid = self
            .repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &[&parent])?;

        debug!(%oid, files = paths.len(), "committed stamped files");
        Ok(oid)
    }

    fn push(&self, remote: &str, refspecs: &[String]) -> Result<()> {
        let mut remote_handle = self
            .repo
            .find_remote(remote)
            .map_err(|e| ReleaseError::remote(format!("Cannot find remote '{}': {}", remote, e)))?;

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(remote_callbacks(self.repo.config().ok()));

        let refspec_strs: Vec<&str> = refspecs.iter().map(|s| s.as_str()).collect();

        remote_handle
            .push(&refspec_strs, Some(&mut push_options))
            .map_err(|e| match e.class() {
                git2::ErrorClass::Net => {
                    ReleaseError::remote(format!("Network error during push: {}", e))
                }
                _ => ReleaseError::remote(format!("Push to '{}' failed: {}", remote, e)),
            })?;

        Ok(())
    }
}
