//! Release workflow orchestration
//!
//! Runs one pipeline pass over a [Repository]: resolve the build version,
//! stamp files, commit, tag, push, and hand off to the hook commands. The
//! workflow is independent of clap so it can be driven programmatically and
//! tested against [crate::git::MockRepository].

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::boundary::BoundaryWarning;
use crate::changelog;
use crate::config::{Config, StampTarget, StampValue};
use crate::domain::{release_kind_from_message, BuildVersion, CandidateTag, ReleaseKind, TagSet};
use crate::env_output;
use crate::git::{self, Repository};
use crate::hooks::{HookContext, HookExecutor, HookType};
use crate::resolver::VersionResolver;
use crate::revision::RevisionStore;
use crate::stamp;

/// Arguments for the release workflow
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReleaseArgs {
    /// Branch to release; defaults to the checked-out branch
    pub branch: Option<String>,

    /// Override the commit-message gate
    pub kind: Option<ReleaseKind>,

    /// Compute and report without touching files, tags or remotes
    pub dry_run: bool,

    /// Skip pushing even when the configuration enables it
    pub no_push: bool,

    /// Where to export the build version variable
    pub env_file: Option<PathBuf>,
}

/// Version resolved for a branch, before any side effects
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub branch: String,
    pub version: BuildVersion,
    pub tags: TagSet,
    pub warnings: Vec<BoundaryWarning>,
}

/// Result of a release run
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseOutcome {
    pub branch: String,
    pub version: BuildVersion,
    /// Revision issued (or, in a dry run, the one that would be issued)
    pub revision: Option<u64>,
    /// Stamp targets whose content changed, relative to the work tree
    pub stamped: Vec<PathBuf>,
    /// Release notes written for a formal release
    pub notes_file: Option<PathBuf>,
    pub pushed: bool,
    pub dry_run: bool,
    pub warnings: Vec<BoundaryWarning>,
}

/// Determine branch, release kind and build version
///
/// Reads the branch, HEAD message and tags from `repo`; mutates nothing.
pub fn resolve_version<R: Repository>(
    repo: &R,
    config: &Config,
    branch: Option<&str>,
    kind: Option<ReleaseKind>,
) -> Result<Resolution> {
    let branch = match branch {
        Some(b) => b.to_string(),
        None => repo.current_branch().context("determining release branch")?,
    };

    let kind = match kind {
        Some(k) => k,
        None => {
            let message = repo.head_message().context("reading HEAD commit message")?;
            release_kind_from_message(&message, &config.gate.prefix)
        }
    };

    let tags: TagSet = repo.list_tags().context("listing tags")?.into_iter().collect();

    let resolver = VersionResolver::new(config.branch.prefix.clone());
    let version = resolver
        .resolve(&branch, &tags, kind)
        .with_context(|| format!("resolving version for branch '{}'", branch))?;

    info!(%branch, %kind, %version, "resolved build version");

    let warnings = check_boundaries(&version, &tags);
    Ok(Resolution {
        branch,
        version,
        tags,
        warnings,
    })
}

/// Non-fatal conditions for the resolved version
pub fn check_boundaries(version: &BuildVersion, tags: &TagSet) -> Vec<BoundaryWarning> {
    let mut warnings = Vec::new();

    if tags.contains(&version.tag_name()) {
        warnings.push(BoundaryWarning::TagWillMove {
            tag: version.tag_name(),
        });
    }

    let current = match semver::Version::parse(version.base()) {
        Ok(v) => v,
        Err(_) => {
            warnings.push(BoundaryWarning::NonSemverVersion {
                version: version.base().to_string(),
            });
            return warnings;
        }
    };

    // Formal releases are the tags that parse as plain semver
    let latest = tags
        .iter()
        .filter_map(|t| semver::Version::parse(t).ok().map(|v| (v, t)))
        .filter(|(v, _)| v.pre.is_empty())
        .max_by(|a, b| a.0.cmp(&b.0));

    if let Some((latest, name)) = latest {
        let rerun = version.kind().is_formal() && latest == current;
        if latest >= current && !rerun {
            warnings.push(BoundaryWarning::VersionNotNewer {
                version: version.to_string(),
                latest: name.to_string(),
            });
        }
    }

    warnings
}

/// Main release workflow
///
/// Orchestrates a full pipeline pass:
/// 1. Resolve branch, release kind and build version
/// 2. Reserve the revision for a formal release and check every stamp target
/// 3. Extract release notes for a formal release
/// 4. Stamp files and run the pre-tag hook, restoring the files on failure
/// 5. Issue the revision and commit it with the stamped files
/// 6. Force-set the tag, run post-tag hook
/// 7. Push commit and tag, run post-push hook
/// 8. Export the build version for later CI steps
///
/// The revision counter only advances once everything before tagging has
/// succeeded. A failure after tagging leaves the repository as it is;
/// nothing is rolled back.
pub fn run_release<R: Repository>(
    repo: &R,
    config: &Config,
    args: &ReleaseArgs,
) -> Result<ReleaseOutcome> {
    let resolution = resolve_version(repo, config, args.branch.as_deref(), args.kind)?;
    let Resolution {
        branch,
        version,
        warnings: mut outcome_warnings,
        ..
    } = resolution;

    let workdir = repo.workdir().context("locating work tree")?;
    let build_version = version.to_string();

    let revision = reserve_revision(config, &version, &workdir)?;
    let targets = stamp_values(config, &build_version, revision);

    // Nothing is written until every target is known to carry its marker
    let mut stamped = Vec::new();
    for (target, value) in &targets {
        let report = stamp::stamp_file(&workdir.join(&target.path), &target.key, value, true)
            .with_context(|| format!("stamping {}", target.path.display()))?;
        if report.changed && !stamped.contains(&target.path) {
            stamped.push(target.path.clone());
        }
    }

    let notes_file = if version.kind().is_formal() {
        write_release_notes(config, &version, &workdir, args.dry_run, &mut outcome_warnings)?
    } else {
        None
    };

    if args.dry_run {
        info!(%version, "dry run complete, no changes made");
        return Ok(ReleaseOutcome {
            branch,
            version,
            revision,
            stamped,
            notes_file,
            pushed: false,
            dry_run: true,
            warnings: outcome_warnings,
        });
    }

    let context = |hook_type| HookContext {
        hook_type,
        branch: branch.clone(),
        version: version.base().to_string(),
        build_version: build_version.clone(),
        kind: version.kind(),
        version_var: config.output.env_var.clone(),
        revision,
        notes_file: notes_file.clone(),
    };

    let originals = read_originals(&workdir, &stamped)?;
    let prepared = apply_stamps(&workdir, &targets).and_then(|()| match config.hooks.pre_tag {
        Some(ref command) => HookExecutor::execute(command, &context(HookType::PreTag), &workdir)
            .context("running pre-tag hook"),
        None => Ok(()),
    });
    if let Err(err) = prepared {
        restore_originals(&originals);
        return Err(err);
    }

    let mut release_paths = stamped.clone();
    if let Some(expected) = revision {
        let issued = revision_store(config, &workdir)
            .next()
            .context("issuing revision")?;
        anyhow::ensure!(
            issued == expected,
            "revision counter changed during the run (expected {}, issued {})",
            expected,
            issued
        );
        if config.revision.path.is_relative() {
            release_paths.push(config.revision.path.clone());
        }
    }

    let committed = if config.commit.enabled && !release_paths.is_empty() {
        let paths: Vec<&Path> = release_paths.iter().map(PathBuf::as_path).collect();
        let oid = repo
            .commit_paths(&paths, &config.commit.render_message(&build_version))
            .context("committing release files")?;
        info!(%oid, files = paths.len(), "committed release files");
        true
    } else {
        false
    };

    let tag = version.tag_name();
    let head = repo.head_oid().context("reading HEAD")?;
    if let Some(previous) = repo.find_tag_oid(&tag).context("looking up existing tag")? {
        if previous != head {
            info!(%tag, %previous, %head, "moving existing tag");
        }
    }
    repo.force_tag(&tag, head)
        .with_context(|| format!("tagging {}", tag))?;
    info!(%tag, %head, "tag set");

    if let Some(ref command) = config.hooks.post_tag {
        HookExecutor::execute(command, &context(HookType::PostTag), &workdir)
            .context("running post-tag hook")?;
    }

    let pushed = config.remote.push && !args.no_push;
    if pushed {
        let mut refspecs = Vec::new();
        if committed {
            refspecs.push(git::branch_refspec(&branch));
        }
        refspecs.push(git::tag_refspec(&tag));

        repo.push(&config.remote.name, &refspecs)
            .with_context(|| format!("pushing to '{}'", config.remote.name))?;
        info!(remote = %config.remote.name, ?refspecs, "pushed");

        if let Some(ref command) = config.hooks.post_push {
            if let Some(err) =
                HookExecutor::execute_permissive(command, &context(HookType::PostPush), &workdir)
            {
                outcome_warnings.push(BoundaryWarning::PostPushHookFailed {
                    reason: err.to_string(),
                });
            }
        }
    } else {
        debug!("push disabled");
    }

    if let Some(ref env_file) = args.env_file {
        env_output::write_env(env_file, &config.output.env_var, &build_version)
            .context("exporting build version")?;
    }

    Ok(ReleaseOutcome {
        branch,
        version,
        revision,
        stamped,
        notes_file,
        pushed,
        dry_run: false,
        warnings: outcome_warnings,
    })
}

fn revision_store(config: &Config, workdir: &Path) -> RevisionStore {
    RevisionStore::open(workdir.join(&config.revision.path))
}

/// Revision a formal release will issue, without advancing the counter
///
/// Candidates never consume a revision. A formal release without any
/// revision stamp target and without a revision file skips the counter.
fn reserve_revision(
    config: &Config,
    version: &BuildVersion,
    workdir: &Path,
) -> Result<Option<u64>> {
    if !version.kind().is_formal() {
        return Ok(None);
    }

    let store = revision_store(config, workdir);
    let wanted = config.stamp.iter().any(|t| t.value == StampValue::Revision);
    if !wanted && !store.exists() {
        debug!("no revision counter configured");
        return Ok(None);
    }

    let revision = store.peek_next().context("reading revision counter")?;
    Ok(Some(revision))
}

/// Value each stamp target receives; revision targets are skipped without a revision
fn stamp_values<'a>(
    config: &'a Config,
    build_version: &str,
    revision: Option<u64>,
) -> Vec<(&'a StampTarget, String)> {
    config
        .stamp
        .iter()
        .filter_map(|target| match target.value {
            StampValue::Version => Some((target, build_version.to_string())),
            StampValue::Revision => revision.map(|r| (target, r.to_string())),
        })
        .collect()
}

fn apply_stamps(workdir: &Path, targets: &[(&StampTarget, String)]) -> Result<()> {
    for (target, value) in targets {
        stamp::stamp_file(&workdir.join(&target.path), &target.key, value, false)
            .with_context(|| format!("stamping {}", target.path.display()))?;
    }
    Ok(())
}

fn read_originals(workdir: &Path, paths: &[PathBuf]) -> Result<Vec<(PathBuf, String)>> {
    paths
        .iter()
        .map(|path| {
            let full = workdir.join(path);
            let content = fs::read_to_string(&full)
                .with_context(|| format!("reading {}", full.display()))?;
            Ok((full, content))
        })
        .collect()
}

fn restore_originals(originals: &[(PathBuf, String)]) {
    for (path, content) in originals {
        match fs::write(path, content) {
            Ok(()) => debug!(path = %path.display(), "restored stamped file"),
            Err(e) => warn!(path = %path.display(), error = %e, "could not restore stamped file"),
        }
    }
}

fn write_release_notes(
    config: &Config,
    version: &BuildVersion,
    workdir: &Path,
    dry_run: bool,
    warnings: &mut Vec<BoundaryWarning>,
) -> Result<Option<PathBuf>> {
    let changelog_path = workdir.join(&config.changelog.path);
    let section = fs::read_to_string(&changelog_path)
        .ok()
        .and_then(|content| changelog::extract_section(&content, &version.to_string()));

    let Some(section) = section else {
        warnings.push(BoundaryWarning::MissingChangelogSection {
            version: version.to_string(),
            path: config.changelog.path.display().to_string(),
        });
        return Ok(None);
    };

    if dry_run {
        return Ok(None);
    }

    let output = match config.changelog.notes_output {
        Some(ref path) => workdir.join(path),
        None => std::env::temp_dir().join(format!("release-notes-{}.md", version)),
    };
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output, format!("{}\n", section))
        .with_context(|| format!("writing release notes to {}", output.display()))?;

    debug!(path = %output.display(), "wrote release notes");
    Ok(Some(output))
}

/// Candidate tags already present for `version`, highest first
pub fn existing_candidates(tags: &TagSet, version: &str) -> Result<Vec<CandidateTag>> {
    let mut candidates = tags.candidates_of(version)?;
    candidates.sort_by(|a, b| b.number.cmp(&a.number));
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::mock::{mock_oid, MockRepository};

    fn workdir_with_version() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("__version__.py"), "VERSION = '0.0.0'\n").unwrap();
        dir
    }

    fn config_with_stamp() -> Config {
        let mut config = Config::default();
        config.stamp.push(StampTarget {
            path: PathBuf::from("__version__.py"),
            key: "VERSION".to_string(),
            value: StampValue::Version,
        });
        config
    }

    #[test]
    fn test_candidate_run_stamps_tags_and_pushes() {
        let dir = workdir_with_version();
        let repo = MockRepository::new(dir.path(), "release/1.3.0", "fix: colors");
        repo.add_tag("1.3.0rc1", mock_oid(1));
        repo.add_tag("1.3.0rc2", mock_oid(1));
        repo.add_tag("0.9.0", mock_oid(1));

        let outcome = run_release(&repo, &config_with_stamp(), &ReleaseArgs::default()).unwrap();

        assert_eq!(outcome.version.to_string(), "1.3.0rc3");
        assert_eq!(outcome.revision, None);
        assert!(outcome.pushed);
        assert_eq!(
            fs::read_to_string(dir.path().join("__version__.py")).unwrap(),
            "VERSION = '1.3.0rc3'\n"
        );

        let commits = repo.commits();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].message, "Stamp version 1.3.0rc3");
        assert_eq!(repo.tag_target("1.3.0rc3"), Some(commits[0].oid));

        let pushes = repo.pushes();
        assert_eq!(pushes.len(), 1);
        assert_eq!(
            pushes[0].1,
            vec![
                git::branch_refspec("release/1.3.0"),
                git::tag_refspec("1.3.0rc3")
            ]
        );
    }

    #[test]
    fn test_formal_run_with_gate() {
        let dir = workdir_with_version();
        fs::write(dir.path().join("CHANGELOG.md"), "## 2.0.0\n\n- Big one\n\n## 1.0.0\n- old\n")
            .unwrap();
        let repo = MockRepository::new(dir.path(), "release/2.0.0", "release: 2.0.0");
        repo.add_tag("2.0.0rc4", mock_oid(1));

        let mut config = config_with_stamp();
        config.changelog.notes_output = Some(PathBuf::from("notes.md"));

        let outcome = run_release(&repo, &config, &ReleaseArgs::default()).unwrap();

        assert_eq!(outcome.version, BuildVersion::formal("2.0.0"));
        assert!(repo.tag_target("2.0.0").is_some());
        let notes = outcome.notes_file.unwrap();
        assert_eq!(fs::read_to_string(notes).unwrap(), "- Big one\n");
    }

    #[test]
    fn test_formal_run_issues_revision() {
        let dir = workdir_with_version();
        fs::write(dir.path().join("companion.sh"), "REVISION = '41'\n").unwrap();
        RevisionStore::open(dir.path().join(".release/revision.toml"))
            .init(41)
            .unwrap();

        let mut config = config_with_stamp();
        config.stamp.push(StampTarget {
            path: PathBuf::from("companion.sh"),
            key: "REVISION".to_string(),
            value: StampValue::Revision,
        });

        let repo = MockRepository::new(dir.path(), "release/2.1.0", "release 2.1.0");
        let outcome = run_release(&repo, &config, &ReleaseArgs::default()).unwrap();

        assert_eq!(outcome.revision, Some(42));
        assert_eq!(
            fs::read_to_string(dir.path().join("companion.sh")).unwrap(),
            "REVISION = '42'\n"
        );
        assert_eq!(outcome.stamped.len(), 2);
        assert!(outcome
            .warnings
            .iter()
            .any(|w| matches!(w, BoundaryWarning::MissingChangelogSection { .. })));

        // The counter travels with the release commit
        let commits = repo.commits();
        assert_eq!(commits.len(), 1);
        assert!(commits[0]
            .paths
            .contains(&PathBuf::from(".release/revision.toml")));
        assert_eq!(
            repo.pushes()[0].1,
            vec![
                git::branch_refspec("release/2.1.0"),
                git::tag_refspec("2.1.0")
            ]
        );
    }

    fn companion_first_config() -> Config {
        let mut config = Config::default();
        config.stamp.push(StampTarget {
            path: PathBuf::from("companion.sh"),
            key: "REVISION".to_string(),
            value: StampValue::Revision,
        });
        config.stamp.push(StampTarget {
            path: PathBuf::from("__version__.py"),
            key: "VERSION".to_string(),
            value: StampValue::Version,
        });
        config
    }

    #[test]
    fn test_revision_only_file_is_committed() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("__version__.py"), "VERSION = '2.2.0'\n").unwrap();
        let store = RevisionStore::open(dir.path().join(".release/revision.toml"));
        store.init(9).unwrap();

        let repo = MockRepository::new(dir.path(), "release/2.2.0", "release 2.2.0");
        let outcome = run_release(&repo, &config_with_stamp(), &ReleaseArgs::default()).unwrap();

        assert_eq!(outcome.revision, Some(10));
        assert!(outcome.stamped.is_empty());
        assert_eq!(
            repo.commits()[0].paths,
            vec![PathBuf::from(".release/revision.toml")]
        );
        assert_eq!(store.current().unwrap(), 10);
    }

    #[test]
    fn test_missing_marker_keeps_revision_and_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("__version__.py"), "NAME = 'x'\n").unwrap();
        fs::write(dir.path().join("companion.sh"), "REVISION = '41'\n").unwrap();
        let store = RevisionStore::open(dir.path().join(".release/revision.toml"));
        store.init(41).unwrap();

        let repo = MockRepository::new(dir.path(), "release/2.1.0", "release 2.1.0");
        let err = run_release(&repo, &companion_first_config(), &ReleaseArgs::default())
            .unwrap_err();

        assert!(format!("{:#}", err).contains("stamping __version__.py"));
        assert_eq!(store.current().unwrap(), 41);
        assert_eq!(
            fs::read_to_string(dir.path().join("companion.sh")).unwrap(),
            "REVISION = '41'\n"
        );
        assert!(repo.commits().is_empty());
        assert!(repo.list_tags().unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_pre_tag_hook_restores_files_and_revision() {
        let dir = workdir_with_version();
        fs::write(dir.path().join("companion.sh"), "REVISION = '41'\n").unwrap();
        let store = RevisionStore::open(dir.path().join(".release/revision.toml"));
        store.init(41).unwrap();

        let mut config = companion_first_config();
        config.hooks.pre_tag = Some("exit 1".to_string());

        let repo = MockRepository::new(dir.path(), "release/2.1.0", "release 2.1.0");
        let err = run_release(&repo, &config, &ReleaseArgs::default()).unwrap_err();

        assert!(format!("{:#}", err).contains("pre-tag hook"));
        assert_eq!(store.current().unwrap(), 41);
        assert_eq!(
            fs::read_to_string(dir.path().join("companion.sh")).unwrap(),
            "REVISION = '41'\n"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("__version__.py")).unwrap(),
            "VERSION = '0.0.0'\n"
        );
        assert!(repo.commits().is_empty());
    }

    #[test]
    fn test_dry_run_does_not_advance_revision() {
        let dir = workdir_with_version();
        fs::write(dir.path().join("companion.sh"), "REVISION = '41'\n").unwrap();
        let store = RevisionStore::open(dir.path().join(".release/revision.toml"));
        store.init(41).unwrap();

        let repo = MockRepository::new(dir.path(), "release/2.1.0", "release 2.1.0");
        let args = ReleaseArgs {
            dry_run: true,
            ..ReleaseArgs::default()
        };
        let outcome = run_release(&repo, &companion_first_config(), &args).unwrap();

        assert_eq!(outcome.revision, Some(42));
        assert_eq!(store.current().unwrap(), 41);
    }

    #[test]
    fn test_candidate_skips_revision_targets() {
        let dir = workdir_with_version();
        fs::write(dir.path().join("companion.sh"), "REVISION = '41'\n").unwrap();

        let mut config = config_with_stamp();
        config.stamp.push(StampTarget {
            path: PathBuf::from("companion.sh"),
            key: "REVISION".to_string(),
            value: StampValue::Revision,
        });

        let repo = MockRepository::new(dir.path(), "release/2.1.0", "wip");
        let outcome = run_release(&repo, &config, &ReleaseArgs::default()).unwrap();

        assert_eq!(outcome.version.to_string(), "2.1.0rc1");
        assert_eq!(outcome.stamped, vec![PathBuf::from("__version__.py")]);
    }

    #[test]
    fn test_dry_run_mutates_nothing() {
        let dir = workdir_with_version();
        let env_file = dir.path().join("env");
        let repo = MockRepository::new(dir.path(), "release/1.0.0", "wip");

        let args = ReleaseArgs {
            dry_run: true,
            env_file: Some(env_file.clone()),
            ..ReleaseArgs::default()
        };
        let outcome = run_release(&repo, &config_with_stamp(), &args).unwrap();

        assert!(outcome.dry_run);
        assert_eq!(outcome.version.to_string(), "1.0.0rc1");
        assert_eq!(outcome.stamped, vec![PathBuf::from("__version__.py")]);
        assert!(repo.list_tags().unwrap().is_empty());
        assert!(repo.commits().is_empty());
        assert!(repo.pushes().is_empty());
        assert!(!env_file.exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("__version__.py")).unwrap(),
            "VERSION = '0.0.0'\n"
        );
    }

    #[test]
    fn test_rerun_moves_tag() {
        let dir = workdir_with_version();
        let repo = MockRepository::new(dir.path(), "release/3.0.0", "release: 3.0.0");
        repo.add_tag("3.0.0", mock_oid(1));

        let outcome = run_release(&repo, &config_with_stamp(), &ReleaseArgs::default()).unwrap();

        assert!(outcome
            .warnings
            .contains(&BoundaryWarning::TagWillMove { tag: "3.0.0".to_string() }));
        assert_eq!(repo.tag_target("3.0.0"), Some(repo.head_oid().unwrap()));
        assert_ne!(repo.tag_target("3.0.0"), Some(mock_oid(1)));
    }

    #[test]
    fn test_no_push_and_env_export() {
        let dir = workdir_with_version();
        let env_file = dir.path().join("env");
        let repo = MockRepository::new(dir.path(), "release/1.1.0", "wip");

        let args = ReleaseArgs {
            no_push: true,
            env_file: Some(env_file.clone()),
            ..ReleaseArgs::default()
        };
        let outcome = run_release(&repo, &config_with_stamp(), &args).unwrap();

        assert!(!outcome.pushed);
        assert!(repo.pushes().is_empty());
        assert_eq!(fs::read_to_string(env_file).unwrap(), "BUILDVER=1.1.0rc1\n");
    }

    #[test]
    fn test_unchanged_files_are_not_committed() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("__version__.py"), "VERSION = '1.1.0rc1'\n").unwrap();
        let repo = MockRepository::new(dir.path(), "release/1.1.0", "wip");

        let outcome = run_release(&repo, &config_with_stamp(), &ReleaseArgs::default()).unwrap();

        assert!(outcome.stamped.is_empty());
        assert!(repo.commits().is_empty());
        assert_eq!(repo.pushes()[0].1, vec![git::tag_refspec("1.1.0rc1")]);
    }

    #[test]
    fn test_missing_marker_fails_before_tagging() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("__version__.py"), "NAME = 'x'\n").unwrap();
        let repo = MockRepository::new(dir.path(), "release/1.0.0", "wip");

        let err = run_release(&repo, &config_with_stamp(), &ReleaseArgs::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("stamping __version__.py"));
        assert!(repo.list_tags().unwrap().is_empty());
    }

    #[test]
    fn test_push_failure_keeps_local_tag() {
        let dir = workdir_with_version();
        let repo = MockRepository::new(dir.path(), "release/1.0.0", "wip").without_remotes();

        let err = run_release(&repo, &config_with_stamp(), &ReleaseArgs::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("pushing to 'origin'"));
        assert!(repo.tag_target("1.0.0rc1").is_some());
    }

    #[test]
    fn test_explicit_branch_and_kind() {
        let dir = workdir_with_version();
        let repo = MockRepository::new(dir.path(), "main", "release: not this").detach();

        let args = ReleaseArgs {
            branch: Some("release/4.0.0".to_string()),
            kind: Some(ReleaseKind::Candidate),
            dry_run: true,
            ..ReleaseArgs::default()
        };
        let outcome = run_release(&repo, &config_with_stamp(), &args).unwrap();
        assert_eq!(outcome.version.to_string(), "4.0.0rc1");
    }

    #[test]
    fn test_non_release_branch_fails() {
        let dir = workdir_with_version();
        let repo = MockRepository::new(dir.path(), "main", "wip");

        let err = run_release(&repo, &Config::default(), &ReleaseArgs::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("not a release branch"));
    }

    #[test]
    fn test_boundaries_version_not_newer() {
        let tags: TagSet = ["2.0.0", "1.0.0"].into_iter().collect();
        let warnings = check_boundaries(&BuildVersion::formal("1.5.0"), &tags);
        assert_eq!(
            warnings,
            vec![BoundaryWarning::VersionNotNewer {
                version: "1.5.0".to_string(),
                latest: "2.0.0".to_string()
            }]
        );
    }

    #[test]
    fn test_boundaries_non_semver() {
        let warnings = check_boundaries(&BuildVersion::candidate("1.3", 1), &TagSet::new());
        assert_eq!(
            warnings,
            vec![BoundaryWarning::NonSemverVersion {
                version: "1.3".to_string()
            }]
        );
    }

    #[test]
    fn test_existing_candidates_sorted() {
        let tags: TagSet = ["1.0rc2", "1.0rc10", "1.0rc1", "1.0"].into_iter().collect();
        let numbers: Vec<u32> = existing_candidates(&tags, "1.0")
            .unwrap()
            .into_iter()
            .map(|c| c.number)
            .collect();
        assert_eq!(numbers, vec![10, 2, 1]);
    }
}
