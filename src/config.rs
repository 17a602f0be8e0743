use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::branch::DEFAULT_BRANCH_PREFIX;
use crate::domain::commit::DEFAULT_GATE_PREFIX;
use crate::env_output::DEFAULT_VERSION_VAR;
use crate::error::{ReleaseError, Result};
use crate::stamp::DEFAULT_KEY;

/// File name searched for in the working directory and the user config dir
pub const CONFIG_FILE_NAME: &str = "release-tagger.toml";

/// Represents the complete configuration for release-tagger.
///
/// Contains the branch and gate conventions, stamp targets, changelog and
/// revision locations, remote behavior, and hook commands.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub branch: BranchConfig,

    #[serde(default)]
    pub gate: GateConfig,

    #[serde(default)]
    pub stamp: Vec<StampTarget>,

    #[serde(default)]
    pub changelog: ChangelogConfig,

    #[serde(default)]
    pub revision: RevisionConfig,

    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub commit: CommitConfig,

    #[serde(default)]
    pub hooks: HooksConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

fn default_branch_prefix() -> String {
    DEFAULT_BRANCH_PREFIX.to_string()
}

/// Which branches are release branches.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BranchConfig {
    #[serde(default = "default_branch_prefix")]
    pub prefix: String,
}

impl Default for BranchConfig {
    fn default() -> Self {
        BranchConfig {
            prefix: default_branch_prefix(),
        }
    }
}

fn default_gate_prefix() -> String {
    DEFAULT_GATE_PREFIX.to_string()
}

/// Commit-message prefix selecting a formal release.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GateConfig {
    #[serde(default = "default_gate_prefix")]
    pub prefix: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        GateConfig {
            prefix: default_gate_prefix(),
        }
    }
}

/// What a stamp target receives.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StampValue {
    /// The build version (`1.3.0rc2` or `1.3.0`)
    #[default]
    Version,
    /// The revision counter; only stamped on formal releases
    Revision,
}

fn default_stamp_key() -> String {
    DEFAULT_KEY.to_string()
}

/// A file carrying a `KEY = '...'` marker line.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct StampTarget {
    pub path: PathBuf,

    #[serde(default = "default_stamp_key")]
    pub key: String,

    #[serde(default)]
    pub value: StampValue,
}

fn default_changelog_path() -> PathBuf {
    PathBuf::from("CHANGELOG.md")
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ChangelogConfig {
    #[serde(default = "default_changelog_path")]
    pub path: PathBuf,

    /// Where formal runs write the extracted release notes
    #[serde(default)]
    pub notes_output: Option<PathBuf>,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        ChangelogConfig {
            path: default_changelog_path(),
            notes_output: None,
        }
    }
}

fn default_revision_path() -> PathBuf {
    PathBuf::from(".release/revision.toml")
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RevisionConfig {
    #[serde(default = "default_revision_path")]
    pub path: PathBuf,
}

impl Default for RevisionConfig {
    fn default() -> Self {
        RevisionConfig {
            path: default_revision_path(),
        }
    }
}

fn default_remote_name() -> String {
    "origin".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RemoteConfig {
    #[serde(default = "default_remote_name")]
    pub name: String,

    #[serde(default = "default_true")]
    pub push: bool,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            name: default_remote_name(),
            push: true,
        }
    }
}

fn default_commit_message() -> String {
    "Stamp version {version}".to_string()
}

/// Committing stamped files before tagging.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CommitConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// `{version}` is replaced with the build version
    #[serde(default = "default_commit_message")]
    pub message: String,
}

impl Default for CommitConfig {
    fn default() -> Self {
        CommitConfig {
            enabled: true,
            message: default_commit_message(),
        }
    }
}

impl CommitConfig {
    pub fn render_message(&self, version: &str) -> String {
        self.message.replace("{version}", version)
    }
}

/// Shell commands run at workflow points.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct HooksConfig {
    #[serde(default)]
    pub pre_tag: Option<String>,

    #[serde(default)]
    pub post_tag: Option<String>,

    #[serde(default)]
    pub post_push: Option<String>,
}

fn default_env_var() -> String {
    DEFAULT_VERSION_VAR.to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct OutputConfig {
    #[serde(default = "default_env_var")]
    pub env_var: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            env_var: default_env_var(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `release-tagger.toml` in current directory
/// 3. `release-tagger.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let path = if let Some(path) = config_path {
        path.to_path_buf()
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        PathBuf::from(CONFIG_FILE_NAME)
    } else if let Some(config_dir) = dirs::config_dir() {
        let candidate = config_dir.join(CONFIG_FILE_NAME);
        if candidate.exists() {
            candidate
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config_str = fs::read_to_string(&path).map_err(|e| {
        ReleaseError::config(format!("Cannot read {}: {}", path.display(), e))
    })?;
    let config = parse_config(&config_str)
        .map_err(|e| ReleaseError::config(format!("{}: {}", path.display(), e)))?;

    tracing::debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}

/// Parse and validate configuration text
pub fn parse_config(config_str: &str) -> Result<Config> {
    let config: Config =
        toml::from_str(config_str).map_err(|e| ReleaseError::config(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.branch.prefix.is_empty() {
            return Err(ReleaseError::config("branch.prefix must not be empty"));
        }
        if self.output.env_var.is_empty() {
            return Err(ReleaseError::config("output.env_var must not be empty"));
        }
        for target in &self.stamp {
            if target.key.trim().is_empty() {
                return Err(ReleaseError::config(format!(
                    "stamp target {} has an empty key",
                    target.path.display()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.branch.prefix, "release/");
        assert_eq!(config.gate.prefix, "release");
        assert_eq!(config.output.env_var, "BUILDVER");
        assert_eq!(config.remote.name, "origin");
        assert!(config.remote.push);
        assert!(config.stamp.is_empty());
    }

    #[test]
    fn test_empty_file_equals_defaults() {
        assert_eq!(parse_config("").unwrap(), Config::default());
    }

    #[test]
    fn test_stamp_targets() {
        let config = parse_config(
            r#"
[[stamp]]
path = "hyfetch/__version__.py"

[[stamp]]
path = "neofetch"
key = "REVISION"
value = "revision"
"#,
        )
        .unwrap();

        assert_eq!(config.stamp.len(), 2);
        assert_eq!(config.stamp[0].key, "VERSION");
        assert_eq!(config.stamp[0].value, StampValue::Version);
        assert_eq!(config.stamp[1].key, "REVISION");
        assert_eq!(config.stamp[1].value, StampValue::Revision);
    }

    #[test]
    fn test_validation_rejects_empty_prefix() {
        let err = parse_config("[branch]\nprefix = \"\"\n").unwrap_err();
        assert!(err.to_string().contains("branch.prefix"));
    }

    #[test]
    fn test_unknown_stamp_value_rejected() {
        assert!(parse_config("[[stamp]]\npath = \"a\"\nvalue = \"date\"\n").is_err());
    }

    #[test]
    fn test_commit_message_render() {
        let commit = CommitConfig::default();
        assert_eq!(commit.render_message("1.0rc1"), "Stamp version 1.0rc1");
    }
}
