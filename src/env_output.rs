//! Export of computed values to later CI steps
//!
//! CI runners read `NAME=value` lines appended to the file named by
//! `GITHUB_ENV`; every following step sees them as environment variables.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{ReleaseError, Result};

/// Environment variable naming the runner's env file
pub const RUNNER_ENV_FILE: &str = "GITHUB_ENV";

/// Default name of the exported build version variable
pub const DEFAULT_VERSION_VAR: &str = "BUILDVER";

/// Pick the env file: explicit path first, then `GITHUB_ENV`
pub fn env_file_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit.map(Path::to_path_buf).or_else(|| {
        std::env::var_os(RUNNER_ENV_FILE)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    })
}

/// Append `name=value` to the env file at `path`
pub fn write_env(path: &Path, name: &str, value: &str) -> Result<()> {
    if name.is_empty() || name.contains('=') || name.contains('\n') {
        return Err(ReleaseError::config(format!(
            "Invalid environment variable name '{}'",
            name
        )));
    }
    if value.contains('\n') {
        return Err(ReleaseError::config(format!(
            "Value for {} must be a single line",
            name
        )));
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}={}", name, value)?;

    info!(path = %path.display(), name, value, "exported variable");
    Ok(())
}
