use crate::error::{ReleaseError, Result};
use crate::hooks::HookContext;
use std::path::Path;
use std::process::Command;
use tracing::{info, warn};

/// Runs configured hook commands
pub struct HookExecutor;

impl HookExecutor {
    /// Execute a hook command with the given context
    ///
    /// The command line runs through the platform shell in `workdir`, with
    /// the context exported as environment variables. Any non-zero exit code
    /// is a failure.
    pub fn execute(command: &str, context: &HookContext, workdir: &Path) -> Result<()> {
        if command.trim().is_empty() {
            return Err(ReleaseError::hook(format!(
                "{} hook command is empty",
                context.hook_type.name()
            )));
        }

        let mut cmd = shell_command(command);
        cmd.current_dir(workdir).envs(context.to_env_vars());

        info!(hook = context.hook_type.name(), command, "running hook");

        let output = cmd.output().map_err(|e| {
            ReleaseError::hook(format!(
                "Failed to execute {} hook '{}': {}",
                context.hook_type.name(),
                command,
                e
            ))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            return Err(ReleaseError::hook(format!(
                "{} hook '{}' failed with exit code {}\nStdout: {}\nStderr: {}",
                context.hook_type.name(),
                command,
                output.status.code().unwrap_or(-1),
                stdout.trim_end(),
                stderr.trim_end()
            )));
        }

        Ok(())
    }

    /// Try to execute a hook, reporting errors but not failing
    ///
    /// Used for post-push hooks where the push has already succeeded.
    pub fn execute_permissive(
        command: &str,
        context: &HookContext,
        workdir: &Path,
    ) -> Option<ReleaseError> {
        match Self::execute(command, context, workdir) {
            Ok(()) => None,
            Err(e) => {
                warn!(hook = context.hook_type.name(), error = %e, "hook failed");
                Some(e)
            }
        }
    }
}

#[cfg(unix)]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}
