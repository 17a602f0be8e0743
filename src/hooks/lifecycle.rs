use std::collections::HashMap;
use std::path::PathBuf;

use crate::domain::ReleaseKind;

/// Points in the release run where external commands are invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookType {
    PreTag,
    PostTag,
    PostPush,
}

impl HookType {
    /// Get the hook name as a string
    pub fn name(&self) -> &'static str {
        match self {
            HookType::PreTag => "pre-tag",
            HookType::PostTag => "post-tag",
            HookType::PostPush => "post-push",
        }
    }
}

/// Values handed to a hook command through its environment
#[derive(Debug, Clone)]
pub struct HookContext {
    pub hook_type: HookType,
    /// Release branch being built
    pub branch: String,
    /// Release version without candidate suffix
    pub version: String,
    /// Full build version, also the tag name
    pub build_version: String,
    pub kind: ReleaseKind,
    /// Name of the variable carrying the build version (BUILDVER by default)
    pub version_var: String,
    /// Revision issued for a formal release
    pub revision: Option<u64>,
    /// File holding the extracted release notes
    pub notes_file: Option<PathBuf>,
}

impl HookContext {
    /// Convert context to environment variables for the hook command
    pub fn to_env_vars(&self) -> HashMap<String, String> {
        let mut env = HashMap::new();

        env.insert("RELEASE_HOOK".to_string(), self.hook_type.name().to_string());
        env.insert("RELEASE_BRANCH".to_string(), self.branch.clone());
        env.insert("RELEASE_VERSION".to_string(), self.version.clone());
        env.insert("RELEASE_KIND".to_string(), self.kind.to_string());
        env.insert("RELEASE_TAG".to_string(), self.build_version.clone());
        env.insert(self.version_var.clone(), self.build_version.clone());

        if let Some(revision) = self.revision {
            env.insert("RELEASE_REVISION".to_string(), revision.to_string());
        }

        if let Some(ref notes) = self.notes_file {
            env.insert(
                "RELEASE_NOTES_FILE".to_string(),
                notes.display().to_string(),
            );
        }

        env
    }
}
