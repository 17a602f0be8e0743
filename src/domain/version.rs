use crate::error::{ReleaseError, Result};
use std::fmt;
use std::str::FromStr;

use super::tag::CANDIDATE_MARKER;

/// Whether a build is a release candidate or a formal release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseKind {
    Candidate,
    Formal,
}

impl ReleaseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseKind::Candidate => "candidate",
            ReleaseKind::Formal => "formal",
        }
    }

    pub fn is_formal(&self) -> bool {
        matches!(self, ReleaseKind::Formal)
    }
}

impl fmt::Display for ReleaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReleaseKind {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "candidate" | "rc" => Ok(ReleaseKind::Candidate),
            "formal" | "final" => Ok(ReleaseKind::Formal),
            other => Err(ReleaseError::version(format!(
                "Unknown release kind '{}' (expected 'candidate' or 'formal')",
                other
            ))),
        }
    }
}

/// The version stamped and tagged for one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildVersion {
    /// `<version>`
    Formal { version: String },
    /// `<version>rc<number>`
    Candidate { version: String, number: u32 },
}

impl BuildVersion {
    pub fn formal(version: impl Into<String>) -> Self {
        BuildVersion::Formal {
            version: version.into(),
        }
    }

    pub fn candidate(version: impl Into<String>, number: u32) -> Self {
        BuildVersion::Candidate {
            version: version.into(),
            number,
        }
    }

    /// Release version without any candidate suffix
    pub fn base(&self) -> &str {
        match self {
            BuildVersion::Formal { version } | BuildVersion::Candidate { version, .. } => version,
        }
    }

    pub fn kind(&self) -> ReleaseKind {
        match self {
            BuildVersion::Formal { .. } => ReleaseKind::Formal,
            BuildVersion::Candidate { .. } => ReleaseKind::Candidate,
        }
    }

    /// Tag name for this build; identical to its display form
    pub fn tag_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for BuildVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildVersion::Formal { version } => write!(f, "{}", version),
            BuildVersion::Candidate { version, number } => {
                write!(f, "{}{}{}", version, CANDIDATE_MARKER, number)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formal_display() {
        assert_eq!(BuildVersion::formal("2.0.0").to_string(), "2.0.0");
    }

    #[test]
    fn test_candidate_display() {
        let v = BuildVersion::candidate("1.3.0", 3);
        assert_eq!(v.to_string(), "1.3.0rc3");
        assert_eq!(v.tag_name(), "1.3.0rc3");
        assert_eq!(v.base(), "1.3.0");
        assert_eq!(v.kind(), ReleaseKind::Candidate);
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("formal".parse::<ReleaseKind>().unwrap(), ReleaseKind::Formal);
        assert_eq!("RC".parse::<ReleaseKind>().unwrap(), ReleaseKind::Candidate);
        assert!("nightly".parse::<ReleaseKind>().is_err());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ReleaseKind::Formal.to_string(), "formal");
        assert!(ReleaseKind::Formal.is_formal());
        assert!(!ReleaseKind::Candidate.is_formal());
    }
}
