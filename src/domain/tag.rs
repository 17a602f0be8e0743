use std::collections::BTreeSet;

use crate::error::{ReleaseError, Result};

/// Marker separating the release version from the candidate number
pub const CANDIDATE_MARKER: &str = "rc";

/// A release-candidate tag of the form `<version>rc<number>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateTag {
    pub version: String,
    pub number: u32,
}

impl CandidateTag {
    pub fn new(version: impl Into<String>, number: u32) -> Self {
        CandidateTag {
            version: version.into(),
            number,
        }
    }

    /// Parse `tag` as a candidate of `version`
    ///
    /// The match is anchored on both ends: the tag must be exactly the
    /// version, the `rc` marker, then one or more ASCII digits. This keeps
    /// `1.30rc1` from counting as a candidate of `1.3`.
    ///
    /// A candidate whose number does not fit in a `u32` is an error rather
    /// than a non-candidate.
    pub fn parse_for(tag: &str, version: &str) -> Result<Option<Self>> {
        let digits = match tag
            .strip_prefix(version)
            .and_then(|rest| rest.strip_prefix(CANDIDATE_MARKER))
        {
            Some(digits) => digits,
            None => return Ok(None),
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Ok(None);
        }

        let number = digits.parse::<u32>().map_err(|_| {
            ReleaseError::version(format!(
                "Candidate tag '{}' has a number above {}",
                tag,
                u32::MAX
            ))
        })?;
        Ok(Some(CandidateTag::new(version, number)))
    }

    /// Tag name for this candidate
    pub fn name(&self) -> String {
        format!("{}{}{}", self.version, CANDIDATE_MARKER, self.number)
    }
}

/// The set of tags present in a repository
///
/// Ordering of the underlying listing is never relied on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    tags: BTreeSet<String>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn insert(&mut self, tag: impl Into<String>) -> bool {
        self.tags.insert(tag.into())
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    /// All candidate tags of `version`, in tag-name order
    pub fn candidates_of(&self, version: &str) -> Result<Vec<CandidateTag>> {
        let mut candidates = Vec::new();
        for tag in &self.tags {
            if let Some(candidate) = CandidateTag::parse_for(tag, version)? {
                candidates.push(candidate);
            }
        }
        Ok(candidates)
    }

    /// Highest candidate number recorded for `version`
    pub fn highest_candidate(&self, version: &str) -> Result<Option<u32>> {
        Ok(self
            .candidates_of(version)?
            .into_iter()
            .map(|c| c.number)
            .max())
    }
}

impl<S: Into<String>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        TagSet {
            tags: iter.into_iter().map(Into::into).collect(),
        }
    }
}
