//! Changelog section extraction
//!
//! Release notes live in a markdown changelog where each release has a
//! heading whose text is exactly the build version:
//!
//! ```markdown
//! ## 1.3.0
//! - new preset picker
//!
//! ## 1.2.0
//! - ...
//! ```

use std::fs;
use std::path::Path;

use crate::error::{ReleaseError, Result};

/// Heading level and text, if `line` is a markdown ATX heading
fn heading(line: &str) -> Option<(usize, &str)> {
    let trimmed = line.trim_end();
    let level = trimmed.bytes().take_while(|&b| b == b'#').count();
    if level == 0 || level > 6 {
        return None;
    }

    let rest = &trimmed[level..];
    if !rest.is_empty() && !rest.starts_with(' ') && !rest.starts_with('\t') {
        return None;
    }

    // Optional closing sequence: "## 1.0 ##"
    let text = rest.trim().trim_end_matches('#').trim_end();
    Some((level, text))
}

fn is_fence(line: &str) -> bool {
    let t = line.trim_start();
    t.starts_with("```") || t.starts_with("~~~")
}

/// Extract the body of the section headed by `version`
///
/// The section ends at the next heading of the same or a higher level.
/// Headings inside fenced code blocks are not treated as delimiters.
pub fn extract_section(content: &str, version: &str) -> Option<String> {
    let mut in_fence = false;
    let mut section_level: Option<usize> = None;
    let mut body: Vec<&str> = Vec::new();

    for line in content.lines() {
        if is_fence(line) {
            in_fence = !in_fence;
        }

        let parsed = if in_fence || is_fence(line) {
            None
        } else {
            heading(line)
        };

        match (section_level, parsed) {
            (None, Some((level, text))) if text == version => {
                section_level = Some(level);
            }
            (None, _) => {}
            (Some(open), Some((level, _))) if level <= open => break,
            (Some(_), _) => body.push(line),
        }
    }

    section_level?;

    let start = body.iter().position(|l| !l.trim().is_empty()).unwrap_or(body.len());
    let end = body
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map(|i| i + 1)
        .unwrap_or(start);

    Some(body[start..end.max(start)].join("\n"))
}

/// Read the changelog at `path` and extract the section for `version`
pub fn extract_from_file(path: &Path, version: &str) -> Result<String> {
    let content = fs::read_to_string(path).map_err(|e| {
        ReleaseError::changelog(format!("Cannot read {}: {}", path.display(), e))
    })?;

    extract_section(&content, version).ok_or_else(|| {
        ReleaseError::changelog(format!(
            "No section headed '{}' in {}",
            version,
            path.display()
        ))
    })
}
