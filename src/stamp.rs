//! Version stamping into source files
//!
//! A stamp target is a file carrying a marker line such as
//! `VERSION = '1.2.0'`. Every marker line for the key is rewritten wholesale;
//! all other lines are left byte-for-byte intact.

use regex::Regex;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{ReleaseError, Result};

/// Default key of the marker line
pub const DEFAULT_KEY: &str = "VERSION";

fn marker_regex(key: &str) -> Result<Regex> {
    let pattern = format!(
        r#"^([ \t]*){}[ \t]*=[ \t]*['"][^'"\r\n]*['"].*$"#,
        regex::escape(key)
    );
    Regex::new(&pattern).map_err(|e| ReleaseError::stamp(format!("Invalid key '{}': {}", key, e)))
}

/// Rewrite every `KEY = '...'` line in `content`
///
/// Returns the new content and the number of lines replaced.
pub fn stamp_content(content: &str, key: &str, value: &str) -> Result<(String, usize)> {
    let re = marker_regex(key)?;
    let mut out = String::with_capacity(content.len() + value.len());
    let mut replaced = 0;

    for raw in content.split_inclusive('\n') {
        let (line, ending) = split_line_ending(raw);

        match re.captures(line) {
            Some(caps) => {
                let indent = caps.get(1).map(|m| m.as_str()).unwrap_or("");
                out.push_str(&format!("{}{} = '{}'", indent, key, value));
                replaced += 1;
            }
            None => out.push_str(line),
        }
        out.push_str(ending);
    }

    Ok((out, replaced))
}

fn split_line_ending(raw: &str) -> (&str, &str) {
    if let Some(line) = raw.strip_suffix("\r\n") {
        (line, "\r\n")
    } else if let Some(line) = raw.strip_suffix('\n') {
        (line, "\n")
    } else {
        (raw, "")
    }
}

/// What stamping one file did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StampReport {
    /// Marker lines rewritten
    pub replaced: usize,
    /// Whether the file content differs from before
    pub changed: bool,
}

/// Stamp `value` into the file at `path`
///
/// A file without any marker line for `key` is an error: a configured
/// target that cannot be stamped would otherwise ship the old version.
/// With `dry_run` the file is checked but not written.
pub fn stamp_file(path: &Path, key: &str, value: &str, dry_run: bool) -> Result<StampReport> {
    let content = fs::read_to_string(path).map_err(|e| {
        ReleaseError::stamp(format!("Cannot read {}: {}", path.display(), e))
    })?;

    let (stamped, replaced) = stamp_content(&content, key, value)?;
    if replaced == 0 {
        return Err(ReleaseError::stamp(format!(
            "No '{} = ...' line found in {}",
            key,
            path.display()
        )));
    }

    let changed = stamped != content;
    if !changed {
        debug!(path = %path.display(), key, "already stamped");
    } else if !dry_run {
        fs::write(path, stamped)?;
        info!(path = %path.display(), key, value, "stamped version");
    }

    Ok(StampReport { replaced, changed })
}
