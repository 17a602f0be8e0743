//! Formatting functions for terminal output.
//!
//! Everything written for humans goes through here; machine-readable output
//! (the bare version printed by `resolve`) is written by the caller.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::cli::orchestration::ReleaseOutcome;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    eprintln!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Render the summary of a release run as lines of text.
pub fn format_outcome(outcome: &ReleaseOutcome) -> Vec<String> {
    let mut lines = vec![
        format!("Branch:   {}", outcome.branch),
        format!("Kind:     {}", outcome.version.kind()),
        format!("Version:  {}", outcome.version),
    ];

    if let Some(revision) = outcome.revision {
        lines.push(format!("Revision: {}", revision));
    }
    if !outcome.stamped.is_empty() {
        let files: Vec<String> = outcome
            .stamped
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        lines.push(format!("Stamped:  {}", files.join(", ")));
    }
    if let Some(ref notes) = outcome.notes_file {
        lines.push(format!("Notes:    {}", notes.display()));
    }

    let tag_state = match (outcome.dry_run, outcome.pushed) {
        (true, _) => "not created (dry run)",
        (false, true) => "created and pushed",
        (false, false) => "created locally",
    };
    lines.push(format!("Tag:      {} {}", outcome.version.tag_name(), tag_state));
    lines
}

/// Display the summary of a release run.
pub fn display_outcome(outcome: &ReleaseOutcome) {
    eprintln!("\n{}", style("Release summary").bold());
    for line in format_outcome(outcome) {
        eprintln!("  {}", line);
    }
}

/// Display manual push instruction for a tag.
pub fn display_manual_push_instruction(tag: &str, remote: &str) {
    eprintln!(
        "\n{} To push this tag later, run:\n  {}",
        style("→").yellow(),
        style(format!("git push --force {} refs/tags/{}", remote, tag)).cyan()
    );
}
