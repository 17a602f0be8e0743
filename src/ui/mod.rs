//! User interface module.
//!
//! Human-facing messages go to stderr so that stdout stays clean for the
//! values other CI steps capture (`BUILDVER=$(release-tagger resolve)`).

pub mod formatter;

pub use formatter::{
    display_boundary_warning, display_error, display_manual_push_instruction, display_outcome,
    display_status, display_success, format_outcome,
};
