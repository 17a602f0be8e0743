//! Hook commands for the external release steps
//!
//! Package upload, release publishing and similar steps stay outside this
//! tool. They are configured as shell commands run at:
//! - pre-tag: after stamping, before the tag is set
//! - post-tag: after the tag is set locally
//! - post-push: after the commit and tag reached the remote

pub mod executor;
pub mod lifecycle;

pub use executor::HookExecutor;
pub use lifecycle::{HookContext, HookType};
