pub mod boundary;
pub mod changelog;
pub mod cli;
pub mod config;
pub mod domain;
pub mod env_output;
pub mod error;
pub mod git;
pub mod hooks;
pub mod resolver;
pub mod revision;
pub mod stamp;
pub mod ui;

pub use error::{ReleaseError, Result};
