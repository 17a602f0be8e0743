//! Domain logic - pure release rules independent of git operations

pub mod branch;
pub mod commit;
pub mod tag;
pub mod version;

pub use branch::ReleaseBranch;
pub use commit::release_kind_from_message;
pub use tag::{CandidateTag, TagSet};
pub use version::{BuildVersion, ReleaseKind};
