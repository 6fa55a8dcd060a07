//! Domain model - pure data and rules independent of the hosting API

pub mod branch;
pub mod commit;
pub mod pull_request;
pub mod release;
pub mod tag;
pub mod version;

pub use branch::BranchContext;
pub use commit::Commit;
pub use pull_request::{PullRequest, PullRequestSet};
pub use release::ReleaseDraft;
pub use tag::{Tag, TagPattern};
pub use version::VersionBump;
