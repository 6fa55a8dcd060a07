//! Source-control host abstraction layer
//!
//! The pipeline talks to the hosting platform only through the
//! [SourceHost] trait. Implementations:
//!
//! - [github::GitHubClient]: the GitHub REST API over `reqwest`
//! - [mock::MockHost]: an in-memory host for tests
//!
//! Stages receive the host as an `Arc<dyn SourceHost>` so that concurrent
//! lookups can share one client without any global state.

pub mod github;
pub mod mock;

pub use github::{GitHubClient, RepoSlug};
pub use mock::MockHost;

use crate::domain::{Commit, PullRequest, Tag};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Parameters of a release to create
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseRequest {
    pub tag_name: String,
    pub target_commitish: String,
    pub name: String,
    pub body: String,
    pub prerelease: bool,
    pub make_latest: bool,
}

/// A release as reported back by the host
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseRecord {
    pub id: u64,
    pub html_url: String,
}

/// Operations the release pipeline needs from a source-control host.
///
/// ## Thread Safety
///
/// Implementors must be `Send + Sync`; pull request lookups are issued
/// from concurrent tasks sharing one handle.
///
/// ## Errors
///
/// Any failure of the underlying request (transport, authentication, rate
/// limiting, unexpected status) is returned as an error and is not retried.
#[async_trait]
pub trait SourceHost: Send + Sync {
    /// List one page of tags in host order (newest first on GitHub).
    ///
    /// Pages are 1-based. A page shorter than `per_page` is the last one.
    async fn list_tags(&self, page: u32, per_page: u32) -> Result<Vec<Tag>>;

    /// Resolve a ref (branch, tag or sha) to a commit
    async fn get_commit(&self, reference: &str) -> Result<Commit>;

    /// List one page of commits reachable from `head`, head first.
    ///
    /// Pages are 1-based. A page shorter than `per_page` is the last one.
    async fn list_commits(&self, head: &str, page: u32, per_page: u32) -> Result<Vec<Commit>>;

    /// List pull requests associated with a commit
    async fn list_pull_requests_for_commit(&self, sha: &str) -> Result<Vec<PullRequest>>;

    /// Create a release and its tag
    async fn create_release(&self, request: &ReleaseRequest) -> Result<ReleaseRecord>;
}
