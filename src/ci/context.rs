use crate::config::Config;
use crate::domain::BranchContext;
use crate::error::Result;
use crate::host::{GitHubClient, RepoSlug};
use std::fmt;

/// What triggered the run and where it runs.
#[derive(Clone, PartialEq, Eq)]
pub struct RunContext {
    /// Trigger event name (`push`, `pull_request`, `workflow_dispatch`, ...)
    pub event_name: String,
    /// Ref that triggered the run (e.g. `refs/heads/main`)
    pub git_ref: String,
    /// Commit that triggered the run, when known
    pub sha: Option<String>,
    pub repository: RepoSlug,
    /// API token; requests are anonymous without one
    pub token: Option<String>,
}

impl fmt::Debug for RunContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunContext")
            .field("event_name", &self.event_name)
            .field("git_ref", &self.git_ref)
            .field("sha", &self.sha)
            .field("repository", &self.repository)
            .field(
                "token",
                &self.token.as_ref().map(|t| "*".repeat(t.len())),
            )
            .finish()
    }
}

impl RunContext {
    pub fn is_push(&self) -> bool {
        self.event_name == "push"
    }

    pub fn branch(&self, config: &Config) -> BranchContext {
        BranchContext::from_ref(&self.git_ref, &config.release_branches)
    }

    /// Ref the history walk starts from: the triggering sha when known,
    /// otherwise the branch name
    pub fn head_ref(&self) -> &str {
        match self.sha.as_deref().filter(|s| !s.is_empty()) {
            Some(sha) => sha,
            None => self
                .git_ref
                .strip_prefix("refs/heads/")
                .unwrap_or(&self.git_ref),
        }
    }

    /// Client for the run's repository, authenticated with the run's token
    pub fn github_client(&self, api_url: &str) -> Result<GitHubClient> {
        GitHubClient::new(api_url, self.repository.clone(), self.token.as_deref())
    }

    /// Publication happens only for pushes to a release branch
    pub fn should_publish(&self, config: &Config) -> bool {
        self.is_push() && self.branch(config).is_release_branch()
    }
}
