use crate::boundary::BoundaryWarning;
use crate::config::{Config, HistoryConfig};
use crate::domain::{Commit, PullRequestSet, Tag};
use crate::error::Result;
use crate::host::SourceHost;
use crate::release::batch::fan_out;
use std::sync::Arc;
use tracing::{debug, warn};

/// Commits and pull requests collected between head and the release point
#[derive(Debug, Clone, Default)]
pub struct WalkOutcome {
    /// Head first, never including the tagged commit
    pub commits: Vec<Commit>,
    pub pull_requests: PullRequestSet,
    pub warnings: Vec<BoundaryWarning>,
    /// Whether the tagged commit was found
    pub reached_tag: bool,
}

impl WalkOutcome {
    /// Commit messages in walk order
    pub fn messages(&self) -> Vec<&str> {
        self.commits.iter().map(|c| c.message.as_str()).collect()
    }
}

/// Walks history backward from head to (excluding) the tagged commit.
pub struct HistoryWalker {
    host: Arc<dyn SourceHost>,
    history: HistoryConfig,
}

impl HistoryWalker {
    pub fn new(host: Arc<dyn SourceHost>, config: &Config) -> Self {
        HistoryWalker {
            host,
            history: config.history.clone(),
        }
    }

    /// Collect commits reachable from `head` until the commit of `tag`.
    ///
    /// Commits are requested page by page; within a page, pull request
    /// lookups run concurrently and are merged back in commit order. The
    /// tagged commit is matched by exact sha. Failing to reach it within the
    /// page limit is reported as a warning, not an error.
    pub async fn walk(&self, head: &str, tag: Option<&Tag>) -> Result<WalkOutcome> {
        let per_page = self.history.page_size();
        let mut outcome = WalkOutcome::default();
        let mut exhausted = false;

        for page in 1..=self.history.page_limit() {
            let commits = self.host.list_commits(head, page, per_page).await?;
            exhausted = (commits.len() as u32) < per_page;

            let stop = tag.and_then(|t| commits.iter().position(|c| c.sha == t.commit_sha));
            let mut walked = commits;
            if let Some(idx) = stop {
                walked.truncate(idx);
            }
            debug!(page, walked = walked.len(), "commit page fetched");

            self.collect(walked, &mut outcome).await?;

            if stop.is_some() {
                outcome.reached_tag = true;
                break;
            }
            if exhausted {
                break;
            }
        }

        match tag {
            Some(tag) if !outcome.reached_tag => {
                outcome.warnings.push(BoundaryWarning::TagNotInHistory {
                    tag: tag.name.clone(),
                    commits_walked: outcome.commits.len(),
                });
            }
            Some(tag) if outcome.commits.is_empty() => {
                outcome.warnings.push(BoundaryWarning::NoNewCommits {
                    tag: tag.name.clone(),
                    head: head.to_string(),
                });
            }
            None if !exhausted => {
                outcome.warnings.push(BoundaryWarning::HistoryTruncated {
                    pages: self.history.page_limit(),
                });
            }
            _ => {}
        }

        for warning in &outcome.warnings {
            match warning {
                BoundaryWarning::TagNotInHistory { .. }
                | BoundaryWarning::HistoryTruncated { .. } => warn!(%warning, "history walk"),
                _ => {}
            }
        }

        Ok(outcome)
    }

    async fn collect(&self, walked: Vec<Commit>, outcome: &mut WalkOutcome) -> Result<()> {
        let shas: Vec<String> = walked.iter().map(|c| c.sha.clone()).collect();
        let host = Arc::clone(&self.host);
        let lookups = fan_out(shas, self.history.concurrency(), move |sha| {
            let host = Arc::clone(&host);
            async move { host.list_pull_requests_for_commit(&sha).await }
        })
        .await?;

        for (commit, lookup) in walked.into_iter().zip(lookups) {
            match lookup {
                Ok(pull_requests) => {
                    if pull_requests.is_empty() {
                        outcome.warnings.push(BoundaryWarning::NoPullRequests {
                            sha: commit.sha.clone(),
                        });
                    }
                    outcome.pull_requests.merge(pull_requests);
                }
                Err(e) => {
                    warn!(sha = %commit.sha, error = %e, "pull request lookup failed");
                    outcome.warnings.push(BoundaryWarning::PullRequestLookupFailed {
                        sha: commit.sha.clone(),
                        reason: e.to_string(),
                    });
                }
            }
            outcome.commits.push(commit);
        }
        debug!(collected = outcome.pull_requests.len(), "pull requests merged");

        Ok(())
    }
}
