use crate::domain::commit::short_sha;
use std::fmt;

/// Non-fatal anomalies met while locating the latest tag or walking history.
/// The run continues with whatever data was collected; these are reported
/// on the CI warning channel.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// A tag does not follow the tag pattern and is not a release point
    TagMismatchPattern { tag: String, pattern: String },
    /// The tagged commit was not reached within the walked pages
    TagNotInHistory { tag: String, commits_walked: usize },
    /// A walked commit has no associated pull request
    NoPullRequests { sha: String },
    /// Looking up pull requests for a commit failed
    PullRequestLookupFailed { sha: String, reason: String },
    /// A first-release walk stopped at the page limit before the root commit
    HistoryTruncated { pages: u32 },
    /// Head is the tagged commit
    NoNewCommits { tag: String, head: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::TagMismatchPattern { tag, pattern } => write!(
                f,
                "Tag '{}' does not match pattern '{}' and was ignored",
                tag, pattern
            ),
            BoundaryWarning::TagNotInHistory {
                tag,
                commits_walked,
            } => write!(
                f,
                "Commit of tag '{}' not found in the last {} commits; release notes may be incomplete",
                tag, commits_walked
            ),
            BoundaryWarning::NoPullRequests { sha } => {
                write!(f, "No pull request found for commit {}", short_sha(sha))
            }
            BoundaryWarning::PullRequestLookupFailed { sha, reason } => write!(
                f,
                "Pull request lookup failed for commit {}: {}",
                short_sha(sha),
                reason
            ),
            BoundaryWarning::HistoryTruncated { pages } => write!(
                f,
                "No previous tag and history is longer than {} page(s); older commits were not analyzed",
                pages
            ),
            BoundaryWarning::NoNewCommits { tag, head } => write!(
                f,
                "No new commits since tag '{}' (current: {})",
                tag,
                short_sha(head)
            ),
        }
    }
}
