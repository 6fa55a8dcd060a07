use crate::domain::{Commit, PullRequest, Tag};
use crate::error::{ReleaseError, Result};
use crate::host::{ReleaseRecord, ReleaseRequest, SourceHost};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// In-memory host with a single linear history, for tests and dry runs
/// without network access.
pub struct MockHost {
    /// Head first
    commits: Vec<Commit>,
    tags: Vec<Tag>,
    refs: HashMap<String, String>,
    pull_requests: HashMap<String, Vec<PullRequest>>,
    failing_lookups: HashSet<String>,
    lookup_delays: HashMap<String, Duration>,
    tags_error: Option<(u16, String)>,
    releases: Mutex<Vec<ReleaseRequest>>,
    lookups: AtomicUsize,
    commit_pages: AtomicUsize,
}

impl MockHost {
    /// Create a new empty mock host
    pub fn new() -> Self {
        MockHost {
            commits: Vec::new(),
            tags: Vec::new(),
            refs: HashMap::new(),
            pull_requests: HashMap::new(),
            failing_lookups: HashSet::new(),
            lookup_delays: HashMap::new(),
            tags_error: None,
            releases: Mutex::new(Vec::new()),
            lookups: AtomicUsize::new(0),
            commit_pages: AtomicUsize::new(0),
        }
    }

    /// Append a commit below the ones already added (history is built head first)
    pub fn push_commit(&mut self, commit: Commit) {
        self.commits.push(commit);
    }

    /// Add a tag; tags are listed in insertion order
    pub fn add_tag(&mut self, name: impl Into<String>, sha: impl Into<String>) {
        self.tags.push(Tag::new(name, sha));
    }

    /// Point a named ref (e.g. a branch) at a commit
    pub fn set_ref(&mut self, name: impl Into<String>, sha: impl Into<String>) {
        self.refs.insert(name.into(), sha.into());
    }

    /// Associate a pull request with a commit
    pub fn link_pull_request(&mut self, sha: impl Into<String>, pull_request: PullRequest) {
        self.pull_requests
            .entry(sha.into())
            .or_default()
            .push(pull_request);
    }

    /// Make the pull request lookup for `sha` fail
    pub fn fail_lookup(&mut self, sha: impl Into<String>) {
        self.failing_lookups.insert(sha.into());
    }

    /// Delay the pull request lookup for `sha`
    pub fn delay_lookup(&mut self, sha: impl Into<String>, delay: Duration) {
        self.lookup_delays.insert(sha.into(), delay);
    }

    /// Make tag listing fail with the given status
    pub fn fail_tag_listing(&mut self, status: u16, message: impl Into<String>) {
        self.tags_error = Some((status, message.into()));
    }

    /// Releases created so far
    pub fn releases(&self) -> Vec<ReleaseRequest> {
        self.releases
            .lock()
            .map(|releases| releases.clone())
            .unwrap_or_default()
    }

    /// Number of pull request lookups served
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Number of commit pages served
    pub fn commit_page_count(&self) -> usize {
        self.commit_pages.load(Ordering::SeqCst)
    }

    fn resolve(&self, reference: &str) -> Option<usize> {
        let sha = self
            .refs
            .get(reference)
            .or_else(|| self.refs.get(reference.trim_start_matches("refs/heads/")))
            .map(String::as_str)
            .unwrap_or(reference);
        self.commits.iter().position(|c| c.sha == sha)
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

fn page_of<T: Clone>(items: &[T], page: u32, per_page: u32) -> Vec<T> {
    let per_page = per_page.max(1) as usize;
    let start = (page.max(1) as usize - 1) * per_page;
    items.iter().skip(start).take(per_page).cloned().collect()
}

#[async_trait]
impl SourceHost for MockHost {
    async fn list_tags(&self, page: u32, per_page: u32) -> Result<Vec<Tag>> {
        if let Some((status, message)) = &self.tags_error {
            return Err(ReleaseError::api(*status, message.clone()));
        }
        Ok(page_of(&self.tags, page, per_page))
    }

    async fn get_commit(&self, reference: &str) -> Result<Commit> {
        self.resolve(reference)
            .map(|idx| self.commits[idx].clone())
            .ok_or_else(|| ReleaseError::api(404, format!("No commit found for SHA: {}", reference)))
    }

    async fn list_commits(&self, head: &str, page: u32, per_page: u32) -> Result<Vec<Commit>> {
        self.commit_pages.fetch_add(1, Ordering::SeqCst);
        let start = self
            .resolve(head)
            .ok_or_else(|| ReleaseError::api(404, format!("No commit found for SHA: {}", head)))?;
        Ok(page_of(&self.commits[start..], page, per_page))
    }

    async fn list_pull_requests_for_commit(&self, sha: &str) -> Result<Vec<PullRequest>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.lookup_delays.get(sha) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing_lookups.contains(sha) {
            return Err(ReleaseError::api(502, "Server Error"));
        }
        Ok(self.pull_requests.get(sha).cloned().unwrap_or_default())
    }

    async fn create_release(&self, request: &ReleaseRequest) -> Result<ReleaseRecord> {
        let mut releases = self
            .releases
            .lock()
            .map_err(|_| ReleaseError::Task("release log poisoned".to_string()))?;
        if releases.iter().any(|r| r.tag_name == request.tag_name) {
            return Err(ReleaseError::api(422, "Validation Failed"));
        }
        releases.push(request.clone());
        let id = releases.len() as u64;
        Ok(ReleaseRecord {
            id,
            html_url: format!(
                "https://github.com/mock/repo/releases/tag/{}",
                request.tag_name
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_history(n: usize) -> MockHost {
        let mut host = MockHost::new();
        for i in (1..=n).rev() {
            host.push_commit(Commit::new(format!("c{}", i), format!("commit {}", i)));
        }
        host.set_ref("main", format!("c{}", n));
        host
    }

    #[tokio::test]
    async fn test_list_commits_pages_from_head() {
        let host = linear_history(5);
        let first = host.list_commits("main", 1, 2).await.unwrap();
        let third = host.list_commits("main", 3, 2).await.unwrap();
        assert_eq!(
            first.iter().map(|c| c.sha.as_str()).collect::<Vec<_>>(),
            vec!["c5", "c4"]
        );
        assert_eq!(third.len(), 1);
        assert_eq!(host.commit_page_count(), 2);
    }

    #[tokio::test]
    async fn test_list_commits_from_inner_sha() {
        let host = linear_history(5);
        let commits = host.list_commits("c3", 1, 10).await.unwrap();
        assert_eq!(commits.len(), 3);
        assert_eq!(commits[0].sha, "c3");
    }

    #[tokio::test]
    async fn test_get_commit_by_branch_ref() {
        let host = linear_history(3);
        let commit = host.get_commit("refs/heads/main").await.unwrap();
        assert_eq!(commit.sha, "c3");
        assert!(host.get_commit("missing").await.is_err());
    }

    #[tokio::test]
    async fn test_create_release_rejects_duplicate_tag() {
        let host = MockHost::new();
        let request = ReleaseRequest {
            tag_name: "v1.0.0".to_string(),
            target_commitish: "c1".to_string(),
            name: "v1.0.0".to_string(),
            body: String::new(),
            prerelease: false,
            make_latest: true,
        };
        let record = host.create_release(&request).await.unwrap();
        assert_eq!(record.id, 1);
        assert!(host.create_release(&request).await.is_err());
        assert_eq!(host.releases().len(), 1);
    }

    #[tokio::test]
    async fn test_lookup_failure_and_default() {
        let mut host = linear_history(2);
        host.fail_lookup("c1");
        host.link_pull_request("c2", PullRequest::new(1, "a", "x"));
        assert_eq!(host.list_pull_requests_for_commit("c2").await.unwrap().len(), 1);
        assert!(host.list_pull_requests_for_commit("c1").await.is_err());
        assert_eq!(host.lookup_count(), 2);
    }
}
