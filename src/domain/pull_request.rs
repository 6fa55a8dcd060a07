use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A pull request associated with one or more commits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub author: String,
}

impl PullRequest {
    pub fn new(number: u64, title: impl Into<String>, author: impl Into<String>) -> Self {
        PullRequest {
            number,
            title: title.into(),
            author: author.into(),
        }
    }
}

/// Pull requests keyed by number, in first-encountered order.
///
/// Merging is idempotent and the set of numbers does not depend on merge
/// order; the first entry seen for a number is the one kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestSet {
    entries: IndexMap<u64, PullRequest>,
}

impl PullRequestSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pull request unless its number is already present.
    /// Returns `true` when the entry was new.
    pub fn insert(&mut self, pull_request: PullRequest) -> bool {
        match self.entries.entry(pull_request.number) {
            indexmap::map::Entry::Occupied(_) => false,
            indexmap::map::Entry::Vacant(slot) => {
                slot.insert(pull_request);
                true
            }
        }
    }

    /// Merge a batch of pull requests into the set
    pub fn merge(&mut self, pull_requests: impl IntoIterator<Item = PullRequest>) {
        for pull_request in pull_requests {
            self.insert(pull_request);
        }
    }

    pub fn contains(&self, number: u64) -> bool {
        self.entries.contains_key(&number)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PullRequest> {
        self.entries.values()
    }

    pub fn into_vec(self) -> Vec<PullRequest> {
        self.entries.into_values().collect()
    }
}

impl FromIterator<PullRequest> for PullRequestSet {
    fn from_iter<I: IntoIterator<Item = PullRequest>>(iter: I) -> Self {
        let mut set = PullRequestSet::new();
        set.merge(iter);
        set
    }
}
