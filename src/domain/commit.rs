use chrono::{DateTime, Utc};

/// A commit as reported by the source-control host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub sha: String,
    pub message: String,
    /// Committer date, when the host reports one
    pub committed_at: Option<DateTime<Utc>>,
}

impl Commit {
    /// Create a new commit without a date
    pub fn new(sha: impl Into<String>, message: impl Into<String>) -> Self {
        Commit {
            sha: sha.into(),
            message: message.into(),
            committed_at: None,
        }
    }

    /// Attach a committer date
    pub fn with_date(mut self, committed_at: DateTime<Utc>) -> Self {
        self.committed_at = Some(committed_at);
        self
    }

    /// First line of the message
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    /// Seven character abbreviation of the sha
    pub fn short_sha(&self) -> &str {
        short_sha(&self.sha)
    }
}

/// Abbreviate a sha to at most seven characters
pub fn short_sha(sha: &str) -> &str {
    match sha.char_indices().nth(7) {
        Some((idx, _)) => &sha[..idx],
        None => sha,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_subject_is_first_line() {
        let commit = Commit::new("abc", "feat: add login\n\nlong body");
        assert_eq!(commit.subject(), "feat: add login");
    }

    #[test]
    fn test_subject_of_empty_message() {
        assert_eq!(Commit::new("abc", "").subject(), "");
    }

    #[test]
    fn test_short_sha() {
        assert_eq!(short_sha("0123456789abcdef"), "0123456");
        assert_eq!(short_sha("abc"), "abc");
    }

    #[test]
    fn test_with_date() {
        let date = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let commit = Commit::new("abc", "fix: x").with_date(date);
        assert_eq!(commit.committed_at, Some(date));
    }
}
