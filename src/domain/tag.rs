use crate::error::{ReleaseError, Result};
use regex::Regex;

/// A published release point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub commit_sha: String,
}

impl Tag {
    /// Create a new tag pointing at a commit
    pub fn new(name: impl Into<String>, commit_sha: impl Into<String>) -> Self {
        Tag {
            name: name.into(),
            commit_sha: commit_sha.into(),
        }
    }
}

/// Tag naming pattern (e.g., "v{version}", "release-{version}")
#[derive(Debug, Clone)]
pub struct TagPattern {
    pub pattern: String,
}

impl TagPattern {
    /// Create a new tag pattern
    pub fn new(pattern: impl Into<String>) -> Self {
        TagPattern {
            pattern: pattern.into(),
        }
    }

    /// Check that the pattern carries exactly one `{version}` placeholder
    pub fn validate(&self) -> Result<()> {
        match self.pattern.matches("{version}").count() {
            1 => Ok(()),
            0 => Err(ReleaseError::tag(
                "Pattern must contain {version} placeholder",
            )),
            _ => Err(ReleaseError::tag(
                "Pattern must contain a single {version} placeholder",
            )),
        }
    }

    /// Format a version according to pattern
    /// Example: pattern="v{version}", version="1.2.3" -> "v1.2.3"
    pub fn format(&self, version: &str) -> String {
        self.pattern.replace("{version}", version)
    }

    /// Extract the version part of a tag name, or `None` if the tag does
    /// not follow the pattern. The extracted text is not validated.
    pub fn extract_version(&self, tag: &str) -> Option<String> {
        let re = self.regex(r"(.+)")?;
        re.captures(tag)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Whether `tag` follows the pattern and carries a full semantic
    /// version (`v1` or `nightly` do not)
    pub fn matches(&self, tag: &str) -> bool {
        self.extract_version(tag)
            .is_some_and(|version| semver::Version::parse(&version).is_ok())
    }

    fn regex(&self, version_group: &str) -> Option<Regex> {
        let escaped = regex::escape(&self.pattern);
        let regex_pattern = escaped.replace(r"\{version\}", version_group);
        Regex::new(&format!("^{}$", regex_pattern)).ok()
    }
}
