use crate::domain::{TagPattern, VersionBump};
use crate::error::{ReleaseError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory and the user config directory
pub const CONFIG_FILE_NAME: &str = "autorelease.toml";

/// Represents the complete configuration for gh-autorelease.
///
/// Contains release branches, tag formatting, history walking limits,
/// commit classification rules, and release publication options.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default = "default_release_branches")]
    pub release_branches: Vec<String>,

    #[serde(default = "default_tag_pattern")]
    pub tag_pattern: String,

    #[serde(default = "default_initial_version")]
    pub initial_version: String,

    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub tags: TagsConfig,

    #[serde(default)]
    pub classifier: ClassifierConfig,

    #[serde(default)]
    pub release: ReleaseConfig,
}

fn default_release_branches() -> Vec<String> {
    vec!["main".to_string(), "master".to_string()]
}

fn default_tag_pattern() -> String {
    "v{version}".to_string()
}

fn default_initial_version() -> String {
    "0.1.0".to_string()
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

/// Limits for walking tag and commit listings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct HistoryConfig {
    /// Page size requested from the host (the host caps this at 100)
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Upper bound on pages requested per listing
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Upper bound on pull request lookups in flight at once
    #[serde(default = "default_max_concurrent_lookups")]
    pub max_concurrent_lookups: usize,
}

fn default_per_page() -> u32 {
    100
}

fn default_max_pages() -> u32 {
    10
}

fn default_max_concurrent_lookups() -> usize {
    8
}

impl Default for HistoryConfig {
    fn default() -> Self {
        HistoryConfig {
            per_page: default_per_page(),
            max_pages: default_max_pages(),
            max_concurrent_lookups: default_max_concurrent_lookups(),
        }
    }
}

impl HistoryConfig {
    /// Page size clamped to what the host accepts
    pub fn page_size(&self) -> u32 {
        self.per_page.clamp(1, 100)
    }

    pub fn page_limit(&self) -> u32 {
        self.max_pages.max(1)
    }

    pub fn concurrency(&self) -> usize {
        self.max_concurrent_lookups.max(1)
    }
}

/// How the latest tag is chosen among the listed tags.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TagOrdering {
    /// Newest tagged commit date wins, ties broken by listing order
    #[default]
    Created,
    /// First tag in host listing order
    Listing,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct TagsConfig {
    #[serde(default)]
    pub ordering: TagOrdering,
}

/// How a rule token is matched against a commit message.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MatcherKind {
    Prefix,
    Contains,
}

/// A single `{matcher -> severity}` entry of the classification table.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct BumpRule {
    pub matcher: MatcherKind,
    pub token: String,
    pub severity: VersionBump,
}

impl BumpRule {
    pub fn prefix(token: impl Into<String>, severity: VersionBump) -> Self {
        BumpRule {
            matcher: MatcherKind::Prefix,
            token: token.into(),
            severity,
        }
    }

    pub fn contains(token: impl Into<String>, severity: VersionBump) -> Self {
        BumpRule {
            matcher: MatcherKind::Contains,
            token: token.into(),
            severity,
        }
    }
}

/// Returns the default classification table.
fn default_rules() -> Vec<BumpRule> {
    vec![
        BumpRule::prefix("BREAKING CHANGE", VersionBump::Major),
        BumpRule::contains("BREAKING CHANGE", VersionBump::Major),
        BumpRule::prefix("feat", VersionBump::Minor),
        BumpRule::prefix("fix", VersionBump::Patch),
    ]
}

/// Configuration for commit message classification.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ClassifierConfig {
    #[serde(default = "default_rules")]
    pub rules: Vec<BumpRule>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            rules: default_rules(),
        }
    }
}

/// Options forwarded to release creation.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseConfig {
    #[serde(default)]
    pub prerelease: bool,

    #[serde(default = "default_make_latest")]
    pub make_latest: bool,

    /// Release title; `{tag}` is replaced with the new tag name
    #[serde(default = "default_name_pattern")]
    pub name_pattern: String,
}

fn default_make_latest() -> bool {
    true
}

fn default_name_pattern() -> String {
    "{tag}".to_string()
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            prerelease: false,
            make_latest: default_make_latest(),
            name_pattern: default_name_pattern(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            release_branches: default_release_branches(),
            tag_pattern: default_tag_pattern(),
            initial_version: default_initial_version(),
            api_url: default_api_url(),
            history: HistoryConfig::default(),
            tags: TagsConfig::default(),
            classifier: ClassifierConfig::default(),
            release: ReleaseConfig::default(),
        }
    }
}

impl Config {
    /// Tag pattern as a domain value
    pub fn tag_pattern(&self) -> TagPattern {
        TagPattern::new(self.tag_pattern.clone())
    }

    /// Reject settings that would only fail later in the run
    pub fn validate(&self) -> Result<()> {
        self.tag_pattern()
            .validate()
            .map_err(|e| ReleaseError::config(format!("tag_pattern: {}", e)))?;

        semver::Version::parse(&self.initial_version).map_err(|e| {
            ReleaseError::config(format!(
                "initial_version '{}' is not a semantic version: {}",
                self.initial_version, e
            ))
        })?;

        if self.release_branches.is_empty() {
            return Err(ReleaseError::config(
                "release_branches must name at least one branch",
            ));
        }

        if self.classifier.rules.iter().any(|rule| rule.token.is_empty()) {
            return Err(ReleaseError::config(
                "classifier rules must have a non-empty token",
            ));
        }

        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `autorelease.toml` in current directory
/// 3. `autorelease.toml` in user config directory
/// 4. Default configuration if no file found
///
/// The loaded configuration is validated before it is returned.
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config = match locate_config(config_path) {
        Some(path) => {
            let config_str = fs::read_to_string(&path).map_err(|e| {
                ReleaseError::config(format!("cannot read {}: {}", path.display(), e))
            })?;
            toml::from_str(&config_str).map_err(|e| {
                ReleaseError::config(format!("cannot parse {}: {}", path.display(), e))
            })?
        }
        None => Config::default(),
    };

    config.validate()?;
    Ok(config)
}

fn locate_config(config_path: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = config_path {
        return Some(PathBuf::from(path));
    }

    let local = Path::new(".").join(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .filter(|path| path.exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_page_size_is_clamped() {
        let history = HistoryConfig {
            per_page: 500,
            max_pages: 0,
            max_concurrent_lookups: 0,
        };
        assert_eq!(history.page_size(), 100);
        assert_eq!(history.page_limit(), 1);
        assert_eq!(history.concurrency(), 1);
    }

    #[test]
    fn test_invalid_initial_version_rejected() {
        let config = Config {
            initial_version: "first".to_string(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ReleaseError::Config(_))));
    }

    #[test]
    fn test_pattern_without_placeholder_rejected() {
        let config = Config {
            tag_pattern: "latest".to_string(),
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("tag_pattern"));
    }

    #[test]
    fn test_rules_deserialize() {
        let config: Config = toml::from_str(
            r#"
[[classifier.rules]]
matcher = "contains"
token = "!:"
severity = "major"
"#,
        )
        .unwrap();
        assert_eq!(
            config.classifier.rules,
            vec![BumpRule::contains("!:", VersionBump::Major)]
        );
    }
}
