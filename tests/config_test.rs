// tests/config_test.rs
use gh_autorelease::config::{load_config, Config, MatcherKind, TagOrdering, CONFIG_FILE_NAME};
use gh_autorelease::domain::VersionBump;
use serial_test::serial;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
#[serial]
fn test_load_default_config() {
    let config = Config::default();
    assert_eq!(config.release_branches, vec!["main", "master"]);
    assert_eq!(config.tag_pattern, "v{version}");
    assert_eq!(config.initial_version, "0.1.0");
    assert_eq!(config.api_url, "https://api.github.com");
    assert_eq!(config.tags.ordering, TagOrdering::Created);
    assert!(config.release.make_latest);
    assert!(!config.release.prerelease);
}

#[test]
#[serial]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
release_branches = ["trunk"]
tag_pattern = "release-{version}"
initial_version = "1.0.0"

[history]
per_page = 50
max_pages = 3

[tags]
ordering = "listing"

[[classifier.rules]]
matcher = "prefix"
token = "perf"
severity = "minor"

[release]
prerelease = true
name_pattern = "Release {tag}"
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path().to_str().unwrap())).unwrap();
    assert_eq!(config.release_branches, vec!["trunk"]);
    assert_eq!(config.tag_pattern, "release-{version}");
    assert_eq!(config.initial_version, "1.0.0");
    assert_eq!(config.history.per_page, 50);
    assert_eq!(config.history.max_pages, 3);
    assert_eq!(config.history.max_concurrent_lookups, 8);
    assert_eq!(config.tags.ordering, TagOrdering::Listing);
    assert_eq!(config.classifier.rules.len(), 1);
    assert_eq!(config.classifier.rules[0].matcher, MatcherKind::Prefix);
    assert_eq!(config.classifier.rules[0].severity, VersionBump::Minor);
    assert!(config.release.prerelease);
    assert_eq!(config.release.name_pattern, "Release {tag}");
}

#[test]
#[serial]
fn test_partial_file_keeps_defaults() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[history]\nmax_pages = 2\n").unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path().to_str().unwrap())).unwrap();
    assert_eq!(config.history.max_pages, 2);
    assert_eq!(config.history.per_page, 100);
    assert_eq!(config.release_branches, vec!["main", "master"]);
    assert_eq!(config.classifier.rules.len(), 4);
}

#[test]
#[serial]
fn test_invalid_tag_pattern_rejected() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"tag_pattern = \"v-latest\"\n").unwrap();
    temp_file.flush().unwrap();

    let err = load_config(Some(temp_file.path().to_str().unwrap())).unwrap_err();
    assert!(err.to_string().contains("tag_pattern"), "got: {}", err);
}

#[test]
#[serial]
fn test_invalid_initial_version_rejected() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"initial_version = \"one\"\n").unwrap();
    temp_file.flush().unwrap();

    assert!(load_config(Some(temp_file.path().to_str().unwrap())).is_err());
}

#[test]
#[serial]
fn test_missing_explicit_file_is_an_error() {
    assert!(load_config(Some("does/not/exist/autorelease.toml")).is_err());
}

#[test]
#[serial]
fn test_config_in_working_directory_is_picked_up() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        "release_branches = [\"release\"]\n",
    )
    .unwrap();

    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();
    let loaded = load_config(None);
    std::env::set_current_dir(previous).unwrap();

    assert_eq!(loaded.unwrap().release_branches, vec!["release"]);
}
