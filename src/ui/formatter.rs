//! Pure formatting functions for CI log output.
//!
//! Warnings and errors are emitted as GitHub Actions workflow commands so
//! they surface as annotations on the run; everything else is a plain line.

use crate::boundary::BoundaryWarning;
use crate::domain::{PullRequestSet, ReleaseDraft, VersionBump};

/// Escape a message for use in a workflow command
pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Render `::<command>::<message>`
pub fn format_command(command: &str, message: &str) -> String {
    format!("::{}::{}", command, escape_data(message))
}

/// Print an error annotation.
pub fn display_error(message: &str) {
    println!("{}", format_command("error", message));
}

/// Print a warning annotation.
pub fn display_warning(message: &str) {
    println!("{}", format_command("warning", message));
}

/// Print an informational line.
pub fn display_info(message: &str) {
    println!("{}", message);
}

pub fn display_boundary_warning(warning: &BoundaryWarning) {
    display_warning(&warning.to_string());
}

/// Summarize the walked commits, showing at most 10 subjects.
pub fn format_commit_analysis(messages: &[&str], latest_tag: Option<&str>) -> Vec<String> {
    let mut lines = Vec::new();
    match latest_tag {
        Some(tag) => lines.push(format!("{} commit(s) since {}", messages.len(), tag)),
        None => lines.push(format!("{} commit(s) in first release", messages.len())),
    }

    for (i, message) in messages.iter().take(10).enumerate() {
        let subject = message.lines().next().unwrap_or("");
        let short: String = subject.chars().take(60).collect();
        lines.push(format!("  {}. {}", i + 1, short));
    }

    if messages.len() > 10 {
        lines.push(format!("  ... and {} more commits", messages.len() - 10));
    }
    lines
}

pub fn display_commit_analysis(messages: &[&str], latest_tag: Option<&str>) {
    for line in format_commit_analysis(messages, latest_tag) {
        display_info(&line);
    }
}

/// Describe the computed release.
pub fn format_release_summary(
    previous: Option<&str>,
    bump: VersionBump,
    draft: &ReleaseDraft,
    pull_requests: &PullRequestSet,
) -> Vec<String> {
    let transition = match previous {
        Some(old) => format!("Next version: {} -> {} ({} bump)", old, draft.version, bump),
        None => format!("Initial version: {}", draft.version),
    };
    vec![
        transition,
        format!("Target commit: {}", draft.target_ref),
        format!("Pull requests: {}", pull_requests.len()),
    ]
}

pub fn display_release_summary(
    previous: Option<&str>,
    bump: VersionBump,
    draft: &ReleaseDraft,
    pull_requests: &PullRequestSet,
) {
    for line in format_release_summary(previous, bump, draft, pull_requests) {
        display_info(&line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_data() {
        assert_eq!(escape_data("100%\r\ndone"), "100%25%0D%0Adone");
    }

    #[test]
    fn test_format_command() {
        assert_eq!(
            format_command("warning", "tag missing\nsecond line"),
            "::warning::tag missing%0Asecond line"
        );
    }

    #[test]
    fn test_commit_analysis_truncates_list() {
        let messages: Vec<String> = (0..12).map(|i| format!("fix: {}", i)).collect();
        let refs: Vec<&str> = messages.iter().map(String::as_str).collect();
        let lines = format_commit_analysis(&refs, Some("v1.0.0"));
        assert_eq!(lines[0], "12 commit(s) since v1.0.0");
        assert_eq!(lines.len(), 12);
        assert_eq!(lines.last().unwrap(), "  ... and 2 more commits");
    }

    #[test]
    fn test_commit_analysis_uses_subject_line() {
        let lines = format_commit_analysis(&["feat: x\n\nbody"], None);
        assert_eq!(lines[0], "1 commit(s) in first release");
        assert_eq!(lines[1], "  1. feat: x");
    }

    #[test]
    fn test_release_summary() {
        let draft = ReleaseDraft::new("v1.5.0", "", "c8");
        let lines = format_release_summary(
            Some("v1.4.0"),
            VersionBump::Minor,
            &draft,
            &PullRequestSet::new(),
        );
        assert_eq!(lines[0], "Next version: v1.4.0 -> v1.5.0 (minor bump)");

        let lines = format_release_summary(None, VersionBump::Patch, &draft, &PullRequestSet::new());
        assert_eq!(lines[0], "Initial version: v1.5.0");
    }
}
