//! Release notes rendering.

use crate::domain::PullRequestSet;

pub const INITIAL_RELEASE_HEADING: &str = "Initial release.";
pub const NO_PULL_REQUESTS: &str = "No pull requests were merged in this release.";

/// Render the release body.
///
/// The heading references the prior tag (or marks the first release),
/// followed by one `- PR #<number>: <title> by @<author>` line per pull
/// request in first-encountered order.
pub fn compose_release_body(prior_tag: Option<&str>, pull_requests: &PullRequestSet) -> String {
    let heading = match prior_tag {
        Some(tag) => format!("Changes since `{}`", tag),
        None => INITIAL_RELEASE_HEADING.to_string(),
    };

    let mut body = heading;
    body.push_str("\n\n");

    if pull_requests.is_empty() {
        body.push_str(NO_PULL_REQUESTS);
        body.push('\n');
        return body;
    }

    for pr in pull_requests.iter() {
        body.push_str(&format!(
            "- PR #{}: {} by @{}\n",
            pr.number, pr.title, pr.author
        ));
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PullRequest;

    fn prs() -> PullRequestSet {
        vec![
            PullRequest::new(10, "x", "alice"),
            PullRequest::new(11, "y", "bob"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_body_lists_pull_requests_in_order() {
        let body = compose_release_body(Some("v1.4.0"), &prs());
        assert_eq!(
            body,
            "Changes since `v1.4.0`\n\n- PR #10: x by @alice\n- PR #11: y by @bob\n"
        );
    }

    #[test]
    fn test_initial_release_heading() {
        let body = compose_release_body(None, &prs());
        assert!(body.starts_with("Initial release."));
    }

    #[test]
    fn test_fallback_when_no_pull_requests() {
        let body = compose_release_body(Some("v2.0.0"), &PullRequestSet::new());
        assert_eq!(body, format!("Changes since `v2.0.0`\n\n{}\n", NO_PULL_REQUESTS));
        assert!(!body.contains("- PR"));
    }

    #[test]
    fn test_composition_is_idempotent() {
        let set = prs();
        assert_eq!(
            compose_release_body(Some("v1.0.0"), &set),
            compose_release_body(Some("v1.0.0"), &set)
        );
    }
}
