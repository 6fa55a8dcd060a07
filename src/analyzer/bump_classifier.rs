use crate::config::{BumpRule, ClassifierConfig, MatcherKind};
use crate::domain::VersionBump;

/// Classifies commit messages with an ordered `{matcher -> severity}` table.
///
/// Every message is checked against every rule and the highest severity
/// found anywhere in the sequence wins. Messages matching no rule leave the
/// result untouched, so an empty or unrecognized sequence yields `Patch`.
#[derive(Debug, Clone)]
pub struct BumpClassifier {
    rules: Vec<BumpRule>,
}

impl BumpClassifier {
    /// Create a classifier from configuration
    pub fn new(config: &ClassifierConfig) -> Self {
        BumpClassifier {
            rules: config.rules.clone(),
        }
    }

    /// Create a classifier from an explicit rule table
    pub fn with_rules(rules: Vec<BumpRule>) -> Self {
        BumpClassifier { rules }
    }

    /// Highest severity any rule assigns to `message`, if any rule matches
    pub fn classify_message(&self, message: &str) -> Option<VersionBump> {
        self.rules
            .iter()
            .filter(|rule| rule_matches(rule, message))
            .map(|rule| rule.severity)
            .max()
    }

    /// Fold the whole sequence with "highest severity wins"
    pub fn classify<S: AsRef<str>>(&self, messages: &[S]) -> VersionBump {
        messages
            .iter()
            .filter_map(|message| self.classify_message(message.as_ref()))
            .fold(VersionBump::default(), VersionBump::max)
    }
}

impl Default for BumpClassifier {
    fn default() -> Self {
        BumpClassifier::new(&ClassifierConfig::default())
    }
}

fn rule_matches(rule: &BumpRule, message: &str) -> bool {
    match rule.matcher {
        MatcherKind::Prefix => message.starts_with(&rule.token),
        MatcherKind::Contains => message.contains(&rule.token),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(messages: &[&str]) -> VersionBump {
        BumpClassifier::default().classify(messages)
    }

    #[test]
    fn test_classify_major_via_footer() {
        assert_eq!(
            classify(&["fix: rename field\n\nBREAKING CHANGE: field renamed"]),
            VersionBump::Major
        );
    }

    #[test]
    fn test_classify_major_via_prefix() {
        assert_eq!(
            classify(&["BREAKING CHANGE: drop v1 api"]),
            VersionBump::Major
        );
    }

    #[test]
    fn test_breaking_anywhere_in_sequence_wins() {
        assert_eq!(
            classify(&["feat: a", "fix: b", "chore: c BREAKING CHANGE here", "feat: d"]),
            VersionBump::Major
        );
    }

    #[test]
    fn test_later_commit_escalates() {
        assert_eq!(
            classify(&["fix: a", "fix: b", "feat: c"]),
            VersionBump::Minor
        );
    }

    #[test]
    fn test_fix_never_downgrades() {
        assert_eq!(classify(&["feat: a", "fix: b"]), VersionBump::Minor);
    }

    #[test]
    fn test_classify_patch_only_fixes() {
        assert_eq!(classify(&["fix: a", "fix(ui): b"]), VersionBump::Patch);
    }

    #[test]
    fn test_unrecognized_types_default_to_patch() {
        assert_eq!(
            classify(&["chore: bump deps", "docs: readme", "refactor: x", "Merge branch"]),
            VersionBump::Patch
        );
    }

    #[test]
    fn test_empty_sequence_defaults_to_patch() {
        assert_eq!(classify(&[]), VersionBump::Patch);
    }

    #[test]
    fn test_match_is_case_sensitive_literal() {
        // "Feat" and lowercase "breaking change" are not the literal tokens
        assert_eq!(
            classify(&["Feat: x", "fix: breaking change in parser"]),
            VersionBump::Patch
        );
    }

    #[test]
    fn test_custom_rule_table() {
        let classifier = BumpClassifier::with_rules(vec![
            BumpRule::contains("!:", VersionBump::Major),
            BumpRule::prefix("perf", VersionBump::Minor),
        ]);
        assert_eq!(classifier.classify(&["perf: faster"]), VersionBump::Minor);
        assert_eq!(classifier.classify(&["feat!: new api"]), VersionBump::Major);
        assert_eq!(classifier.classify(&["feat: ignored"]), VersionBump::Patch);
    }

    #[test]
    fn test_classify_message_reports_no_match() {
        let classifier = BumpClassifier::default();
        assert_eq!(classifier.classify_message("chore: z"), None);
        assert_eq!(
            classifier.classify_message("feat: x"),
            Some(VersionBump::Minor)
        );
    }

    #[test]
    fn test_accepts_owned_strings() {
        let messages = vec!["feat: x".to_string(), "fix: y".to_string()];
        assert_eq!(BumpClassifier::default().classify(&messages), VersionBump::Minor);
    }
}
