/// Represents the branch a run was triggered on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchContext {
    pub name: String,
    pub is_release: bool,
}

impl BranchContext {
    /// Build a branch context from a git ref such as `refs/heads/main`.
    ///
    /// Plain branch names are accepted as-is.
    pub fn from_ref(git_ref: &str, release_branches: &[String]) -> Self {
        let name = git_ref.strip_prefix("refs/heads/").unwrap_or(git_ref);
        let is_release = release_branches.iter().any(|branch| branch == name);

        BranchContext {
            name: name.to_string(),
            is_release,
        }
    }

    /// Check if this is a configured release branch
    pub fn is_release_branch(&self) -> bool {
        self.is_release
    }
}
