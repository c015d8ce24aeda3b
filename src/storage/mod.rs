use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Namespace every bootstrapped branch lives under
pub const BRANCH_PREFIX: &str = "wug/";

/// Where a bootstrapped worktree lives and which branch it checks out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorktreeRecord {
    pub branch_name: String,
    pub directory_name: String,
    pub path: PathBuf,
}

impl WorktreeRecord {
    /// Computes the branch, directory and placement for `branch_suffix`
    ///
    /// Worktrees are placed next to the main checkout so that every worktree
    /// of a repository ends up in the same parent directory.
    #[must_use]
    pub fn new(main_worktree_root: &Path, branch_suffix: &str) -> Self {
        let branch_name = format!("{}{}", BRANCH_PREFIX, branch_suffix);
        let directory_name = sanitize_branch_name(&branch_name);
        let parent = main_worktree_root.parent().unwrap_or(main_worktree_root);
        let path = parent.join(&directory_name);

        Self {
            branch_name,
            directory_name,
            path,
        }
    }
}

/// Replaces path separators so a branch name maps to a single directory
#[must_use]
pub fn sanitize_branch_name(branch_name: &str) -> String {
    branch_name.replace(['/', '\\'], "-")
}

/// Suffix used when none was given on the command line
#[must_use]
pub fn timestamp_suffix(now: DateTime<Utc>) -> String {
    format!("patch-{}", now.timestamp())
}
