use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::branch;
use crate::templates::TEMPLATES_DIR;
use crate::traits::GitOperations;

/// Facts about the repository a bootstrap run was started in.
///
/// Built once per run and passed to every stage; no stage re-reads the
/// process environment after this exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryContext {
    /// Checkout the tool was invoked from
    pub current_root: PathBuf,
    /// Shared `.git` directory of the repository
    pub common_dir: PathBuf,
    /// Primary checkout, owner of the shared templates
    pub main_worktree_root: PathBuf,
    /// `None` for a detached HEAD
    pub current_branch: Option<String>,
    /// Commit HEAD points at, `None` before the first commit
    pub head_commit: Option<String>,
    pub default_branch: String,
}

impl RepositoryContext {
    /// Builds the context for the checkout `git` was opened in
    ///
    /// # Errors
    /// Returns an error if the repository has no working tree or git queries fail
    pub fn locate(git: &dyn GitOperations, remote: &str) -> Result<Self> {
        let current_root = git.workdir()?;
        let common_dir = git.common_dir();
        let main_worktree_root = main_worktree_root(&current_root, &common_dir);
        let current_branch = git.current_branch()?;
        let head_commit = git.head_commit()?;
        let default_branch = branch::resolve_default_branch(git, remote)?;

        tracing::debug!(
            current_root = %current_root.display(),
            main_worktree_root = %main_worktree_root.display(),
            default_branch = %default_branch,
            "located repository"
        );

        Ok(Self {
            current_root,
            common_dir,
            main_worktree_root,
            current_branch,
            head_commit,
            default_branch,
        })
    }

    #[must_use]
    pub fn is_main_checkout(&self) -> bool {
        same_path(&self.current_root, &self.main_worktree_root)
    }

    #[must_use]
    pub fn templates_dir(&self) -> PathBuf {
        self.main_worktree_root.join(TEMPLATES_DIR)
    }
}

/// Derives the primary checkout from the shared metadata directory
///
/// When `common_dir` is the checkout's own `.git`, the tool runs in the main
/// checkout. Otherwise it runs in a secondary worktree and the main checkout
/// is the directory holding the shared `.git`.
#[must_use]
pub fn main_worktree_root(current_root: &Path, common_dir: &Path) -> PathBuf {
    if same_path(common_dir, &current_root.join(".git")) {
        return current_root.to_path_buf();
    }

    match common_dir.file_name() {
        Some(name) if name == ".git" => common_dir
            .parent()
            .map_or_else(|| current_root.to_path_buf(), Path::to_path_buf),
        _ => current_root.to_path_buf(),
    }
}

// Use canonical paths to handle symlinks correctly (e.g., /var -> /private/var on macOS)
fn same_path(a: &Path, b: &Path) -> bool {
    let a = a.canonicalize().unwrap_or_else(|_| a.to_path_buf());
    let b = b.canonicalize().unwrap_or_else(|_| b.to_path_buf());
    a == b
}
