use anyhow::Result;
use std::path::{Path, PathBuf};

/// Outcome of synchronizing the default branch with its remote counterpart
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    /// The default branch was pulled from the remote
    Pulled,
    /// The remote does not exist, so there is nothing to pull from
    NoRemote(String),
}

/// Trait for Git operations to enable mocking in tests
pub trait GitOperations {
    /// Working directory of the checkout this handle was opened from
    fn workdir(&self) -> Result<PathBuf>;
    /// Shared metadata directory (`.git` of the main checkout)
    fn common_dir(&self) -> PathBuf;
    fn current_branch(&self) -> Result<Option<String>>;
    /// Commit id HEAD points at, `None` for an unborn HEAD
    fn head_commit(&self) -> Result<Option<String>>;
    fn branch_exists(&self, branch_name: &str) -> Result<bool>;
    fn config_string(&self, key: &str) -> Result<Option<String>>;
    fn remote_head_branch(&self, remote: &str) -> Result<Option<String>>;
    /// True when tracked files differ from HEAD in the working tree or index
    fn has_uncommitted_changes(&self) -> Result<bool>;
    fn commit_all(&self, message: &str) -> Result<()>;
    fn stash_save(&self, message: &str) -> Result<()>;
    fn stash_pop(&self) -> Result<()>;
    fn checkout_branch(&self, branch_name: &str) -> Result<()>;
    fn checkout_detached(&self, commit: &str) -> Result<()>;
    fn pull(&self, remote: &str, branch_name: &str) -> Result<SyncStatus>;
    fn create_worktree_from(
        &self,
        branch_name: &str,
        worktree_path: &Path,
        from_ref: &str,
    ) -> Result<()>;
}

/// Launches the interactive session inside a worktree and waits for it
pub trait SessionLauncher {
    /// Runs the session to completion and returns its exit code, if any
    ///
    /// # Errors
    /// Returns an error if the session process could not be started
    fn launch(&self, worktree_path: &Path, env: &[(&str, String)]) -> Result<Option<i32>>;
}
