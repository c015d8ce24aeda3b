use anyhow::{Context, Result};
use git2::{BranchType, IndexAddOption, Repository, StashApplyOptions, StashFlags, StatusOptions};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::BootstrapError;
use crate::traits::{GitOperations, SyncStatus};

pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Discovers the git repository enclosing the specified path
    ///
    /// # Errors
    /// Returns [`BootstrapError::NotARepository`] if no enclosing repository is found
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path).map_err(|e| {
            tracing::debug!("repository discovery failed: {e}");
            BootstrapError::NotARepository {
                path: path.to_path_buf(),
            }
        })?;
        Ok(Self { repo })
    }

    /// Returns the working directory, failing for bare repositories
    ///
    /// git2 reports it with a trailing separator; the returned path has none.
    ///
    /// # Errors
    /// Returns [`BootstrapError::NotARepository`] if the repository has no working tree
    pub fn workdir(&self) -> Result<PathBuf> {
        let workdir = self.repo.workdir().map(|dir| dir.components().collect::<PathBuf>());
        workdir.ok_or_else(|| {
            BootstrapError::NotARepository {
                path: self.repo.path().to_path_buf(),
            }
            .into()
        })
    }

    #[must_use]
    pub fn common_dir(&self) -> PathBuf {
        self.repo.commondir().to_path_buf()
    }

    /// Name of the checked-out branch, `None` for a detached or unborn HEAD
    ///
    /// # Errors
    /// Returns an error if HEAD cannot be read
    pub fn current_branch(&self) -> Result<Option<String>> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(e)
                if e.code() == git2::ErrorCode::UnbornBranch
                    || e.code() == git2::ErrorCode::NotFound =>
            {
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        if head.is_branch() {
            Ok(head.shorthand().map(str::to_string))
        } else {
            Ok(None)
        }
    }

    /// Commit id HEAD points at, `None` for an unborn HEAD
    ///
    /// # Errors
    /// Returns an error if HEAD cannot be resolved to a commit
    pub fn head_commit(&self) -> Result<Option<String>> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?.id().to_string())),
            Err(e)
                if e.code() == git2::ErrorCode::UnbornBranch
                    || e.code() == git2::ErrorCode::NotFound =>
            {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Checks if a local branch exists in the repository
    ///
    /// # Errors
    /// Returns an error if git operations fail
    pub fn branch_exists(&self, branch_name: &str) -> Result<bool> {
        match self.repo.find_branch(branch_name, BranchType::Local) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Reads a string value from the effective git configuration
    ///
    /// # Errors
    /// Returns an error if the configuration cannot be opened
    pub fn config_string(&self, key: &str) -> Result<Option<String>> {
        let config = self
            .repo
            .config()
            .context("Failed to get repository config")?;
        match config.get_string(key) {
            Ok(value) if value.trim().is_empty() => Ok(None),
            Ok(value) => Ok(Some(value.trim().to_string())),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Branch that `refs/remotes/<remote>/HEAD` points at
    ///
    /// # Errors
    /// Returns an error if git operations fail
    pub fn remote_head_branch(&self, remote: &str) -> Result<Option<String>> {
        let head_ref = format!("refs/remotes/{}/HEAD", remote);
        let reference = match self.repo.find_reference(&head_ref) {
            Ok(reference) => reference,
            Err(e) if e.code() == git2::ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let prefix = format!("refs/remotes/{}/", remote);
        Ok(reference
            .symbolic_target()
            .and_then(|target| target.strip_prefix(&prefix))
            .filter(|branch| !branch.is_empty())
            .map(str::to_string))
    }

    /// Reports whether tracked files carry uncommitted modifications
    ///
    /// Untracked files are not considered local changes.
    ///
    /// # Errors
    /// Returns an error if the status cannot be computed
    pub fn has_uncommitted_changes(&self) -> Result<bool> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(false)
            .include_ignored(false)
            .exclude_submodules(true);

        let statuses = self
            .repo
            .statuses(Some(&mut opts))
            .context("Failed to read working tree status")?;

        Ok(statuses.iter().any(|entry| {
            let status = entry.status();
            !status.is_empty() && !status.is_ignored() && !status.is_wt_new()
        }))
    }

    /// Stages every change and commits it on the current branch
    ///
    /// # Errors
    /// Returns an error if:
    /// - The index cannot be updated or written
    /// - No committer identity is configured
    /// - Creating the commit fails
    pub fn commit_all(&self, message: &str) -> Result<()> {
        let mut index = self.repo.index().context("Failed to open index")?;
        index.add_all(["*"], IndexAddOption::DEFAULT, None)?;
        index.update_all(["*"], None)?;
        index.write()?;

        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let signature = self
            .repo
            .signature()
            .context("No committer identity configured (user.name / user.email)")?;

        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => None,
            Err(e) => return Err(e.into()),
        };
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;
        Ok(())
    }

    /// Moves tracked modifications onto the stash
    ///
    /// # Errors
    /// Returns an error if no committer identity is configured or stashing fails
    pub fn stash_save(&self, message: &str) -> Result<()> {
        let mut repo = self.reopen()?;
        let signature = repo
            .signature()
            .context("No committer identity configured (user.name / user.email)")?;
        repo.stash_save(&signature, message, Some(StashFlags::DEFAULT))?;
        Ok(())
    }

    /// Re-applies the most recent stash entry and drops it on success
    ///
    /// A failed apply leaves the entry on the stash list.
    ///
    /// # Errors
    /// Returns an error if the stash cannot be applied cleanly
    pub fn stash_pop(&self) -> Result<()> {
        let mut repo = self.reopen()?;
        let mut opts = StashApplyOptions::new();
        repo.stash_pop(0, Some(&mut opts))?;
        Ok(())
    }

    /// Switches this checkout to another local branch
    ///
    /// # Errors
    /// Returns the git error output verbatim if the checkout is refused
    pub fn checkout_branch(&self, branch_name: &str) -> Result<()> {
        self.run_command(&["checkout", branch_name])?;
        Ok(())
    }

    /// Detaches this checkout's HEAD at `commit`
    ///
    /// # Errors
    /// Returns the git error output verbatim if the checkout is refused
    pub fn checkout_detached(&self, commit: &str) -> Result<()> {
        self.run_command(&["checkout", "--detach", commit])?;
        Ok(())
    }

    /// Fast-forwards `branch_name` from `remote`
    ///
    /// # Errors
    /// Returns the git error output verbatim if the pull fails
    pub fn pull(&self, remote: &str, branch_name: &str) -> Result<SyncStatus> {
        match self.repo.find_remote(remote) {
            Ok(_) => {}
            Err(e) if e.code() == git2::ErrorCode::NotFound => {
                return Ok(SyncStatus::NoRemote(remote.to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        self.run_command(&["pull", "--ff-only", remote, branch_name])?;
        Ok(SyncStatus::Pulled)
    }

    /// Creates `branch_name` from `from_ref` and checks it out in a new worktree
    ///
    /// Branch and worktree are created together: if the worktree cannot be
    /// added, the freshly created branch is deleted again.
    ///
    /// # Errors
    /// Returns an error if:
    /// - `from_ref` cannot be resolved to a commit
    /// - The branch already exists
    /// - The worktree path is already taken
    pub fn create_worktree_from(
        &self,
        branch_name: &str,
        worktree_path: &Path,
        from_ref: &str,
    ) -> Result<()> {
        if worktree_path.exists() {
            anyhow::bail!("'{}' already exists", worktree_path.display());
        }

        let target_commit = self.resolve_reference(from_ref)?;
        let mut branch = self.repo.branch(branch_name, &target_commit, false)?;

        // Use the directory name as the worktree name to avoid filesystem conflicts
        let worktree_name = worktree_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(branch_name);

        let mut opts = git2::WorktreeAddOptions::new();
        opts.reference(Some(branch.get()));

        if let Err(e) = self.repo.worktree(worktree_name, worktree_path, Some(&opts)) {
            drop(opts);
            if let Err(delete_err) = branch.delete() {
                tracing::warn!("failed to delete branch {branch_name} after worktree error: {delete_err}");
            }
            return Err(e.into());
        }

        Ok(())
    }

    /// Resolves a git reference (branch, tag, commit) to a commit object
    ///
    /// # Errors
    /// Returns an error if:
    /// - The reference cannot be found
    /// - The reference cannot be resolved to a commit
    pub fn resolve_reference(&self, reference: &str) -> Result<git2::Commit<'_>> {
        let obj = self
            .repo
            .revparse_single(reference)
            .with_context(|| format!("Failed to resolve reference '{}'", reference))?;
        obj.peel_to_commit()
            .with_context(|| format!("Reference '{}' does not point to a commit", reference))
    }

    fn reopen(&self) -> Result<Repository> {
        let workdir = self.workdir()?;
        Repository::open(&workdir)
            .with_context(|| format!("Failed to open repository at {}", workdir.display()))
    }

    /// Runs a git command in this checkout, returning stdout
    fn run_command(&self, args: &[&str]) -> Result<String> {
        let workdir = self.workdir()?;
        tracing::debug!("running git {} in {}", args.join(" "), workdir.display());

        let output = Command::new("git")
            .args(args)
            .current_dir(&workdir)
            .output()
            .context("Failed to execute git")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("{}", stderr.trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl GitOperations for GitRepo {
    fn workdir(&self) -> Result<PathBuf> {
        self.workdir()
    }

    fn common_dir(&self) -> PathBuf {
        self.common_dir()
    }

    fn current_branch(&self) -> Result<Option<String>> {
        self.current_branch()
    }

    fn head_commit(&self) -> Result<Option<String>> {
        self.head_commit()
    }

    fn branch_exists(&self, branch_name: &str) -> Result<bool> {
        self.branch_exists(branch_name)
    }

    fn config_string(&self, key: &str) -> Result<Option<String>> {
        self.config_string(key)
    }

    fn remote_head_branch(&self, remote: &str) -> Result<Option<String>> {
        self.remote_head_branch(remote)
    }

    fn has_uncommitted_changes(&self) -> Result<bool> {
        self.has_uncommitted_changes()
    }

    fn commit_all(&self, message: &str) -> Result<()> {
        self.commit_all(message)
    }

    fn stash_save(&self, message: &str) -> Result<()> {
        self.stash_save(message)
    }

    fn stash_pop(&self) -> Result<()> {
        self.stash_pop()
    }

    fn checkout_branch(&self, branch_name: &str) -> Result<()> {
        self.checkout_branch(branch_name)
    }

    fn checkout_detached(&self, commit: &str) -> Result<()> {
        self.checkout_detached(commit)
    }

    fn pull(&self, remote: &str, branch_name: &str) -> Result<SyncStatus> {
        self.pull(remote, branch_name)
    }

    fn create_worktree_from(
        &self,
        branch_name: &str,
        worktree_path: &Path,
        from_ref: &str,
    ) -> Result<()> {
        self.create_worktree_from(branch_name, worktree_path, from_ref)
    }
}
