//! In-memory `GitOperations` and `SessionLauncher` doubles for unit tests.

use anyhow::Result;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::traits::{GitOperations, SessionLauncher, SyncStatus};

/// Commit every `FakeGit` starts at
pub const FAKE_HEAD: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

pub struct FakeGit {
    pub workdir: PathBuf,
    pub common_dir: PathBuf,
    pub current_branch: RefCell<Option<String>>,
    pub head: RefCell<Option<String>>,
    pub branches: RefCell<Vec<String>>,
    pub config: HashMap<String, String>,
    pub remote_head: Option<String>,
    pub dirty: Cell<bool>,
    pub fail_commit: bool,
    pub fail_pull: bool,
    pub fail_stash_pop: bool,
    pub calls: RefCell<Vec<String>>,
}

impl FakeGit {
    pub fn new(workdir: &Path) -> Self {
        Self {
            workdir: workdir.to_path_buf(),
            common_dir: workdir.join(".git"),
            current_branch: RefCell::new(Some("main".to_string())),
            head: RefCell::new(Some(FAKE_HEAD.to_string())),
            branches: RefCell::new(vec!["main".to_string()]),
            config: HashMap::new(),
            remote_head: None,
            dirty: Cell::new(false),
            fail_commit: false,
            fail_pull: false,
            fail_stash_pop: false,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_branches(self, branches: &[&str]) -> Self {
        *self.branches.borrow_mut() = branches.iter().map(|b| (*b).to_string()).collect();
        self
    }

    pub fn on_branch(self, branch: Option<&str>) -> Self {
        *self.current_branch.borrow_mut() = branch.map(str::to_string);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn called(&self, prefix: &str) -> bool {
        self.calls.borrow().iter().any(|c| c.starts_with(prefix))
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

impl GitOperations for FakeGit {
    fn workdir(&self) -> Result<PathBuf> {
        Ok(self.workdir.clone())
    }

    fn common_dir(&self) -> PathBuf {
        self.common_dir.clone()
    }

    fn current_branch(&self) -> Result<Option<String>> {
        Ok(self.current_branch.borrow().clone())
    }

    fn head_commit(&self) -> Result<Option<String>> {
        Ok(self.head.borrow().clone())
    }

    fn branch_exists(&self, branch_name: &str) -> Result<bool> {
        Ok(self.branches.borrow().iter().any(|b| b == branch_name))
    }

    fn config_string(&self, key: &str) -> Result<Option<String>> {
        Ok(self.config.get(key).cloned())
    }

    fn remote_head_branch(&self, _remote: &str) -> Result<Option<String>> {
        Ok(self.remote_head.clone())
    }

    fn has_uncommitted_changes(&self) -> Result<bool> {
        Ok(self.dirty.get())
    }

    fn commit_all(&self, message: &str) -> Result<()> {
        self.record(format!("commit {}", message));
        if self.fail_commit {
            anyhow::bail!("nothing to commit");
        }
        self.dirty.set(false);
        Ok(())
    }

    fn stash_save(&self, message: &str) -> Result<()> {
        self.record(format!("stash {}", message));
        self.dirty.set(false);
        Ok(())
    }

    fn stash_pop(&self) -> Result<()> {
        self.record("stash-pop".to_string());
        if self.fail_stash_pop {
            anyhow::bail!("conflict in README.md");
        }
        self.dirty.set(true);
        Ok(())
    }

    fn checkout_branch(&self, branch_name: &str) -> Result<()> {
        self.record(format!("checkout {}", branch_name));
        *self.current_branch.borrow_mut() = Some(branch_name.to_string());
        Ok(())
    }

    fn checkout_detached(&self, commit: &str) -> Result<()> {
        self.record(format!("checkout --detach {}", commit));
        *self.current_branch.borrow_mut() = None;
        *self.head.borrow_mut() = Some(commit.to_string());
        Ok(())
    }

    fn pull(&self, remote: &str, branch_name: &str) -> Result<SyncStatus> {
        self.record(format!("pull {} {}", remote, branch_name));
        if self.fail_pull {
            anyhow::bail!("fatal: Not possible to fast-forward, aborting.");
        }
        Ok(SyncStatus::Pulled)
    }

    fn create_worktree_from(
        &self,
        branch_name: &str,
        worktree_path: &Path,
        from_ref: &str,
    ) -> Result<()> {
        self.record(format!("worktree {} {}", branch_name, from_ref));
        if self.branch_exists(branch_name)? {
            anyhow::bail!("a branch named '{}' already exists", branch_name);
        }
        std::fs::create_dir_all(worktree_path)?;
        self.branches.borrow_mut().push(branch_name.to_string());
        Ok(())
    }
}

/// Records every launch instead of spawning a process
#[derive(Default)]
pub struct RecordingLauncher {
    pub launches: RefCell<Vec<PathBuf>>,
    pub fail: bool,
}

impl SessionLauncher for RecordingLauncher {
    fn launch(&self, worktree_path: &Path, _env: &[(&str, String)]) -> Result<Option<i32>> {
        if self.fail {
            anyhow::bail!("No such file or directory");
        }
        self.launches.borrow_mut().push(worktree_path.to_path_buf());
        Ok(Some(0))
    }
}
