use anyhow::Result;

use crate::context::RepositoryContext;
use crate::error::BootstrapError;
use crate::traits::{GitOperations, SyncStatus};

/// Git config key that pins the default branch for this tool
pub const DEFAULT_BRANCH_KEY: &str = "wug.defaultBranch";
const INIT_DEFAULT_BRANCH_KEY: &str = "init.defaultBranch";
const PRIMARY_BRANCH: &str = "main";
const SECONDARY_BRANCH: &str = "master";
const FALLBACK_BRANCH: &str = "main";

/// Determines the repository's default branch
///
/// The first rule that yields a branch wins:
/// 1. `wug.defaultBranch`, or `init.defaultBranch` when that branch exists
/// 2. a local `main` branch
/// 3. a local `master` branch
/// 4. the branch `<remote>/HEAD` points at
/// 5. `main`
///
/// # Errors
/// Returns an error if git queries fail
pub fn resolve_default_branch(git: &dyn GitOperations, remote: &str) -> Result<String> {
    if let Some(configured) = git.config_string(DEFAULT_BRANCH_KEY)? {
        return Ok(configured);
    }

    if let Some(configured) = git.config_string(INIT_DEFAULT_BRANCH_KEY)? {
        if git.branch_exists(&configured)? {
            return Ok(configured);
        }
    }

    for candidate in [PRIMARY_BRANCH, SECONDARY_BRANCH] {
        if git.branch_exists(candidate)? {
            return Ok(candidate.to_string());
        }
    }

    if let Some(remote_default) = git.remote_head_branch(remote)? {
        return Ok(remote_default);
    }

    Ok(FALLBACK_BRANCH.to_string())
}

/// What the invoking checkout had checked out when the run started
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginalHead {
    Branch(String),
    /// Detached HEAD at this commit
    Detached(String),
}

impl OriginalHead {
    /// `None` for an unborn HEAD, which has nothing to return to
    #[must_use]
    pub fn of(ctx: &RepositoryContext) -> Option<Self> {
        match (&ctx.current_branch, &ctx.head_commit) {
            (Some(branch), _) => Some(Self::Branch(branch.clone())),
            (None, Some(commit)) => Some(Self::Detached(commit.clone())),
            (None, None) => None,
        }
    }

    /// The `git checkout` invocation that returns to this HEAD
    #[must_use]
    pub fn checkout_command(&self) -> String {
        match self {
            Self::Branch(branch) => format!("git checkout {}", branch),
            Self::Detached(commit) => format!("git checkout --detach {}", commit),
        }
    }

    /// Whether the checkout is currently at this HEAD
    ///
    /// # Errors
    /// Returns an error if HEAD cannot be read
    pub fn is_current(&self, git: &dyn GitOperations) -> Result<bool> {
        let current = git.current_branch()?;
        match self {
            Self::Branch(branch) => Ok(current.as_deref() == Some(branch.as_str())),
            Self::Detached(commit) => {
                Ok(current.is_none() && git.head_commit()?.as_deref() == Some(commit.as_str()))
            }
        }
    }

    /// Checks this HEAD out again
    ///
    /// # Errors
    /// Returns the git error if the checkout is refused
    pub fn checkout(&self, git: &dyn GitOperations) -> Result<()> {
        match self {
            Self::Branch(branch) => git.checkout_branch(branch),
            Self::Detached(commit) => git.checkout_detached(commit),
        }
    }
}

impl std::fmt::Display for OriginalHead {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Branch(branch) => write!(f, "'{}'", branch),
            Self::Detached(commit) => write!(f, "detached HEAD {}", commit),
        }
    }
}

/// Result of bringing the invoking checkout onto an up-to-date default branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchSync {
    /// HEAD that was checked out before switching, if a switch happened
    pub switched_from: Option<OriginalHead>,
    pub status: SyncStatus,
}

/// Checks out the default branch and fast-forwards it from `remote`
///
/// # Errors
/// Returns [`BootstrapError::GitStateSync`] if the checkout or the pull fails.
/// A missing remote is not an error.
pub fn sync_default_branch(
    git: &dyn GitOperations,
    ctx: &RepositoryContext,
    remote: &str,
) -> Result<BranchSync> {
    let default_branch = &ctx.default_branch;
    let sync_error = |e: anyhow::Error| BootstrapError::GitStateSync {
        branch: default_branch.clone(),
        reason: e.to_string(),
    };

    let mut switched_from = None;
    if ctx.current_branch.as_deref() != Some(default_branch.as_str()) {
        println!("Switching to default branch '{}'...", default_branch);
        git.checkout_branch(default_branch).map_err(sync_error)?;
        switched_from = OriginalHead::of(ctx);
    }

    let status = git.pull(remote, default_branch).map_err(sync_error)?;
    match &status {
        SyncStatus::Pulled => println!("✓ '{}' is up to date with {}", default_branch, remote),
        SyncStatus::NoRemote(name) => {
            tracing::warn!("remote {name} not configured, skipping sync");
            eprintln!(
                "Warning: remote '{}' is not configured; skipping sync of '{}'",
                name, default_branch
            );
        }
    }

    Ok(BranchSync {
        switched_from,
        status,
    })
}

/// Moves the invoking checkout back to where the run found it
///
/// Does nothing when the checkout never left its original HEAD.
///
/// # Errors
/// Returns an error if HEAD cannot be read or the checkout is refused
pub fn return_to_original(git: &dyn GitOperations, ctx: &RepositoryContext) -> Result<()> {
    let Some(original) = OriginalHead::of(ctx) else {
        return Ok(());
    };
    if original.is_current(git)? {
        return Ok(());
    }

    println!("Switching back to {}...", original);
    original.checkout(git)
}
