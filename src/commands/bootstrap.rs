use anyhow::Result;
use chrono::Utc;
use std::path::PathBuf;

use crate::branch;
use crate::commands::propagate::{self, CopyReport};
use crate::commands::reconcile::{self, ReconcileOutcome};
use crate::commands::session::{self, ProcessLauncher};
use crate::config::BootstrapConfig;
use crate::context::{self, RepositoryContext};
use crate::error::BootstrapError;
use crate::git::GitRepo;
use crate::selection::{Prompter, RealPrompter};
use crate::storage::{self, WorktreeRecord};
use crate::templates;
use crate::traits::{GitOperations, SessionLauncher};

/// What the user asked for on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapRequest {
    /// `None` means a timestamp-derived suffix
    pub branch_suffix: Option<String>,
    pub mcp_template_name: Option<String>,
    pub interactive_template_selection: bool,
}

impl BootstrapRequest {
    #[must_use]
    pub fn effective_suffix(&self) -> String {
        self.branch_suffix
            .clone()
            .unwrap_or_else(|| storage::timestamp_suffix(Utc::now()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    Completed(BootstrapSummary),
    /// The user chose to cancel at the change-resolution prompt
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapSummary {
    pub worktree: WorktreeRecord,
    pub copied: CopyReport,
    pub installed_template: Option<PathBuf>,
    pub session_exit_code: Option<i32>,
    /// `Some(restored)` when changes had been stashed
    pub stash_restored: Option<bool>,
}

/// Bootstraps a worktree session for the repository enclosing the current directory
///
/// # Errors
/// Returns an error if:
/// - The current directory is not inside a git repository
/// - Template resolution or selection fails
/// - Committing or stashing local changes fails
/// - Synchronizing the default branch fails
/// - Creating the branch or worktree fails
pub fn run(request: &BootstrapRequest) -> Result<BootstrapOutcome> {
    let current_dir = std::env::current_dir()?;
    let git_repo = GitRepo::open(&current_dir)?;
    let main_root = context::main_worktree_root(&git_repo.workdir()?, &git_repo.common_dir());
    let config = BootstrapConfig::load_from_repo(&main_root)?;
    let launcher = ProcessLauncher::from_config(&config.session);

    bootstrap_with(&git_repo, request, &config, &RealPrompter, &launcher)
}

/// Runs the full pipeline against the given collaborators
///
/// # Errors
/// See [`run`]
pub fn bootstrap_with(
    git: &dyn GitOperations,
    request: &BootstrapRequest,
    config: &BootstrapConfig,
    prompter: &dyn Prompter,
    launcher: &dyn SessionLauncher,
) -> Result<BootstrapOutcome> {
    let ctx = RepositoryContext::locate(git, &config.sync.remote)?;
    let record = WorktreeRecord::new(&ctx.main_worktree_root, &request.effective_suffix());

    let template = templates::resolve(
        &ctx.templates_dir(),
        request.mcp_template_name.as_deref(),
        request.interactive_template_selection,
        prompter,
    )?;

    let reconciled = reconcile::reconcile_changes(git, prompter, &record.branch_name)?;
    if reconciled == ReconcileOutcome::Cancelled {
        return Ok(BootstrapOutcome::Cancelled);
    }
    let stashed = reconciled == ReconcileOutcome::Stashed;

    let provisioned = provision(git, &ctx, config, &record, template.as_ref());
    let (sync, copied, installed_template) = match provisioned {
        Ok(done) => done,
        Err(e) => {
            recover_checkout(git, &ctx, stashed);
            return Err(e);
        }
    };

    println!("✓ Worktree ready!");
    println!("  Branch: {}", record.branch_name);
    println!("  Path: {}", record.path.display());

    let env = [
        ("WUG_WORKTREE", record.path.display().to_string()),
        ("WUG_BRANCH", record.branch_name.clone()),
        ("WUG_ORIGIN", ctx.current_root.display().to_string()),
    ];
    let session_exit_code = session::run_session(launcher, &record.path, &env);

    let stash_restored = if stashed {
        let original = sync.switched_from.as_ref();
        let result = session::restore_stash(git, original);
        Some(session::report_stash_restore(&result, &ctx.current_root, original))
    } else {
        None
    };

    Ok(BootstrapOutcome::Completed(BootstrapSummary {
        worktree: record,
        copied,
        installed_template,
        session_exit_code,
        stash_restored,
    }))
}

/// Returns a failed run's checkout to its original HEAD and explains any stash left behind
fn recover_checkout(git: &dyn GitOperations, ctx: &RepositoryContext, stashed: bool) {
    let pending_checkout = match branch::return_to_original(git, ctx) {
        Ok(()) => None,
        Err(e) => {
            tracing::warn!("could not return to the original HEAD: {e:#}");
            eprintln!("Warning: could not switch back: {:#}", e);
            branch::OriginalHead::of(ctx)
        }
    };

    if stashed {
        eprintln!("Note: your local changes are still stashed. Recover them with:");
        eprintln!(
            "  {}",
            session::stash_recovery_command(&ctx.current_root, pending_checkout.as_ref())
        );
    }
}

/// Stages between reconciliation and the session: sync, create, populate
fn provision(
    git: &dyn GitOperations,
    ctx: &RepositoryContext,
    config: &BootstrapConfig,
    record: &WorktreeRecord,
    template: Option<&templates::Template>,
) -> Result<(branch::BranchSync, CopyReport, Option<PathBuf>)> {
    let sync = branch::sync_default_branch(git, ctx, &config.sync.remote)?;

    println!(
        "Creating worktree for branch '{}' at: {}",
        record.branch_name,
        record.path.display()
    );
    git.create_worktree_from(&record.branch_name, &record.path, &ctx.default_branch)
        .map_err(|e| BootstrapError::Provision(e.to_string()))?;

    let copied = propagate::propagate_manifest(&ctx.current_root, &record.path)?;
    let installed_template = template
        .map(|template| templates::activate(template, &record.path))
        .transpose()?;

    Ok((sync, copied, installed_template))
}
