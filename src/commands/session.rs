use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

use crate::branch::OriginalHead;
use crate::config::SessionConfig;
use crate::error::BootstrapError;
use crate::traits::{GitOperations, SessionLauncher};

/// Starts the configured session command as a child process
pub struct ProcessLauncher {
    command: String,
    args: Vec<String>,
}

impl ProcessLauncher {
    #[must_use]
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            command: config.command.clone(),
            args: config.args.clone(),
        }
    }
}

impl SessionLauncher for ProcessLauncher {
    fn launch(&self, worktree_path: &Path, env: &[(&str, String)]) -> Result<Option<i32>> {
        tracing::debug!("launching {} {:?} in {}", self.command, self.args, worktree_path.display());

        let mut cmd = Command::new(&self.command);
        cmd.args(&self.args).current_dir(worktree_path);
        for (key, value) in env {
            cmd.env(key, value);
        }

        let status = cmd
            .status()
            .with_context(|| format!("Failed to start session command '{}'", self.command))?;
        Ok(status.code())
    }
}

/// Runs the session and waits for it; its outcome never fails the bootstrap
pub fn run_session(
    launcher: &dyn SessionLauncher,
    worktree_path: &Path,
    env: &[(&str, String)],
) -> Option<i32> {
    println!();
    println!("Starting session in {}", worktree_path.display());

    match launcher.launch(worktree_path, env) {
        Ok(code) => {
            tracing::info!("session exited with {:?}", code);
            code
        }
        Err(e) => {
            tracing::warn!("session launch failed: {e:#}");
            eprintln!("Warning: {:#}", e);
            None
        }
    }
}

/// Puts stashed changes back into the invoking checkout
///
/// Returns to `original` first when the run had moved the checkout to the
/// default branch. Never drops the stash on failure.
///
/// # Errors
/// Returns [`BootstrapError::StashRestore`] if the checkout or the stash pop fails
pub fn restore_stash(
    git: &dyn GitOperations,
    original: Option<&OriginalHead>,
) -> Result<(), BootstrapError> {
    println!("Restoring stashed changes...");

    if let Some(head) = original {
        head.checkout(git).map_err(|e| {
            BootstrapError::StashRestore(format!("could not switch back to {head}: {e}"))
        })?;
    }

    git.stash_pop()
        .map_err(|e| BootstrapError::StashRestore(e.to_string()))
}

/// Shell command that recovers stashed changes by hand
///
/// `pending_checkout` is the HEAD the checkout must return to before popping.
#[must_use]
pub fn stash_recovery_command(
    checkout: &Path,
    pending_checkout: Option<&OriginalHead>,
) -> String {
    let mut steps = vec![format!("cd {}", checkout.display())];
    if let Some(head) = pending_checkout {
        steps.push(head.checkout_command());
    }
    steps.push("git stash pop".to_string());
    steps.join(" && ")
}

/// Prints the outcome of [`restore_stash`] with recovery instructions on failure
#[must_use]
pub fn report_stash_restore(
    result: &Result<(), BootstrapError>,
    checkout: &Path,
    original: Option<&OriginalHead>,
) -> bool {
    match result {
        Ok(()) => {
            println!("✓ Stashed changes restored");
            true
        }
        Err(e) => {
            tracing::warn!("stash restore failed: {e}");
            eprintln!("Warning: {}", e);
            eprintln!("  Your changes are still in the stash. To recover them, run:");
            eprintln!("    {}", stash_recovery_command(checkout, original));
            false
        }
    }
}
