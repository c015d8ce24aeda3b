use std::path::PathBuf;
use thiserror::Error;

/// Failure kinds surfaced by a bootstrap run.
///
/// Everything except [`BootstrapError::StashRestore`] aborts the remaining
/// pipeline. Stages return `anyhow::Result` and callers recover the kind with
/// `downcast_ref::<BootstrapError>()`.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("{0}")]
    Usage(String),

    #[error("Not inside a git repository: {path}")]
    NotARepository { path: PathBuf },

    #[error("No MCP templates found in {}", dir.display())]
    NoTemplatesFound { dir: PathBuf },

    #[error("MCP template '{name}' not found{}", available_hint(available))]
    TemplateNotFound { name: String, available: Vec<String> },

    #[error("Invalid selection: {0}")]
    Selection(String),

    #[error("Failed to set local changes aside: {0}")]
    ChangeResolution(String),

    #[error("Failed to synchronize default branch '{branch}': {reason}")]
    GitStateSync { branch: String, reason: String },

    #[error("Failed to create worktree: {0}")]
    Provision(String),

    #[error("Failed to restore stashed changes: {0}")]
    StashRestore(String),
}

fn available_hint(available: &[String]) -> String {
    if available.is_empty() {
        String::new()
    } else {
        format!(" (available: {})", available.join(", "))
    }
}
