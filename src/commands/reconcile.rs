use anyhow::Result;
use std::fmt;

use crate::error::BootstrapError;
use crate::selection::{self, Prompter};
use crate::traits::GitOperations;

/// What to do with uncommitted changes before leaving the checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Commit,
    Stash,
    Cancel,
}

impl Resolution {
    /// Menu order; the 1-based position is the choice the user types
    pub const ALL: [Resolution; 3] = [Resolution::Commit, Resolution::Stash, Resolution::Cancel];
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Commit => write!(f, "Commit changes"),
            Resolution::Stash => write!(f, "Stash changes (restored after the session)"),
            Resolution::Cancel => write!(f, "Cancel"),
        }
    }
}

/// State of the invoking checkout after reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Nothing needed doing
    Clean,
    Committed,
    /// Changes sit on the stash and must be restored after the session
    Stashed,
    Cancelled,
}

#[must_use]
pub fn default_commit_message(branch_name: &str) -> String {
    format!("WIP: save local changes before starting {}", branch_name)
}

#[must_use]
pub fn stash_message(branch_name: &str) -> String {
    format!("wug: auto-stash before {}", branch_name)
}

/// Makes sure the checkout can be left without losing local modifications
///
/// # Errors
/// Returns an error if:
/// - The choice is not one of the offered options ([`BootstrapError::Usage`])
/// - Committing or stashing fails ([`BootstrapError::ChangeResolution`])
pub fn reconcile_changes(
    git: &dyn GitOperations,
    prompter: &dyn Prompter,
    branch_name: &str,
) -> Result<ReconcileOutcome> {
    if !git.has_uncommitted_changes()? {
        return Ok(ReconcileOutcome::Clean);
    }

    println!("You have uncommitted changes. What would you like to do?");
    selection::print_menu(&Resolution::ALL.map(|r| r.to_string()));
    let answer = prompter.get_text_input(&format!("Choose [1-{}]:", Resolution::ALL.len()))?;
    let index = selection::parse_choice(&answer, Resolution::ALL.len())
        .map_err(|reason| BootstrapError::Usage(format!("Invalid choice: {}", reason)))?;

    match Resolution::ALL[index] {
        Resolution::Commit => {
            let message = prompter.get_text_input("Commit message (leave empty for default):")?;
            let message = if message.trim().is_empty() {
                default_commit_message(branch_name)
            } else {
                message.trim().to_string()
            };
            git.commit_all(&message)
                .map_err(|e| BootstrapError::ChangeResolution(format!("commit failed: {e}")))?;
            println!("✓ Changes committed: {}", message);
            Ok(ReconcileOutcome::Committed)
        }
        Resolution::Stash => {
            git.stash_save(&stash_message(branch_name))
                .map_err(|e| BootstrapError::ChangeResolution(format!("stash failed: {e}")))?;
            println!("✓ Changes stashed; they will be restored when the session ends");
            Ok(ReconcileOutcome::Stashed)
        }
        Resolution::Cancel => Ok(ReconcileOutcome::Cancelled),
    }
}
