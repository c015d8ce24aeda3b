//! # wug
//!
//! Bootstraps an isolated, branch-scoped git worktree and starts an interactive
//! session inside it.
//!
//! ## What a run does
//!
//! 1. Locates the current checkout and the main checkout, even when invoked
//!    from a secondary worktree
//! 2. Resolves an MCP configuration template, by name or interactively
//! 3. Commits or stashes uncommitted changes (or cancels)
//! 4. Switches to the default branch and fast-forwards it from the remote
//! 5. Creates `wug/<suffix>` and its worktree next to the main checkout
//! 6. Copies untracked local files (`.env`, editor tasks, credentials)
//! 7. Installs the template as `.mcp.json`
//! 8. Runs the session command in the worktree and waits for it
//! 9. Restores stashed changes in the original checkout
//!
//! ## Quick Start
//!
//! ```bash
//! # Branch wug/fix-bug in ../wug-fix-bug
//! wug fix-bug
//!
//! # Branch wug/patch-<timestamp> with the dwh MCP template installed
//! wug --mcp dwh
//!
//! # Pick the MCP template from a menu
//! wug -m
//! ```
//!
//! ## Module Structure
//!
//! - [`cli`] - Command-line surface
//! - [`commands`] - Pipeline stages and the orchestrating bootstrap command
//! - [`context`] - Locates the current and main checkouts
//! - [`branch`] - Default-branch resolution and synchronization
//! - [`storage`] - Branch naming and worktree placement
//! - [`templates`] - MCP template catalog, selection and activation
//! - [`config`] - Handles `.wug-config.toml`
//! - [`git`] - Git operations wrapper using git2 crate
//! - [`selection`] - Abstracts interactive prompts for testability
//! - [`traits`] - Defines the GitOperations and SessionLauncher seams
//! - [`error`] - Failure kinds of a bootstrap run

pub mod branch;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod git;
pub mod selection;
pub mod storage;
pub mod templates;
pub mod traits;

#[cfg(test)]
mod testing;

pub use anyhow::Result;
