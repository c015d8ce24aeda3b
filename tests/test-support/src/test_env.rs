use anyhow::{Context, Result};
use assert_fs::TempDir;
use assert_fs::prelude::*;

use std::process::Command;

/// Session command used by CLI tests so no real interactive tool is started
pub const TEST_SESSION_COMMAND: &str = "true";

/// Test environment with a real git repository, a bare `origin` it tracks,
/// and room next to it for the worktrees the tool creates
pub struct CliTestEnvironment {
    pub root: assert_fs::fixture::ChildPath,
    pub repo_dir: assert_fs::fixture::ChildPath,
    pub origin_dir: assert_fs::fixture::ChildPath,
    _temp_dir: TempDir, // Keep temp_dir private to ensure cleanup, but don't expose it
}

impl CliTestEnvironment {
    /// Creates a `project` checkout on `main` pushed to a bare `origin.git`
    ///
    /// # Errors
    /// Returns an error if:
    /// - Failed to create temporary directory
    /// - Failed to initialize either git repository
    /// - Failed to configure git settings
    /// - Failed to create or push the initial commit
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new().context("Failed to create temporary directory")?;
        let root = temp_dir.child("work");
        let repo_dir = root.child("project");
        let origin_dir = temp_dir.child("origin.git");

        repo_dir.create_dir_all()?;
        origin_dir.create_dir_all()?;

        Self::run_git_command(origin_dir.path(), &["init", "--bare", "--initial-branch=main"])?;

        Self::run_git_command(repo_dir.path(), &["init"])?;
        Self::run_git_command(repo_dir.path(), &["config", "user.name", "Test User"])?;
        Self::run_git_command(repo_dir.path(), &["config", "user.email", "test@example.com"])?;

        repo_dir.child("README.md").write_str("# Test Repo")?;
        Self::run_git_command(repo_dir.path(), &["add", "."])?;
        Self::run_git_command(repo_dir.path(), &["commit", "-m", "Initial commit"])?;

        // Ensure we have a main branch (some git versions default to 'master')
        Self::run_git_command(repo_dir.path(), &["branch", "-M", "main"])?;

        let origin_url = origin_dir.path().to_string_lossy().to_string();
        Self::run_git_command(repo_dir.path(), &["remote", "add", "origin", &origin_url])?;
        Self::run_git_command(repo_dir.path(), &["push", "-u", "origin", "main"])?;

        Ok(Self {
            root,
            repo_dir,
            origin_dir,
            _temp_dir: temp_dir,
        })
    }

    /// Run a git command in `dir`, returning trimmed stdout
    ///
    /// # Errors
    /// Returns an error if git cannot be run or exits unsuccessfully
    pub fn run_git_command(dir: &std::path::Path, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .context("Failed to execute git command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git command {:?} failed: {}", args, stderr);
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Run git in the main checkout
    ///
    /// # Errors
    /// Returns an error if the git command fails
    pub fn git(&self, args: &[&str]) -> Result<String> {
        Self::run_git_command(self.repo_dir.path(), args)
    }

    /// Execute the CLI in the main checkout with a no-op session command
    ///
    /// # Errors
    /// Returns an error if the command setup fails
    pub fn run_command(&self, args: &[&str]) -> Result<assert_cmd::Command> {
        let mut cmd =
            assert_cmd::Command::cargo_bin("wug").context("Failed to find wug binary")?;

        cmd.current_dir(self.repo_dir.path())
            .env("WUG_SESSION_COMMAND", TEST_SESSION_COMMAND)
            .env_remove("WUG_LOG");

        cmd.args(args);
        Ok(cmd)
    }

    /// Path of the worktree created for `wug/<suffix>`
    pub fn worktree_path(&self, suffix: &str) -> assert_fs::fixture::ChildPath {
        // Use the same sanitization logic as the main application
        let sanitized = format!("wug/{}", suffix).replace('/', "-");
        self.root.child(sanitized)
    }

    /// Names of `wug-*` directories created next to the main checkout
    ///
    /// # Errors
    /// Returns an error if the directory cannot be read
    pub fn created_worktrees(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(self.root.path())? {
            let name = entry?.file_name().to_string_lossy().to_string();
            if name.starts_with("wug-") {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    /// Check if we're running in a CI environment (where TTY is not available)
    pub fn is_ci() -> bool {
        // Check for common CI environment variables
        std::env::var("CI").is_ok()
            || std::env::var("GITHUB_ACTIONS").is_ok()
            || std::env::var("GITLAB_CI").is_ok()
            || std::env::var("TRAVIS").is_ok()
            || std::env::var("CIRCLECI").is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use predicates::prelude::*;

    #[test]
    fn test_cli_test_environment_creation() -> Result<()> {
        let env = CliTestEnvironment::new()?;

        env.repo_dir.assert(predicate::path::is_dir());
        env.repo_dir.child(".git").assert(predicate::path::exists());
        env.repo_dir
            .child("README.md")
            .assert(predicate::str::contains("# Test Repo"));
        env.origin_dir.child("HEAD").assert(predicate::path::exists());
        assert_eq!(env.git(&["rev-parse", "--abbrev-ref", "HEAD"])?, "main");

        Ok(())
    }

    #[test]
    fn test_worktree_path_sanitization() -> Result<()> {
        let env = CliTestEnvironment::new()?;

        let path = env.worktree_path("team/fix");
        assert!(path.path().ends_with("wug-team-fix"));
        assert_eq!(path.path().parent(), Some(env.root.path()));

        Ok(())
    }
}
