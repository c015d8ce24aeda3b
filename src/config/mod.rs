//! Per-repository settings for bootstrap runs.
//!
//! Settings live in `.wug-config.toml` at the root of the main checkout. Every
//! field is optional and falls back to a default:
//!
//! ```toml
//! [session]
//! command = "claude"
//! args = ["--continue"]
//!
//! [sync]
//! remote = "origin"
//! ```
//!
//! The session command can also be replaced for a single run through the
//! `WUG_SESSION_COMMAND` environment variable.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = ".wug-config.toml";
pub const SESSION_COMMAND_ENV: &str = "WUG_SESSION_COMMAND";

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapConfig {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

/// Interactive session started inside the new worktree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "SessionConfig::default_command")]
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl SessionConfig {
    fn default_command() -> String {
        "claude".to_string()
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            command: Self::default_command(),
            args: Vec::new(),
        }
    }
}

/// Remote the default branch is synchronized from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "SyncConfig::default_remote")]
    pub remote: String,
}

impl SyncConfig {
    fn default_remote() -> String {
        "origin".to_string()
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            remote: Self::default_remote(),
        }
    }
}

impl BootstrapConfig {
    /// Loads `.wug-config.toml` from the main checkout and applies env overrides.
    ///
    /// A missing, blank or invalid file yields the defaults; parse problems are
    /// reported on stderr.
    ///
    /// # Errors
    ///
    /// Only returns an error if the file exists but cannot be read.
    pub fn load_from_repo(repo_path: &Path) -> Result<Self> {
        let config_path = repo_path.join(CONFIG_FILE_NAME);

        let config = if config_path.exists() {
            let content = fs::read_to_string(&config_path).with_context(|| {
                format!("Failed to read config file: {}", config_path.display())
            })?;
            Self::parse(&content)
        } else {
            Self::default()
        };

        Ok(config.with_env_overrides())
    }

    fn parse(content: &str) -> Self {
        if content.trim().is_empty() {
            return Self::default();
        }

        match toml::from_str::<BootstrapConfig>(content) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: Invalid TOML syntax in {}:", CONFIG_FILE_NAME);
                eprintln!("  {}", e);
                eprintln!("  Using default configuration.");
                Self::default()
            }
        }
    }

    /// Replaces the session command with `WUG_SESSION_COMMAND` when it is set
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(raw) = std::env::var(SESSION_COMMAND_ENV) {
            let mut parts = raw.split_whitespace().map(str::to_string);
            if let Some(command) = parts.next() {
                tracing::debug!("session command overridden by {SESSION_COMMAND_ENV}");
                self.session.command = command;
                self.session.args = parts.collect();
            }
        }
        self
    }
}
