use clap::{Parser, ValueHint};

use crate::commands::completions::Shell;
use crate::commands::bootstrap::BootstrapRequest;

#[derive(Parser, Debug)]
#[command(name = "wug")]
#[command(about = "Start an isolated worktree session on a fresh wug/ branch")]
#[command(
    long_about = "Start an isolated worktree session on a fresh wug/ branch.\n\n\
    Local changes are committed or stashed first, the default branch is synced \
    with its remote, a new worktree is created next to the main checkout, local \
    secret/editor files are copied over, an optional MCP template is installed \
    as .mcp.json and an interactive session is started inside the worktree."
)]
#[command(version)]
pub struct Cli {
    /// Choose an MCP template interactively
    #[arg(short = 'm')]
    pub interactive_mcp: bool,

    /// Install the named MCP template (mcp-templates/mcp.<NAME>.json)
    #[arg(long = "mcp", value_name = "NAME", value_hint = ValueHint::Other)]
    pub mcp: Option<String>,

    /// Print shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL", exclusive = true)]
    pub completions: Option<Shell>,

    /// Branch suffix; the branch becomes wug/<SUFFIX> [default: patch-<timestamp>]
    #[arg(value_name = "SUFFIX", value_hint = ValueHint::Other)]
    pub branch_suffix: Option<String>,
}

impl Cli {
    #[must_use]
    pub fn into_request(self) -> BootstrapRequest {
        BootstrapRequest {
            branch_suffix: self.branch_suffix.filter(|s| !s.trim().is_empty()),
            mcp_template_name: self.mcp,
            interactive_template_selection: self.interactive_mcp,
        }
    }
}
