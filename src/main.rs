use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;
use wug::Result;
use wug::cli::Cli;
use wug::commands::bootstrap::{self, BootstrapOutcome};
use wug::commands::completions;

const LOG_ENV: &str = "WUG_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        completions::generate_completions(shell, &mut cmd);
        return Ok(());
    }

    match bootstrap::run(&cli.into_request())? {
        BootstrapOutcome::Cancelled => {
            println!("Cancelled. No changes were made.");
        }
        BootstrapOutcome::Completed(summary) => {
            println!();
            println!("✓ Session in {} finished", summary.worktree.path.display());
        }
    }

    Ok(())
}
