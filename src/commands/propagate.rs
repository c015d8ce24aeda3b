use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Untracked local files carried into every new worktree, in copy order
pub const COPY_MANIFEST: &[&str] = &[
    ".env",
    ".env.local",
    ".envrc",
    "credentials.json",
    "service-account.json",
    ".secrets.toml",
    ".vscode/tasks.json",
    ".vscode/launch.json",
    ".vscode/settings.json",
];

/// Which manifest entries were copied and which were absent from the source
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CopyReport {
    pub copied: Vec<PathBuf>,
    pub missing: Vec<PathBuf>,
}

/// Copies the fixed manifest from `source_root` into `target_root`
///
/// # Errors
/// Returns an error if an existing manifest file cannot be copied
pub fn propagate_manifest(source_root: &Path, target_root: &Path) -> Result<CopyReport> {
    copy_entries(source_root, target_root, COPY_MANIFEST)
}

/// Copies each entry that exists under `source_root`, keeping its relative path
///
/// Entries are handled independently; a missing one is recorded and skipped.
///
/// # Errors
/// Returns an error if a parent directory cannot be created or a copy fails
pub fn copy_entries(source_root: &Path, target_root: &Path, entries: &[&str]) -> Result<CopyReport> {
    println!("Copying local files...");
    let mut report = CopyReport::default();

    for entry in entries {
        let relative_path = PathBuf::from(entry);
        let source_file = source_root.join(&relative_path);

        if !source_file.is_file() {
            tracing::debug!("manifest entry {} not present, skipping", entry);
            report.missing.push(relative_path);
            continue;
        }

        let target_file = target_root.join(&relative_path);
        if let Some(parent) = target_file.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create parent directory: {}", parent.display())
            })?;
        }

        std::fs::copy(&source_file, &target_file)
            .with_context(|| format!("Failed to copy {}", relative_path.display()))?;
        println!("  Copied: {}", relative_path.display());
        report.copied.push(relative_path);
    }

    if !report.missing.is_empty() {
        let names: Vec<String> = report
            .missing
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        println!("  Not present (skipped): {}", names.join(", "));
    }

    Ok(report)
}
