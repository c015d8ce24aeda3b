use anyhow::Result;
use assert_fs::prelude::*;
use predicates::prelude::*;

/// Create `mcp-templates/mcp.<name>.json` files plus a README describing them
pub fn create_templates(repo_dir: &assert_fs::fixture::ChildPath, names: &[&str]) -> Result<()> {
    let templates_dir = repo_dir.child("mcp-templates");
    templates_dir.create_dir_all()?;

    let mut readme = String::from("# MCP templates\n\n");
    for name in names {
        templates_dir
            .child(format!("mcp.{}.json", name))
            .write_str(&format!(r#"{{"mcpServers": {{"{}": {{}}}}}}"#, name))?;
        readme.push_str(&format!("- **{}**: {} server\n", name, name));
    }
    templates_dir.child("README.md").write_str(&readme)?;

    Ok(())
}

/// Create some of the untracked local files the tool propagates
pub fn create_manifest_files(repo_dir: &assert_fs::fixture::ChildPath) -> Result<()> {
    repo_dir.child(".env").write_str("API_TOKEN=secret")?;

    let vscode_dir = repo_dir.child(".vscode");
    vscode_dir.create_dir_all()?;
    vscode_dir
        .child("tasks.json")
        .write_str(r#"{"version": "2.0.0"}"#)?;

    Ok(())
}

/// Assert that the files from [`create_manifest_files`] reached the worktree
/// and that manifest entries absent from the source did not appear
pub fn assert_manifest_files_copied(worktree_path: &assert_fs::fixture::ChildPath) -> Result<()> {
    worktree_path
        .child(".env")
        .assert(predicate::str::contains("API_TOKEN=secret"));

    worktree_path
        .child(".vscode")
        .child("tasks.json")
        .assert(predicate::str::contains("2.0.0"));

    worktree_path
        .child(".vscode")
        .child("launch.json")
        .assert(predicate::path::missing());
    worktree_path
        .child("credentials.json")
        .assert(predicate::path::missing());

    Ok(())
}
