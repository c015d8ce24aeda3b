//! Catalog of MCP configuration templates shared by all worktrees.
//!
//! Templates live in `mcp-templates/` of the main checkout and are named
//! `mcp.<name>.json`. An optional `mcp-templates/README.md` describes them
//! with list items such as `- **dwh**: Data warehouse access`.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::BootstrapError;
use crate::selection::{self, Prompter};

pub const TEMPLATES_DIR: &str = "mcp-templates";
pub const TEMPLATE_PREFIX: &str = "mcp.";
pub const TEMPLATE_EXTENSION: &str = ".json";
pub const TEMPLATE_DOC: &str = "README.md";
/// File name a template is installed under inside the worktree
pub const ACTIVE_CONFIG_FILE: &str = ".mcp.json";

const NO_DESCRIPTION: &str = "(no description)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub name: String,
    pub source_path: PathBuf,
    pub description: Option<String>,
}

impl Template {
    /// Menu line: name plus description or a placeholder
    #[must_use]
    pub fn display_line(&self) -> String {
        format!(
            "{} - {}",
            self.name,
            self.description.as_deref().unwrap_or(NO_DESCRIPTION)
        )
    }
}

/// Templates available in one templates directory, sorted by name
#[derive(Debug)]
pub struct TemplateCatalog {
    dir: PathBuf,
    templates: Vec<Template>,
}

impl TemplateCatalog {
    /// Enumerates `mcp.<name>.json` files in `dir`
    ///
    /// A missing directory yields an empty catalog.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be listed
    pub fn load(dir: &Path) -> Result<Self> {
        let doc = fs::read_to_string(dir.join(TEMPLATE_DOC)).ok();
        let escaped_dir = PathBuf::from(glob::Pattern::escape(&dir.to_string_lossy()));
        let pattern = escaped_dir.join(format!("{}*{}", TEMPLATE_PREFIX, TEMPLATE_EXTENSION));

        let mut templates = Vec::new();
        for entry in glob::glob(&pattern.to_string_lossy())? {
            let source_path = entry.context("Failed to read templates directory")?;
            if !source_path.is_file() {
                continue;
            }
            let Some(name) = template_name(&source_path) else {
                continue;
            };
            let description = doc.as_deref().and_then(|doc| describe(doc, &name));
            templates.push(Template {
                name,
                source_path,
                description,
            });
        }
        templates.sort_by(|a, b| a.name.cmp(&b.name));

        tracing::debug!("found {} templates in {}", templates.len(), dir.display());
        Ok(Self {
            dir: dir.to_path_buf(),
            templates,
        })
    }

    #[must_use]
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.templates.iter().map(|t| t.name.clone()).collect()
    }

    fn ensure_not_empty(&self) -> Result<()> {
        if self.templates.is_empty() {
            return Err(BootstrapError::NoTemplatesFound {
                dir: self.dir.clone(),
            }
            .into());
        }
        Ok(())
    }

    /// Looks a template up by name
    ///
    /// # Errors
    /// Returns [`BootstrapError::NoTemplatesFound`] for an empty catalog and
    /// [`BootstrapError::TemplateNotFound`] for an unknown name
    pub fn find(&self, name: &str) -> Result<Template> {
        self.ensure_not_empty()?;
        self.templates
            .iter()
            .find(|t| t.name == name)
            .cloned()
            .ok_or_else(|| {
                BootstrapError::TemplateNotFound {
                    name: name.to_string(),
                    available: self.names(),
                }
                .into()
            })
    }

    /// Shows a numbered menu and reads a 1-based choice
    ///
    /// # Errors
    /// Returns [`BootstrapError::NoTemplatesFound`] for an empty catalog and
    /// [`BootstrapError::Selection`] for input outside the menu
    pub fn select_interactive(&self, prompter: &dyn Prompter) -> Result<Template> {
        self.ensure_not_empty()?;

        println!("Available MCP templates:");
        let lines: Vec<String> = self.templates.iter().map(Template::display_line).collect();
        selection::print_menu(&lines);

        let answer = prompter.get_text_input(&format!(
            "Select a template [1-{}]:",
            self.templates.len()
        ))?;
        let index = selection::parse_choice(&answer, self.templates.len())
            .map_err(BootstrapError::Selection)?;
        Ok(self.templates[index].clone())
    }
}

/// Resolves the template a run asked for, if any
///
/// A name given with `--mcp` takes precedence over `-m`.
///
/// # Errors
/// Returns an error if the catalog is empty, the name is unknown or the
/// interactive choice is invalid
pub fn resolve(
    dir: &Path,
    name: Option<&str>,
    interactive: bool,
    prompter: &dyn Prompter,
) -> Result<Option<Template>> {
    if name.is_none() && !interactive {
        return Ok(None);
    }

    let catalog = TemplateCatalog::load(dir)?;
    let template = if let Some(name) = name {
        if interactive {
            eprintln!("Warning: --mcp {} given; skipping interactive selection", name);
        }
        catalog.find(name)?
    } else {
        catalog.select_interactive(prompter)?
    };

    println!("Using MCP template: {}", template.name);
    Ok(Some(template))
}

/// Installs `template` as the worktree's active MCP configuration
///
/// # Errors
/// Returns [`BootstrapError::TemplateNotFound`] if the template file has
/// disappeared, or an error if copying fails
pub fn activate(template: &Template, worktree_path: &Path) -> Result<PathBuf> {
    if !template.source_path.is_file() {
        return Err(BootstrapError::TemplateNotFound {
            name: template.name.clone(),
            available: Vec::new(),
        }
        .into());
    }

    let target = worktree_path.join(ACTIVE_CONFIG_FILE);
    fs::copy(&template.source_path, &target).with_context(|| {
        format!(
            "Failed to install {} as {}",
            template.source_path.display(),
            target.display()
        )
    })?;
    println!("  Installed MCP template '{}' as {}", template.name, ACTIVE_CONFIG_FILE);
    Ok(target)
}

fn template_name(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let name = file_name
        .strip_prefix(TEMPLATE_PREFIX)?
        .strip_suffix(TEMPLATE_EXTENSION)?;
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Finds the description of `name` in the templates README
///
/// Recognises list items of the form `- **name**: text`, `- **name** - text`,
/// `` - `name`: text `` and `` - `name` - text ``.
#[must_use]
pub fn describe(doc: &str, name: &str) -> Option<String> {
    let markers = [format!("**{}**", name), format!("`{}`", name)];

    doc.lines().find_map(|line| {
        let item = line.trim_start().strip_prefix(['-', '*'])?.trim_start();
        let rest = markers
            .iter()
            .find_map(|marker| item.strip_prefix(marker.as_str()))?;
        let rest = rest.trim_start();
        let text = rest
            .strip_prefix(':')
            .or_else(|| rest.strip_prefix('-'))
            .or_else(|| rest.strip_prefix('—'))?
            .trim();
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    })
}
