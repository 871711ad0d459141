// Copyright 2026 Bliz Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! CLI command implementations.
//!
//! - `dev`: Serve the project with live reload, or run the framework's dev server
//! - `build`: Produce a production build

use anyhow::Context;
use bliz::{EntryDescriptor, ProjectConfig};
use console::style;

use crate::config::Project;

/// Production build command.
pub mod build;
/// Development server command.
pub mod dev;

/// Loads the project from the current directory and resolves its entry.
///
/// Prints the detected entry. A project with no entry point is an error.
pub fn load_and_resolve(overrides: &ProjectConfig) -> anyhow::Result<(Project, EntryDescriptor)> {
    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    let project = Project::load(&cwd, overrides)?;

    let entry = bliz::resolve(&project.root, &project.config)?.ok_or_else(|| {
        anyhow::anyhow!(
            "No entry point found in {}. Add an index.html, set `main` in package.json, or pass --entry",
            project.root.display()
        )
    })?;

    let shown = entry
        .path
        .strip_prefix(&project.root)
        .ok()
        .filter(|relative| !relative.as_os_str().is_empty())
        .unwrap_or(entry.path.as_path());
    println!(
        "{} {} {}",
        style("Entry:").cyan(),
        style(shown.display()).green().bold(),
        style(format!("({})", entry.kind)).dim()
    );

    Ok((project, entry))
}
