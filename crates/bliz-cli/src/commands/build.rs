// Copyright 2026 Bliz Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Production build command.

use bliz::ProjectConfig;
use console::style;
use std::time::Instant;

use super::load_and_resolve;
use crate::build::{BuildOrchestrator, EsbuildBundler};

/// Builds the project in the current directory.
pub async fn run(overrides: &ProjectConfig, verbose: bool) -> anyhow::Result<()> {
    let start = Instant::now();
    let (project, entry) = load_and_resolve(overrides)?;

    let orchestrator = BuildOrchestrator::new(project).with_bundler(EsbuildBundler::new().with_verbose(verbose));
    orchestrator.build(Some(&entry)).await?;

    println!();
    println!(
        "{} {}",
        style("Build complete").green().bold(),
        style(format!("in {}ms", start.elapsed().as_millis())).dim()
    );
    Ok(())
}
