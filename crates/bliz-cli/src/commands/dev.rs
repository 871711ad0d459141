// Copyright 2026 Bliz Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Development server command with live reload.

use bliz::{PackageManifest, ProjectConfig};
use console::style;

use super::load_and_resolve;
use crate::build::{DelegateCommand, Task};
use crate::server::browser::open_browser;
use crate::server::DevServer;

/// Runs the development server, or the framework's own one.
///
/// Serves until interrupted with Ctrl+C.
pub async fn run(overrides: &ProjectConfig, host: &str, open: bool) -> anyhow::Result<()> {
    let (project, entry) = load_and_resolve(overrides)?;

    if let Some(framework) = entry.framework_kind() {
        let manifest = PackageManifest::load(&project.root);
        let command = DelegateCommand::for_framework(&project.root, framework, manifest.as_ref(), Task::Dev);
        println!(
            "{} {} {}",
            style("Starting").cyan(),
            style(framework.name()).bold(),
            style(format!("via `{}`", command)).dim()
        );
        command.run(&project.root).await?;
        return Ok(());
    }

    if !entry.is_html() {
        println!(
            "{} {}",
            style("Note:").yellow(),
            style("entry is a script; `/` serves index.html if present").dim()
        );
    }

    let mut server = DevServer::new(project.root.clone(), Some(entry))
        .with_host(host)
        .with_port(project.config.port())
        .start()
        .await?;

    if server.port_substituted() {
        println!(
            "{} {}",
            style("Port:").yellow(),
            style(format!(
                "{} is in use, using {} instead",
                server.requested_port(),
                server.port()
            ))
            .yellow()
        );
    }

    let url = server.url();
    println!("{} {}", style("Server:").cyan(), style(&url).green().bold());
    if server.is_watching() {
        println!("{} {}", style("Status:").cyan(), style("Watching for changes...").dim());
    }
    println!();

    if open {
        open_browser(&url);
    }

    let stopped = tokio::select! {
        result = server.wait() => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };

    match stopped {
        Some(result) => result?,
        None => {
            println!("{}", style("Shutting down...").dim());
            server.shutdown().await?;
        }
    }

    Ok(())
}
