// Copyright 2026 Bliz Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

use bliz::{Platform, ProjectConfig};
use bliz_cli::commands;
use bliz_cli::server::DEFAULT_HOST;
use clap::{Parser, Subcommand};
use console::style;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bliz")]
#[command(author = "Bliz Contributors")]
#[command(version)]
#[command(about = "Zero-config dev server and build tool for front-end projects", long_about = None)]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Verbose mode: show bundler warnings
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Project root (defaults to the current directory)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Entry file, relative to the project root
    #[arg(long, global = true)]
    entry: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the development server with live reload
    Dev {
        /// Preferred port; the next free one is used if taken
        #[arg(short, long)]
        port: Option<u16>,
        /// Host to bind to
        #[arg(long, default_value = DEFAULT_HOST)]
        host: String,
        /// Don't open a browser
        #[arg(long)]
        no_open: bool,
    },
    /// Build for production
    Build {
        /// Output directory, relative to the project root
        #[arg(short, long)]
        outdir: Option<PathBuf>,
        /// Bundle platform: browser or node
        #[arg(long)]
        platform: Option<Platform>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing with the specified log level
    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let overrides = ProjectConfig {
        root: cli.root,
        entry: cli.entry,
        ..Default::default()
    };

    let result = match cli.command {
        Commands::Dev { port, host, no_open } => {
            let overrides = ProjectConfig { port, ..overrides };
            commands::dev::run(&overrides, &host, !no_open).await
        }
        Commands::Build { outdir, platform } => {
            let overrides = ProjectConfig {
                outdir,
                platform,
                ..overrides
            };
            commands::build::run(&overrides, cli.verbose).await
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("✗").red(), e);
        std::process::exit(1);
    }
}
