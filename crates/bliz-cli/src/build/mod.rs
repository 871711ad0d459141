// Copyright 2026 Bliz Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Production builds.
//!
//! The [`BuildOrchestrator`] picks exactly one mode from the resolved entry:
//!
//! - **Framework**: hand the build to the framework's own CLI
//! - **Static**: copy the site into the output directory unchanged
//! - **Bundle**: bundle the entry script with esbuild
//!
//! Static and bundle builds empty the output directory first.

use bliz::{EntryDescriptor, EntryKind, Framework, PackageManifest, Platform};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::config::Project;

/// Bundler abstraction and the esbuild implementation.
pub mod bundler;
/// Static file copy.
pub mod copy;
/// Framework CLI delegation.
pub mod delegate;

pub use bundler::{BundleRequest, Bundler, EsbuildBundler};
pub use copy::{copy_static, COPY_IGNORES};
pub use delegate::{DelegateCommand, DelegateError, PackageManager, Task};

/// Errors that fail a build.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Nothing to build.
    #[error("No entry point found. Add an index.html, set `main` in package.json, or pass --entry")]
    NoEntryPoint,

    /// Emptying the output directory would delete the project or its entry.
    #[error("Refusing to use {0} as the output directory because it contains the project root or the entry point")]
    UnsafeOutdir(PathBuf),

    /// An external tool could not be started.
    #[error("Failed to start {tool}: {source}")]
    Spawn {
        /// Tool name.
        tool: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// An external tool reported failure.
    #[error("{tool} failed:\n{diagnostics}")]
    ToolFailed {
        /// Tool name.
        tool: String,
        /// Tool output explaining the failure.
        diagnostics: String,
    },

    /// The framework's own build failed.
    #[error(transparent)]
    Delegate(#[from] DelegateError),

    /// File system error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for build operations.
pub type BuildResult<T> = Result<T, BuildError>;

/// The way a project is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildMode {
    /// Run the framework's build command.
    Framework(Framework),
    /// Copy the static site.
    Static,
    /// Bundle a script entry.
    Bundle(BundleRequest),
}

impl BuildMode {
    /// Chooses the build mode for `entry`.
    ///
    /// For scripts the platform comes from configuration, or else from a
    /// shebang on the entry's first line.
    pub fn plan(project: &Project, entry: Option<&EntryDescriptor>) -> BuildResult<Self> {
        let entry = entry.ok_or(BuildError::NoEntryPoint)?;

        match entry.kind {
            EntryKind::Framework(framework) => Ok(BuildMode::Framework(framework)),
            EntryKind::Html => Ok(BuildMode::Static),
            EntryKind::Script => {
                let platform = match project.config.platform {
                    Some(platform) => platform,
                    None => Platform::from_source(&fs::read_to_string(&entry.path)?),
                };
                Ok(BuildMode::Bundle(BundleRequest {
                    root: project.root.clone(),
                    entry: entry.path.clone(),
                    outdir: project.outdir(),
                    platform,
                    plugins: project.config.plugins.clone(),
                }))
            }
        }
    }
}

/// Runs one production build.
pub struct BuildOrchestrator {
    project: Project,
    bundler: Arc<dyn Bundler>,
    framework_command: Option<DelegateCommand>,
}

impl BuildOrchestrator {
    /// Creates an orchestrator using esbuild.
    pub fn new(project: Project) -> Self {
        Self {
            project,
            bundler: Arc::new(EsbuildBundler::new()),
            framework_command: None,
        }
    }

    /// Replaces the bundler.
    pub fn with_bundler(mut self, bundler: impl Bundler + 'static) -> Self {
        self.bundler = Arc::new(bundler);
        self
    }

    /// Runs `command` for framework builds instead of the detected one.
    pub fn with_framework_command(mut self, command: DelegateCommand) -> Self {
        self.framework_command = Some(command);
        self
    }

    /// Absolute output directory.
    pub fn outdir(&self) -> PathBuf {
        self.project.outdir()
    }

    /// Builds the project for `entry`.
    pub async fn build(&self, entry: Option<&EntryDescriptor>) -> BuildResult<BuildMode> {
        let entry = entry.ok_or(BuildError::NoEntryPoint)?;
        let mode = BuildMode::plan(&self.project, Some(entry))?;
        let start = Instant::now();

        match &mode {
            BuildMode::Framework(framework) => self.build_framework(*framework).await?,
            BuildMode::Static => self.build_static(&entry.path)?,
            BuildMode::Bundle(request) => self.build_bundle(request).await?,
        }

        tracing::debug!("Build finished in {:?}", start.elapsed());
        Ok(mode)
    }

    async fn build_framework(&self, framework: Framework) -> BuildResult<()> {
        let command = match &self.framework_command {
            Some(command) => command.clone(),
            None => {
                let manifest = PackageManifest::load(&self.project.root);
                DelegateCommand::for_framework(&self.project.root, framework, manifest.as_ref(), Task::Build)
            }
        };

        println!(
            "{} {} {}",
            style("Building").cyan(),
            style(framework.name()).bold(),
            style(format!("via `{}`", command)).dim()
        );
        command.run(&self.project.root).await?;
        println!("  {} {}", style("✓").green(), style("Framework build complete").green());
        Ok(())
    }

    fn build_static(&self, entry: &Path) -> BuildResult<()> {
        let outdir = self.outdir();
        println!("{} {}", style("Building").cyan(), style("static site").bold());

        prepare_outdir(&self.project.root, &outdir, entry)?;
        let copied = copy_static(&self.project.root, &outdir, COPY_IGNORES)?;

        println!(
            "  {} {} {}",
            style("✓").green(),
            style(format!("Copied {} file(s) to", copied)).green(),
            style(outdir.display()).bold()
        );
        Ok(())
    }

    async fn build_bundle(&self, request: &BundleRequest) -> BuildResult<()> {
        println!(
            "{} {} {}",
            style("Bundling").cyan(),
            style(request.entry.display()).bold(),
            style(format!("for {}", request.platform)).dim()
        );

        prepare_outdir(&self.project.root, &request.outdir, &request.entry)?;

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Running {}...", style(self.bundler.name()).cyan()));
        pb.enable_steady_tick(Duration::from_millis(100));

        // Bundlers block on a child process
        let bundler = Arc::clone(&self.bundler);
        let owned = request.clone();
        let result = tokio::task::spawn_blocking(move || bundler.bundle(&owned)).await;
        pb.finish_and_clear();
        result.map_err(|e| BuildError::ToolFailed {
            tool: self.bundler.name().to_string(),
            diagnostics: e.to_string(),
        })??;

        println!(
            "  {} {} {}",
            style("✓").green(),
            style("Bundle written to").green(),
            style(request.outdir.display()).bold()
        );
        Ok(())
    }
}

/// Empties `outdir`, creating it if needed.
///
/// Refuses any directory that is the project root, one of its ancestors, or
/// that holds `entry`.
pub fn prepare_outdir(root: &Path, outdir: &Path, entry: &Path) -> BuildResult<()> {
    if root.starts_with(outdir) || entry.starts_with(outdir) {
        return Err(BuildError::UnsafeOutdir(outdir.to_path_buf()));
    }
    if outdir.exists() {
        fs::remove_dir_all(outdir)?;
    }
    fs::create_dir_all(outdir)?;
    Ok(())
}
