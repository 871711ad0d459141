// Copyright 2026 Bliz Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Project configuration loading.
//!
//! Configuration is read from an optional `bliz.toml` and then overridden by
//! command-line flags. Every key is optional.
//!
//! # Example Configuration
//!
//! ```toml
//! port = 4000
//! entry = "src/index.html"
//! outdir = "build"
//! platform = "browser"
//! plugins = ["./plugins/svg-loader.js"]
//! ```

use anyhow::Context;
use bliz::ProjectConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file, looked up in the project directory.
pub const CONFIG_FILE: &str = "bliz.toml";

/// A project directory together with its effective configuration.
#[derive(Debug, Clone)]
pub struct Project {
    /// Absolute project root.
    pub root: PathBuf,
    /// File configuration merged with command-line overrides.
    pub config: ProjectConfig,
}

impl Project {
    /// Loads the project rooted at `cwd` (or at `overrides.root`, if set).
    ///
    /// # Errors
    ///
    /// Returns an error if `bliz.toml` exists but cannot be read or parsed.
    pub fn load(cwd: &Path, overrides: &ProjectConfig) -> anyhow::Result<Self> {
        let config_dir = overrides.root_dir(cwd);
        let file_config = load_config_file(&config_dir)?;

        let root = file_config.root_dir(&config_dir);
        let overrides = ProjectConfig {
            root: None,
            ..overrides.clone()
        };
        let mut config = file_config.merged(&overrides);
        config.root = Some(root.clone());

        tracing::debug!("Project root: {}", root.display());
        Ok(Self { root, config })
    }

    /// Absolute output directory.
    pub fn outdir(&self) -> PathBuf {
        self.config.outdir_path(&self.root)
    }
}

/// Reads `bliz.toml` from `dir`, returning defaults if it does not exist.
pub fn load_config_file(dir: &Path) -> anyhow::Result<ProjectConfig> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content =
        fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ProjectConfig =
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(config)
}
