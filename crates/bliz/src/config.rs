// Copyright 2026 Bliz Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Caller-supplied project configuration.
//!
//! Every field is optional. The CLI fills a [`ProjectConfig`] from `bliz.toml`
//! and command-line flags, then hands it to the resolver, the dev server and
//! the build orchestrator by reference.
//!
//! # Example Configuration
//!
//! ```toml
//! root = "."
//! port = 3000
//! entry = "src/index.html"
//! outdir = "dist"
//! platform = "browser"
//! plugins = ["./plugins/svg.js"]
//! ```

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Port the development server asks for when none is configured.
pub const DEFAULT_PORT: u16 = 3000;

/// Default output directory name, relative to the project root.
pub const DEFAULT_OUTDIR: &str = "dist";

/// Execution environment the bundled output targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Browser runtime (DOM, no Node built-ins).
    Browser,
    /// Server runtime (Node built-ins available).
    Node,
}

impl Platform {
    /// Returns the identifier understood by the bundler.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Browser => "browser",
            Platform::Node => "node",
        }
    }

    /// Infers the platform from the leading line of a script.
    ///
    /// A file that opens with an interpreter marker (`#!`) is meant to be
    /// executed directly by a server runtime; anything else targets the browser.
    pub fn from_source(source: &str) -> Self {
        let source = source.strip_prefix('\u{feff}').unwrap_or(source);
        if source.starts_with("#!") {
            Platform::Node
        } else {
            Platform::Browser
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "browser" => Ok(Platform::Browser),
            "node" => Ok(Platform::Node),
            _ => Err(format!("Unknown platform: {} (expected browser or node)", s)),
        }
    }
}

/// Optional overrides for a project. Read-only once built.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Project root directory (default: current directory).
    #[serde(default)]
    pub root: Option<PathBuf>,
    /// Requested development server port (default: 3000).
    #[serde(default)]
    pub port: Option<u16>,
    /// Explicit entry point, relative to the root.
    #[serde(default)]
    pub entry: Option<PathBuf>,
    /// Build output directory, relative to the root (default: `dist`).
    #[serde(default)]
    pub outdir: Option<PathBuf>,
    /// Bundler platform target (default: inferred from the entry's shebang).
    #[serde(default)]
    pub platform: Option<Platform>,
    /// Bundler plugin module specifiers, passed through in order.
    #[serde(default)]
    pub plugins: Vec<String>,
}

impl ProjectConfig {
    /// Returns a copy where every field set in `overrides` replaces ours.
    ///
    /// A non-empty plugin list in `overrides` replaces the whole list.
    pub fn merged(&self, overrides: &ProjectConfig) -> ProjectConfig {
        ProjectConfig {
            root: overrides.root.clone().or_else(|| self.root.clone()),
            port: overrides.port.or(self.port),
            entry: overrides.entry.clone().or_else(|| self.entry.clone()),
            outdir: overrides.outdir.clone().or_else(|| self.outdir.clone()),
            platform: overrides.platform.or(self.platform),
            plugins: if overrides.plugins.is_empty() {
                self.plugins.clone()
            } else {
                overrides.plugins.clone()
            },
        }
    }

    /// Resolves the project root against `cwd`.
    pub fn root_dir(&self, cwd: &Path) -> PathBuf {
        match &self.root {
            Some(root) => cwd.join(root),
            None => cwd.to_path_buf(),
        }
    }

    /// Requested port, falling back to [`DEFAULT_PORT`].
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Output directory resolved against the project root.
    pub fn outdir_path(&self, root: &Path) -> PathBuf {
        match &self.outdir {
            Some(outdir) => root.join(outdir),
            None => root.join(DEFAULT_OUTDIR),
        }
    }
}
