// Copyright 2026 Bliz Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! The subset of `package.json` bliz reads.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// File name of the package manifest.
pub const MANIFEST_FILE: &str = "package.json";

/// Parsed `package.json` fields consumed by resolution and delegation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
    /// Entry override (`main`).
    #[serde(default)]
    pub main: Option<String>,
    /// Runtime dependencies, name to version range.
    #[serde(default)]
    pub dependencies: HashMap<String, serde_json::Value>,
    /// Development dependencies, name to version range.
    #[serde(default)]
    pub dev_dependencies: HashMap<String, serde_json::Value>,
    /// npm scripts, name to command line.
    #[serde(default)]
    pub scripts: HashMap<String, String>,
}

impl PackageManifest {
    /// Loads `package.json` from `root`.
    ///
    /// A missing file yields `None`. An unreadable or malformed manifest is
    /// logged and also yields `None`: it never aborts resolution.
    pub fn load(root: &Path) -> Option<Self> {
        let path = root.join(MANIFEST_FILE);
        if !path.is_file() {
            return None;
        }

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Could not read {}: {}", path.display(), e);
                return None;
            }
        };

        match Self::parse(&content) {
            Ok(manifest) => Some(manifest),
            Err(e) => {
                tracing::warn!("Ignoring invalid {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Parses manifest JSON.
    pub fn parse(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Returns true if `name` appears in `dependencies` or `devDependencies`.
    pub fn has_dependency(&self, name: &str) -> bool {
        self.dependencies.contains_key(name) || self.dev_dependencies.contains_key(name)
    }

    /// Returns the command line of the named script, if declared and non-empty.
    pub fn script(&self, name: &str) -> Option<&str> {
        self.scripts
            .get(name)
            .map(String::as_str)
            .filter(|command| !command.trim().is_empty())
    }
}
