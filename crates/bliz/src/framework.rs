// Copyright 2026 Bliz Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Framework signatures.
//!
//! Detection is driven by [`FRAMEWORK_SIGNATURES`], checked in order; the
//! first signature present in the project root wins. Supporting a new
//! framework means adding a [`Framework`] variant and its table rows.

use crate::manifest::PackageManifest;
use std::fmt;
use std::path::Path;

/// Frameworks whose own tooling bliz delegates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Framework {
    /// Next.js
    NextJs,
    /// Remix
    Remix,
    /// Vite
    Vite,
}

impl Framework {
    /// Stable identifier, used in status output and descriptors.
    pub fn name(&self) -> &'static str {
        match self {
            Framework::NextJs => "nextjs",
            Framework::Remix => "remix",
            Framework::Vite => "vite",
        }
    }

    /// Executable name of the framework's CLI.
    pub fn cli(&self) -> &'static str {
        match self {
            Framework::NextJs => "next",
            Framework::Remix => "remix",
            Framework::Vite => "vite",
        }
    }

    /// Arguments for the framework's development command.
    pub fn dev_args(&self) -> &'static [&'static str] {
        match self {
            Framework::NextJs | Framework::Remix => &["dev"],
            Framework::Vite => &[],
        }
    }

    /// Arguments for the framework's production build command.
    pub fn build_args(&self) -> &'static [&'static str] {
        &["build"]
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Evidence that a project uses a framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signature {
    /// A configuration file in the project root.
    MarkerFile(&'static str),
    /// A directory-convention file, relative to the project root.
    ConventionFile(&'static str),
    /// A package name in `dependencies` or `devDependencies`.
    Dependency(&'static str),
}

impl Signature {
    fn matches(&self, root: &Path, manifest: Option<&PackageManifest>) -> bool {
        match self {
            Signature::MarkerFile(name) | Signature::ConventionFile(name) => {
                root.join(name).exists()
            }
            Signature::Dependency(name) => manifest.is_some_and(|m| m.has_dependency(name)),
        }
    }
}

/// Ordered signature table. Marker files outrank directory conventions,
/// which outrank manifest dependencies.
pub const FRAMEWORK_SIGNATURES: &[(Framework, Signature)] = &[
    (Framework::NextJs, Signature::MarkerFile("next.config.js")),
    (Framework::NextJs, Signature::MarkerFile("next.config.mjs")),
    (Framework::Remix, Signature::MarkerFile("remix.config.js")),
    (Framework::Vite, Signature::MarkerFile("vite.config.js")),
    (Framework::Vite, Signature::MarkerFile("vite.config.ts")),
    (Framework::NextJs, Signature::ConventionFile("app/page.tsx")),
    (Framework::NextJs, Signature::ConventionFile("app/page.js")),
    (Framework::NextJs, Signature::ConventionFile("src/app/page.tsx")),
    (Framework::NextJs, Signature::ConventionFile("src/app/page.js")),
    (Framework::NextJs, Signature::Dependency("next")),
    (Framework::Remix, Signature::Dependency("@remix-run/dev")),
    (Framework::Vite, Signature::Dependency("vite")),
];

/// Returns the first framework whose signature is present under `root`.
pub fn detect_framework(root: &Path, manifest: Option<&PackageManifest>) -> Option<Framework> {
    FRAMEWORK_SIGNATURES
        .iter()
        .find(|(_, signature)| signature.matches(root, manifest))
        .map(|(framework, signature)| {
            tracing::debug!("Detected {} via {:?}", framework, signature);
            *framework
        })
}
