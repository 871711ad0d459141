// Copyright 2026 Bliz Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Entry-point resolution.
//!
//! [`resolve`] walks a priority ladder and stops at the first step that
//! produces an answer:
//!
//! 1. **Explicit override**: `config.entry`, resolved against the root.
//! 2. **Manifest**: the `main` field of `package.json`.
//! 3. **Framework signature**: see [`crate::framework`].
//! 4. **Smart search**: the highest-scoring [`Candidate`] from [`scan`].
//!
//! Steps 1 and 2 are strict. Once a step names a path, a missing file is an
//! error rather than a reason to try the next step.

use crate::config::ProjectConfig;
use crate::entry::{EntryDescriptor, EntryKind};
use crate::error::{EntryOrigin, ResolveError, ResolveResult};
use crate::framework::detect_framework;
use crate::manifest::PackageManifest;
use crate::scanner::{scan, Candidate, CandidateKind, MAX_SCAN_DEPTH};
use std::path::{Path, PathBuf};

/// Directories smart search never descends into.
pub const SMART_SEARCH_IGNORES: &[&str] = &[
    "node_modules",
    "dist",
    ".git",
    "coverage",
    "test",
    "tests",
    ".next",
    ".cache",
];

/// Resolves the entry point of the project at `root`.
///
/// Returns `Ok(None)` when no ladder step finds anything; callers should
/// treat that as "no usable entry point" and fail loudly.
///
/// # Errors
///
/// - [`ResolveError::RootNotFound`] if `root` is not a directory.
/// - [`ResolveError::MissingEntry`] if `config.entry` or the manifest's
///   `main` names a path that does not exist.
pub fn resolve(root: impl AsRef<Path>, config: &ProjectConfig) -> ResolveResult<Option<EntryDescriptor>> {
    let root = absolute_root(root.as_ref())?;

    if let Some(entry) = &config.entry {
        let path = root.join(entry);
        tracing::debug!("Using configured entry {}", path.display());
        return committed_entry(path, EntryOrigin::Config).map(Some);
    }

    let manifest = PackageManifest::load(&root);

    if let Some(main) = manifest.as_ref().and_then(|m| m.main.as_deref()) {
        let path = root.join(main);
        tracing::debug!("Using package.json main {}", path.display());
        return committed_entry(path, EntryOrigin::Manifest).map(Some);
    }

    if let Some(framework) = detect_framework(&root, manifest.as_ref()) {
        return Ok(Some(EntryDescriptor::framework(root, framework)));
    }

    Ok(best_candidate(scan(&root, SMART_SEARCH_IGNORES, MAX_SCAN_DEPTH)).map(|candidate| {
        tracing::debug!(
            "Smart search picked {} (score {})",
            candidate.path.display(),
            candidate.score
        );
        let kind = match candidate.kind {
            CandidateKind::Html => EntryKind::Html,
            CandidateKind::Script => EntryKind::Script,
        };
        EntryDescriptor {
            path: candidate.path,
            kind,
        }
    }))
}

/// Picks the highest score; among equal scores the first discovered wins.
pub fn best_candidate(candidates: impl IntoIterator<Item = Candidate>) -> Option<Candidate> {
    let mut candidates: Vec<Candidate> = candidates.into_iter().collect();
    // Stable sort keeps discovery order for ties
    candidates.sort_by(|a, b| b.score.cmp(&a.score));
    candidates.into_iter().next()
}

fn committed_entry(path: PathBuf, origin: EntryOrigin) -> ResolveResult<EntryDescriptor> {
    if path.exists() {
        Ok(EntryDescriptor::from_file(path))
    } else {
        Err(ResolveError::MissingEntry { origin, path })
    }
}

fn absolute_root(root: &Path) -> ResolveResult<PathBuf> {
    if !root.is_dir() {
        return Err(ResolveError::RootNotFound(root.to_path_buf()));
    }
    if root.is_absolute() {
        return Ok(root.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|_| ResolveError::RootNotFound(root.to_path_buf()))?;
    Ok(cwd.join(root))
}
