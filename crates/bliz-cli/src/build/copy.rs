// Copyright 2026 Bliz Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Static site copy for HTML projects.

use std::fs;
use std::io;
use std::path::{Component, Path};
use walkdir::WalkDir;

/// Top-level names never copied into the output.
pub const COPY_IGNORES: &[&str] = &[
    "node_modules",
    ".git",
    "bliz.toml",
    "package.json",
    "package-lock.json",
    "pnpm-lock.yaml",
    "yarn.lock",
    "bun.lockb",
    "bun.lock",
];

/// Copies the project tree at `root` into `outdir`, preserving layout.
///
/// Paths whose first component is in `ignores` are skipped, as is `outdir`
/// itself when it lives inside `root`. Returns the number of files copied.
pub fn copy_static(root: &Path, outdir: &Path, ignores: &[&str]) -> io::Result<usize> {
    fs::create_dir_all(outdir)?;

    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            let Ok(relative) = entry.path().strip_prefix(root) else {
                return false;
            };
            !is_ignored(relative, ignores) && !entry.path().starts_with(outdir)
        });

    let mut copied = 0;
    for entry in walker {
        let entry = entry.map_err(io::Error::from)?;
        // Directories appear in the output only through the files they hold
        if entry.file_type().is_dir() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };

        let target = outdir.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(entry.path(), &target)?;
        copied += 1;
    }

    Ok(copied)
}

fn is_ignored(relative: &Path, ignores: &[&str]) -> bool {
    match relative.components().next() {
        Some(Component::Normal(first)) => ignores.iter().any(|ignored| first == *ignored),
        _ => false,
    }
}
