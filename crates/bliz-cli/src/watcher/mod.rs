// Copyright 2026 Bliz Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! File system watching for live reload.
//!
//! [`FileWatcher`] watches the project root recursively and hands batches of
//! [`ReloadEvent`]s to a callback. Only changes after the watcher starts are
//! reported; the files already on disk produce no events.
//!
//! # Features
//!
//! - Debounced change events (100ms)
//! - One event per changed path per batch
//! - Watch errors are logged and never stop the watcher

use crate::server::livereload::ReloadEvent;
use notify::{EventKind, RecommendedWatcher, RecursiveMode};
use notify_debouncer_full::{new_debouncer_opt, DebounceEventResult, Debouncer, FileIdMap};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use walkdir::WalkDir;

/// How long changes are collected before a batch is emitted.
pub const DEBOUNCE_TIMEOUT: Duration = Duration::from_millis(100);

/// Watches a directory tree and reports changed files.
///
/// Watching stops when the value is dropped.
pub struct FileWatcher {
    #[allow(dead_code)]
    debouncer: Debouncer<RecommendedWatcher, FileIdMap>,
    root: PathBuf,
}

impl FileWatcher {
    /// Starts watching `root` recursively.
    ///
    /// `on_change` runs on the watcher's thread with the reload events of
    /// each debounced batch. Subdirectories that cannot be watched are
    /// skipped with a warning.
    ///
    /// # Errors
    ///
    /// Fails only if the watcher cannot be created or `root` itself cannot
    /// be watched.
    pub fn new<F>(root: &Path, on_change: F) -> notify::Result<Self>
    where
        F: Fn(Vec<ReloadEvent>) + Send + 'static,
    {
        let root = root.to_path_buf();
        // Backends may report canonical paths (e.g. /private/var on macOS)
        let canonical = std::fs::canonicalize(&root).unwrap_or_else(|_| root.clone());
        let roots = vec![root.clone(), canonical];

        let mut debouncer = new_debouncer_opt::<_, RecommendedWatcher, FileIdMap>(
            DEBOUNCE_TIMEOUT,
            None,
            move |result: DebounceEventResult| match result {
                Ok(events) => {
                    let changed = events
                        .iter()
                        .filter(|event| is_change(&event.kind))
                        .flat_map(|event| event.paths.iter().cloned());
                    let reloads = reload_events(&roots, changed);
                    if !reloads.is_empty() {
                        on_change(reloads);
                    }
                }
                Err(errors) => {
                    for error in errors {
                        tracing::warn!("Watch error: {}", error);
                    }
                }
            },
            FileIdMap::new(),
            notify::Config::default(),
        )?;

        if let Err(e) = debouncer.watch(&root, RecursiveMode::Recursive) {
            tracing::warn!(
                "Recursive watch of {} failed ({}), watching directories individually",
                root.display(),
                e
            );
            watch_each_directory(&mut debouncer, &root)?;
        }

        tracing::debug!("Watching {}", root.display());
        Ok(Self { debouncer, root })
    }

    /// Root directory being watched.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Watches `root` and each readable subdirectory non-recursively.
fn watch_each_directory(debouncer: &mut Debouncer<RecommendedWatcher, FileIdMap>, root: &Path) -> notify::Result<()> {
    debouncer.watch(root, RecursiveMode::NonRecursive)?;

    let subdirectories = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Not watching {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_dir());

    for dir in subdirectories {
        if let Err(e) = debouncer.watch(dir.path(), RecursiveMode::NonRecursive) {
            tracing::warn!("Not watching {}: {}", dir.path().display(), e);
        }
    }
    Ok(())
}

fn is_change(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_))
}

/// Converts changed absolute paths into reload events, one per distinct path.
///
/// Paths are made relative to the first of `roots` that contains them. Paths
/// outside every root are dropped. Order of first appearance is kept.
pub fn reload_events(roots: &[PathBuf], changed: impl IntoIterator<Item = PathBuf>) -> Vec<ReloadEvent> {
    let mut seen = HashSet::new();
    changed
        .into_iter()
        .filter_map(|path| {
            roots
                .iter()
                .find_map(|root| path.strip_prefix(root).ok())
                .filter(|relative| !relative.as_os_str().is_empty())
                .map(ReloadEvent::for_relative_path)
        })
        .filter(|event| seen.insert(event.path().to_string()))
        .collect()
}
