// Copyright 2026 Bliz Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Candidate scanning for smart entry search.
//!
//! [`scan`] walks a project tree down to a fixed depth and yields every file
//! that could serve as an entry point, together with its score. Traversal and
//! scoring are separate: [`score_file`] is a pure function of a root-relative
//! path and a depth, driven by the tables below.
//!
//! # Scoring
//!
//! | Rule                                   | Points       |
//! |----------------------------------------|--------------|
//! | `.html`                                | 20           |
//! | `.js` / `.jsx` / `.ts` / `.tsx`        | 10           |
//! | base name `index`                      | +5           |
//! | base name `main`                       | +3           |
//! | first path component is `src`          | +2           |
//! | depth bonus                            | `10 - depth` |
//!
//! Files with any other extension are not candidates.

use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Deepest directory level the scanner descends into (root is depth 0).
pub const MAX_SCAN_DEPTH: usize = 3;

/// Kind of file a candidate would resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    /// An HTML page.
    Html,
    /// A JavaScript/TypeScript module.
    Script,
}

/// A file provisionally eligible to be the entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Absolute path of the file.
    pub path: PathBuf,
    /// Kind of entry this file would be.
    pub kind: CandidateKind,
    /// Ranking score; higher wins.
    pub score: i32,
}

/// Base weight by (lowercased) extension.
const EXTENSION_WEIGHTS: &[(&str, CandidateKind, i32)] = &[
    ("html", CandidateKind::Html, 20),
    ("js", CandidateKind::Script, 10),
    ("jsx", CandidateKind::Script, 10),
    ("ts", CandidateKind::Script, 10),
    ("tsx", CandidateKind::Script, 10),
];

/// Additive bonus by (lowercased) base name, extension stripped.
const NAME_BONUSES: &[(&str, i32)] = &[("index", 5), ("main", 3)];

/// Bonus for files under a top-level source directory.
const SOURCE_DIR_BONUS: (&str, i32) = ("src", 2);

/// Shallower files outrank deeper ones by `DEPTH_BONUS_BASE - depth`.
const DEPTH_BONUS_BASE: i32 = 10;

/// Scores a file given its path relative to the resolution root and the
/// depth of its containing directory.
///
/// Returns `None` for files that are not entry candidates.
pub fn score_file(relative: &Path, depth: usize) -> Option<(CandidateKind, i32)> {
    let ext = relative.extension()?.to_str()?.to_lowercase();
    let (kind, mut score) = EXTENSION_WEIGHTS
        .iter()
        .find(|(candidate_ext, _, _)| *candidate_ext == ext)
        .map(|(_, kind, weight)| (*kind, *weight))?;

    let name = relative
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    score += NAME_BONUSES
        .iter()
        .filter(|(bonus_name, _)| *bonus_name == name)
        .map(|(_, bonus)| bonus)
        .sum::<i32>();

    let (source_dir, source_bonus) = SOURCE_DIR_BONUS;
    if is_under(relative, source_dir) {
        score += source_bonus;
    }

    let depth = i32::try_from(depth).unwrap_or(i32::MAX);
    score += DEPTH_BONUS_BASE.saturating_sub(depth);

    Some((kind, score))
}

/// Lazily scans `root` for entry candidates.
///
/// Descends into subdirectories that are neither hidden nor named in
/// `ignores`, stopping below `max_depth`. Unreadable directories and entries
/// that vanish mid-walk are skipped; the scan itself never fails. Entries are
/// visited depth-first in file-name order, which is the discovery order the
/// resolver's stable sort preserves for equal scores.
///
/// Each call walks the filesystem afresh; nothing is cached.
pub fn scan<'a>(
    root: &Path,
    ignores: &'a [&'a str],
    max_depth: usize,
) -> impl Iterator<Item = Candidate> + 'a {
    let base = root.to_path_buf();

    WalkDir::new(root)
        .min_depth(1)
        .max_depth(max_depth + 1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |entry| entry.depth() == 0 || is_traversable(entry, ignores))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!("Skipping unreadable path during scan: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter_map(move |entry| {
            let relative = entry.path().strip_prefix(&base).ok()?;
            // Files directly in the root sit at depth 0
            let depth = entry.depth() - 1;
            let (kind, score) = score_file(relative, depth)?;
            Some(Candidate {
                path: entry.path().to_path_buf(),
                kind,
                score,
            })
        })
}

fn is_traversable(entry: &DirEntry, ignores: &[&str]) -> bool {
    if !entry.file_type().is_dir() {
        return true;
    }
    match entry.file_name().to_str() {
        Some(name) => !name.starts_with('.') && !ignores.contains(&name),
        None => true,
    }
}

fn is_under(relative: &Path, dir: &str) -> bool {
    let mut components = relative.components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(first)), Some(_)) => first == dir,
        _ => false,
    }
}
