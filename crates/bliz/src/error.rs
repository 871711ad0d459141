// Copyright 2026 Bliz Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Error types for entry-point resolution.
//!
//! Finding no entry at all is not an error: [`crate::resolve`] returns
//! `Ok(None)` and the caller decides how loudly to fail. Errors are reserved
//! for a ladder step that committed to a path which turned out to be missing,
//! and for an unusable project root.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which ladder step named a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOrigin {
    /// The `entry` field of the project configuration.
    Config,
    /// The `main` field of `package.json`.
    Manifest,
}

impl fmt::Display for EntryOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryOrigin::Config => f.write_str("config `entry`"),
            EntryOrigin::Manifest => f.write_str("package.json `main`"),
        }
    }
}

/// Errors raised while resolving an entry point.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The project root does not exist or is not a directory.
    #[error("Project root not found: {0}")]
    RootNotFound(PathBuf),

    /// A configured entry path does not exist on disk.
    #[error("Entry file named by {origin} not found: {path}")]
    MissingEntry {
        /// Step that named the path.
        origin: EntryOrigin,
        /// The resolved, missing path.
        path: PathBuf,
    },
}

/// Result type for resolution.
pub type ResolveResult<T> = Result<T, ResolveError>;
