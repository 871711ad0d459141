// Copyright 2026 Bliz Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

// Warn on missing documentation for public items
#![warn(missing_docs)]

//! # Bliz
//!
//! Zero-config entry point detection for front-end projects.
//!
//! Given a project directory, bliz decides what the project *is* without any
//! configuration: a static HTML site, a single JavaScript/TypeScript script,
//! or a project built with a recognised framework (Next.js, Remix, Vite).
//!
//! ## Resolution ladder
//!
//! 1. Explicit `entry` from [`ProjectConfig`]
//! 2. `main` field of `package.json`
//! 3. Framework signature (marker files, app-router pages, dependencies)
//! 4. Smart search over scored candidates
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bliz::{resolve, ProjectConfig};
//!
//! let config = ProjectConfig::default();
//! match resolve("./my-site", &config)? {
//!     Some(entry) => println!("{} ({})", entry.path.display(), entry.kind),
//!     None => eprintln!("no entry point found"),
//! }
//! ```

/// Project configuration supplied by the caller.
pub mod config;
/// Entry descriptors produced by resolution.
pub mod entry;
/// Error types for resolution.
pub mod error;
/// Framework signature table and delegation commands.
pub mod framework;
/// `package.json` parsing.
pub mod manifest;
/// Entry-point resolution ladder.
pub mod resolver;
/// Depth-bounded candidate scanning and scoring.
pub mod scanner;

pub use config::{Platform, ProjectConfig, DEFAULT_PORT};
pub use entry::{EntryDescriptor, EntryKind};
pub use error::{EntryOrigin, ResolveError, ResolveResult};
pub use framework::{detect_framework, Framework};
pub use manifest::PackageManifest;
pub use resolver::{resolve, SMART_SEARCH_IGNORES};
pub use scanner::{scan, score_file, Candidate, CandidateKind, MAX_SCAN_DEPTH};
