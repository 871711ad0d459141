// Copyright 2026 Bliz Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

// Warn on missing documentation for public items
#![warn(missing_docs)]

//! Bliz CLI library.
//!
//! Command-line front end for the bliz entry-point resolver: a development
//! server with live reload and a production build that picks its mode from
//! whatever the project turns out to be.
//!
//! # Features
//!
//! - **Development server** with WebSocket live reload
//! - **Framework delegation** for Next.js, Remix and Vite projects
//! - **Static builds** for plain HTML sites
//! - **Bundled builds** for script entries via esbuild
//!
//! # Usage
//!
//! ```bash
//! bliz dev      # Serve the project with live reload
//! bliz build    # Build for production
//! ```
//!
//! # Configuration
//!
//! Projects may carry a `bliz.toml` at the root; flags override it.

/// Production build orchestration.
pub mod build;
/// CLI commands (dev, build).
pub mod commands;
/// Project configuration from `bliz.toml`.
pub mod config;
/// Development server with live reload.
pub mod server;
/// File system watching for live reload.
pub mod watcher;
