// Copyright 2026 Bliz Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! The answer to "what is this project?".

use crate::framework::Framework;
use std::fmt;
use std::path::{Path, PathBuf};

/// What kind of project an entry point represents.
///
/// A framework project carries the framework it was detected as, so a
/// framework name exists exactly when the kind is [`EntryKind::Framework`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A static HTML page.
    Html,
    /// A single JavaScript/TypeScript script.
    Script,
    /// A project driven by a framework's own tooling.
    Framework(Framework),
}

impl EntryKind {
    /// Short label used in status output.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Html => "html",
            EntryKind::Script => "script",
            EntryKind::Framework(_) => "framework",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Framework(framework) => write!(f, "framework ({})", framework),
            other => f.write_str(other.as_str()),
        }
    }
}

/// A resolved entry point. Immutable once produced.
///
/// `path` existed on disk when the descriptor was created; consumers do not
/// re-validate it. For framework projects it is the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDescriptor {
    /// Absolute file path, or the project root for framework projects.
    pub path: PathBuf,
    /// Classification of the entry.
    pub kind: EntryKind,
}

impl EntryDescriptor {
    /// Classifies a file by extension: `.html` is HTML, anything else a script.
    pub fn from_file(path: PathBuf) -> Self {
        let kind = if has_html_extension(&path) {
            EntryKind::Html
        } else {
            EntryKind::Script
        };
        Self { path, kind }
    }

    /// Descriptor for a framework project rooted at `root`.
    pub fn framework(root: PathBuf, framework: Framework) -> Self {
        Self {
            path: root,
            kind: EntryKind::Framework(framework),
        }
    }

    /// The detected framework, if this is a framework project.
    pub fn framework_kind(&self) -> Option<Framework> {
        match self.kind {
            EntryKind::Framework(framework) => Some(framework),
            _ => None,
        }
    }

    /// The detected framework's name, if this is a framework project.
    pub fn framework_name(&self) -> Option<&'static str> {
        self.framework_kind().map(|framework| framework.name())
    }

    /// Returns true for static HTML entries.
    pub fn is_html(&self) -> bool {
        self.kind == EntryKind::Html
    }
}

pub(crate) fn has_html_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html"))
}
