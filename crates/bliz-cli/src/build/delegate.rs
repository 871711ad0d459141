// Copyright 2026 Bliz Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Delegation to a framework's own CLI.
//!
//! A project script (`scripts.dev` / `scripts.build`) is preferred and run
//! through the package manager whose lockfile is present. Without one, the
//! framework CLI is run through `npx`.

use bliz::{Framework, PackageManifest};
use std::fmt;
use std::path::Path;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command as TokioCommand;

/// Failure running a delegated command.
#[derive(Debug, Error)]
pub enum DelegateError {
    /// The command could not be started.
    #[error("Failed to start `{command}`: {source}")]
    Spawn {
        /// Command line that failed to start.
        command: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The command exited unsuccessfully.
    #[error("`{command}` exited with {}", exit_description(.code))]
    Failed {
        /// Command line that failed.
        command: String,
        /// Exit code, if the process exited normally.
        code: Option<i32>,
    },
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {}", code),
        None => "a signal".to_string(),
    }
}

/// What the framework is asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Start the framework's development server.
    Dev,
    /// Produce a production build.
    Build,
}

impl Task {
    /// Name of the `package.json` script for this task.
    pub fn script_name(&self) -> &'static str {
        match self {
            Task::Dev => "dev",
            Task::Build => "build",
        }
    }

    fn framework_args(&self, framework: Framework) -> &'static [&'static str] {
        match self {
            Task::Dev => framework.dev_args(),
            Task::Build => framework.build_args(),
        }
    }
}

/// JavaScript package manager, chosen by lockfile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    /// npm (the default).
    Npm,
    /// pnpm
    Pnpm,
    /// Yarn
    Yarn,
    /// Bun
    Bun,
}

/// Lockfiles in detection order.
const LOCKFILES: &[(&str, PackageManager)] = &[
    ("pnpm-lock.yaml", PackageManager::Pnpm),
    ("yarn.lock", PackageManager::Yarn),
    ("bun.lockb", PackageManager::Bun),
    ("bun.lock", PackageManager::Bun),
];

impl PackageManager {
    /// Picks the package manager whose lockfile is in `root`, or npm.
    pub fn detect(root: &Path) -> Self {
        LOCKFILES
            .iter()
            .find(|(lockfile, _)| root.join(lockfile).is_file())
            .map(|(_, manager)| *manager)
            .unwrap_or(PackageManager::Npm)
    }

    /// Executable name.
    pub fn program(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "yarn",
            PackageManager::Bun => "bun",
        }
    }
}

/// An external command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegateCommand {
    /// Program to run.
    pub program: String,
    /// Arguments.
    pub args: Vec<String>,
}

impl DelegateCommand {
    /// Command running `program` with `args`.
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
        }
    }

    /// Command that performs `task` for `framework` in `root`.
    pub fn for_framework(root: &Path, framework: Framework, manifest: Option<&PackageManifest>, task: Task) -> Self {
        let script = task.script_name();
        if manifest.and_then(|m| m.script(script)).is_some() {
            let manager = PackageManager::detect(root);
            return Self::new(manager.program(), &["run", script]);
        }

        let mut args = vec![framework.cli()];
        args.extend_from_slice(task.framework_args(framework));
        Self::new("npx", &args)
    }

    fn command(&self) -> TokioCommand {
        // Package manager shims are batch files on Windows
        if cfg!(target_os = "windows") {
            let mut cmd = TokioCommand::new("cmd");
            cmd.arg("/C").arg(&self.program).args(&self.args);
            cmd
        } else {
            let mut cmd = TokioCommand::new(&self.program);
            cmd.args(&self.args);
            cmd
        }
    }

    /// Runs the command in `root` with inherited stdio and waits for it.
    pub async fn run(&self, root: &Path) -> Result<(), DelegateError> {
        tracing::debug!("Running `{}` in {}", self, root.display());

        let status = self
            .command()
            .current_dir(root)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|source| DelegateError::Spawn {
                command: self.to_string(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(DelegateError::Failed {
                command: self.to_string(),
                code: status.code(),
            })
        }
    }
}

impl fmt::Display for DelegateCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn manifest(json: &str) -> PackageManifest {
        PackageManifest::parse(json).unwrap()
    }

    #[test]
    fn test_lockfile_detection() {
        let dir = tempdir().unwrap();
        assert_eq!(PackageManager::detect(dir.path()), PackageManager::Npm);

        fs::write(dir.path().join("yarn.lock"), "").unwrap();
        assert_eq!(PackageManager::detect(dir.path()), PackageManager::Yarn);

        fs::write(dir.path().join("pnpm-lock.yaml"), "").unwrap();
        assert_eq!(PackageManager::detect(dir.path()), PackageManager::Pnpm);
    }

    #[test]
    fn test_project_script_is_preferred() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("pnpm-lock.yaml"), "").unwrap();
        let manifest = manifest(r#"{ "scripts": { "dev": "next dev -p 4000", "build": "next build" } }"#);

        let dev = DelegateCommand::for_framework(dir.path(), Framework::NextJs, Some(&manifest), Task::Dev);
        assert_eq!(dev.to_string(), "pnpm run dev");

        let build = DelegateCommand::for_framework(dir.path(), Framework::NextJs, Some(&manifest), Task::Build);
        assert_eq!(build.to_string(), "pnpm run build");
    }

    #[test]
    fn test_framework_cli_fallback() {
        let dir = tempdir().unwrap();
        let manifest = manifest(r#"{ "scripts": { "test": "vitest" } }"#);

        let cases = [
            (Framework::NextJs, Task::Dev, "npx next dev"),
            (Framework::Remix, Task::Dev, "npx remix dev"),
            (Framework::Vite, Task::Dev, "npx vite"),
            (Framework::NextJs, Task::Build, "npx next build"),
            (Framework::Vite, Task::Build, "npx vite build"),
        ];
        for (framework, task, expected) in cases {
            let command = DelegateCommand::for_framework(dir.path(), framework, Some(&manifest), task);
            assert_eq!(command.to_string(), expected);
        }

        let no_manifest = DelegateCommand::for_framework(dir.path(), Framework::Remix, None, Task::Build);
        assert_eq!(no_manifest.to_string(), "npx remix build");
    }

    #[test]
    fn test_failure_message() {
        let err = DelegateError::Failed {
            command: "npm run build".to_string(),
            code: Some(2),
        };
        assert_eq!(err.to_string(), "`npm run build` exited with code 2");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_reports_exit_status() {
        let dir = tempdir().unwrap();

        DelegateCommand::new("sh", &["-c", "exit 0"]).run(dir.path()).await.unwrap();

        let err = DelegateCommand::new("sh", &["-c", "exit 3"]).run(dir.path()).await.unwrap_err();
        match err {
            DelegateError::Failed { command, code } => {
                assert_eq!(command, "sh -c exit 3");
                assert_eq!(code, Some(3));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_in_project_root() {
        let dir = tempdir().unwrap();
        DelegateCommand::new("sh", &["-c", "touch built"]).run(dir.path()).await.unwrap();
        assert!(dir.path().join("built").is_file());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_missing_program_is_a_spawn_error() {
        let dir = tempdir().unwrap();
        let err = DelegateCommand::new("bliz-no-such-program", &[])
            .run(dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, DelegateError::Spawn { .. }));
    }
}
