// Copyright 2026 Bliz Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Script bundling through esbuild.
//!
//! Without plugins the esbuild CLI is run directly. Plugins are JavaScript
//! objects, so with plugins the esbuild JS API is driven through `node`
//! instead, loading each plugin module in the configured order.

use super::{BuildError, BuildResult};
use bliz::Platform;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::Instant;

/// Everything a bundler needs for one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleRequest {
    /// Project root; the bundler runs here.
    pub root: PathBuf,
    /// Entry script.
    pub entry: PathBuf,
    /// Directory receiving the bundle and its source map.
    pub outdir: PathBuf,
    /// Target platform.
    pub platform: Platform,
    /// Plugin module specifiers, applied in order.
    pub plugins: Vec<String>,
}

/// Produces a minified bundle with an external source map.
pub trait Bundler: Send + Sync {
    /// Short name used in status output.
    fn name(&self) -> &str;

    /// Bundles `request.entry` into `request.outdir`.
    fn bundle(&self, request: &BundleRequest) -> BuildResult<()>;
}

/// Value esbuild substitutes for `process.env.NODE_ENV`.
const NODE_ENV_DEFINE: &str = "\"production\"";

/// The esbuild bundler.
#[derive(Debug, Clone, Default)]
pub struct EsbuildBundler {
    verbose: bool,
}

impl EsbuildBundler {
    /// Creates an esbuild bundler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Echo esbuild warnings on success.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Project-local esbuild if installed, otherwise `esbuild` from `PATH`.
    pub fn binary(root: &Path) -> PathBuf {
        let name = if cfg!(target_os = "windows") { "esbuild.cmd" } else { "esbuild" };
        let local = root.join("node_modules").join(".bin").join(name);
        if local.is_file() {
            local
        } else {
            PathBuf::from("esbuild")
        }
    }

    /// Command-line arguments for a plugin-free build.
    pub fn cli_args(request: &BundleRequest) -> Vec<String> {
        vec![
            request.entry.to_string_lossy().into_owned(),
            "--bundle".to_string(),
            "--minify".to_string(),
            "--sourcemap".to_string(),
            format!("--outdir={}", request.outdir.to_string_lossy()),
            format!("--platform={}", request.platform),
            "--target=esnext".to_string(),
            format!("--define:process.env.NODE_ENV={}", NODE_ENV_DEFINE),
        ]
    }

    /// Node program that runs the esbuild JS API with plugins.
    pub fn plugin_script(request: &BundleRequest) -> String {
        let options = json!({
            "entryPoints": [request.entry.to_string_lossy()],
            "bundle": true,
            "minify": true,
            "sourcemap": true,
            "outdir": request.outdir.to_string_lossy(),
            "platform": request.platform.as_str(),
            "target": "esnext",
            "define": { "process.env.NODE_ENV": NODE_ENV_DEFINE },
        });
        let root = json!(request.root.to_string_lossy());
        let plugins = json!(request.plugins);

        format!(
            r#"const path = require('path');
const {{ createRequire }} = require('module');
const root = {root};
const load = createRequire(path.join(root, 'package.json'));
const esbuild = load('esbuild');
const plugins = {plugins}.map((spec) => {{
  const mod = load(spec.startsWith('.') ? path.resolve(root, spec) : spec);
  const plugin = mod && mod.__esModule && mod.default ? mod.default : mod;
  return typeof plugin === 'function' ? plugin() : plugin;
}});
esbuild.build(Object.assign({options}, {{ plugins }})).catch(() => process.exit(1));
"#
        )
    }

    fn command(request: &BundleRequest) -> Command {
        if request.plugins.is_empty() {
            let mut cmd = Command::new(Self::binary(&request.root));
            cmd.args(Self::cli_args(request));
            cmd
        } else {
            let mut cmd = Command::new("node");
            cmd.arg("-e").arg(Self::plugin_script(request));
            cmd
        }
    }
}

impl Bundler for EsbuildBundler {
    fn name(&self) -> &str {
        "esbuild"
    }

    fn bundle(&self, request: &BundleRequest) -> BuildResult<()> {
        let start = Instant::now();
        let output: Output = Self::command(request)
            .current_dir(&request.root)
            .output()
            .map_err(|source| BuildError::Spawn {
                tool: self.name().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(BuildError::ToolFailed {
                tool: self.name().to_string(),
                diagnostics: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        if !output.stderr.is_empty() && self.verbose {
            eprintln!("{}", String::from_utf8_lossy(&output.stderr));
        }

        tracing::debug!("esbuild finished in {:?}", start.elapsed());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn request(plugins: Vec<String>) -> BundleRequest {
        BundleRequest {
            root: PathBuf::from("/project"),
            entry: PathBuf::from("/project/src/index.ts"),
            outdir: PathBuf::from("/project/dist"),
            platform: Platform::Node,
            plugins,
        }
    }

    #[test]
    fn test_cli_args() {
        let args = EsbuildBundler::cli_args(&request(Vec::new()));
        assert_eq!(args[0], PathBuf::from("/project/src/index.ts").to_string_lossy());
        assert!(args.contains(&"--bundle".to_string()));
        assert!(args.contains(&"--minify".to_string()));
        assert!(args.contains(&"--sourcemap".to_string()));
        assert!(args.contains(&"--platform=node".to_string()));
        assert!(args.contains(&"--target=esnext".to_string()));
        assert!(args.contains(&"--define:process.env.NODE_ENV=\"production\"".to_string()));
        assert!(args.iter().any(|arg| arg.starts_with("--outdir=")));
    }

    #[test]
    fn test_plugin_script_loads_plugins_in_order() {
        let script = EsbuildBundler::plugin_script(&request(vec![
            "./plugins/first.js".to_string(),
            "esbuild-plugin-second".to_string(),
        ]));

        assert!(script.contains(r#"["./plugins/first.js","esbuild-plugin-second"].map"#));
        assert!(script.contains(r#""platform":"node""#));
        assert!(script.contains(r#""minify":true"#));
        assert!(script.contains("load('esbuild')"));
    }

    #[test]
    fn test_binary_prefers_project_install() {
        let dir = tempdir().unwrap();
        assert_eq!(EsbuildBundler::binary(dir.path()), PathBuf::from("esbuild"));

        let bin = dir.path().join("node_modules").join(".bin");
        fs::create_dir_all(&bin).unwrap();
        let name = if cfg!(target_os = "windows") { "esbuild.cmd" } else { "esbuild" };
        fs::write(bin.join(name), "").unwrap();

        assert_eq!(EsbuildBundler::binary(dir.path()), bin.join(name));
    }
}
