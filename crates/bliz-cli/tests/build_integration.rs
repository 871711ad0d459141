// Copyright 2026 Bliz Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Integration tests for production builds.
//!
//! Bundled builds use a recording bundler so no esbuild install is needed.

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use bliz::{resolve, EntryKind, Framework, Platform, ProjectConfig};
use bliz_cli::build::{
    BuildError, BuildMode, BuildOrchestrator, BuildResult, BundleRequest, Bundler, DelegateCommand, DelegateError,
};
use bliz_cli::config::Project;
use tempfile::tempdir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[derive(Clone, Default)]
struct RecordingBundler {
    requests: Arc<Mutex<Vec<BundleRequest>>>,
    fail: bool,
}

impl Bundler for RecordingBundler {
    fn name(&self) -> &str {
        "recording"
    }

    fn bundle(&self, request: &BundleRequest) -> BuildResult<()> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(BuildError::ToolFailed {
                tool: self.name().to_string(),
                diagnostics: "✘ [ERROR] Could not resolve \"missing\"".to_string(),
            });
        }
        fs::write(request.outdir.join("index.js"), "bundled")?;
        fs::write(request.outdir.join("index.js.map"), "{}")?;
        Ok(())
    }
}

#[tokio::test]
async fn test_static_site_build() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "index.html", "<html><body>hi</body></html>");
    write(root, "css/site.css", "body { color: red }");
    write(root, "img/logo.svg", "<svg/>");
    write(root, "node_modules/lib/index.js", "");
    write(root, "package.json", "{}");
    write(root, "dist/stale.html", "old");

    let project = Project::load(root, &ProjectConfig::default()).unwrap();
    let entry = resolve(&project.root, &project.config).unwrap().unwrap();
    assert_eq!(entry.kind, EntryKind::Html);

    let mode = BuildOrchestrator::new(project).build(Some(&entry)).await.unwrap();
    assert_eq!(mode, BuildMode::Static);

    let dist = root.join("dist");
    // Copied verbatim, without the reload client
    assert_eq!(
        fs::read_to_string(dist.join("index.html")).unwrap(),
        "<html><body>hi</body></html>"
    );
    assert!(dist.join("css/site.css").is_file());
    assert!(dist.join("img/logo.svg").is_file());
    assert!(!dist.join("dist").exists());
    assert!(!dist.join("stale.html").exists());
    assert!(!dist.join("node_modules").exists());
    assert!(!dist.join("package.json").exists());
}

#[tokio::test]
async fn test_static_build_honours_configured_outdir() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "index.html", "<body></body>");
    write(root, "bliz.toml", "outdir = \"public\"\n");

    let project = Project::load(root, &ProjectConfig::default()).unwrap();
    let entry = resolve(&project.root, &project.config).unwrap();
    BuildOrchestrator::new(project).build(entry.as_ref()).await.unwrap();

    assert!(root.join("public/index.html").is_file());
    assert!(!root.join("public/public").exists());
    assert!(!root.join("public/bliz.toml").exists());
}

#[tokio::test]
async fn test_node_script_bundle() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "src/index.js", "#!/usr/bin/env node\nconsole.log('cli')\n");
    write(root, "dist/old.js", "stale");

    let project = Project::load(root, &ProjectConfig::default()).unwrap();
    let entry = resolve(&project.root, &project.config).unwrap().unwrap();
    assert_eq!(entry.kind, EntryKind::Script);

    let bundler = RecordingBundler::default();
    let orchestrator = BuildOrchestrator::new(project).with_bundler(bundler.clone());
    orchestrator.build(Some(&entry)).await.unwrap();

    let requests = bundler.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].platform, Platform::Node);
    assert_eq!(requests[0].entry, root.join("src/index.js"));
    assert_eq!(requests[0].outdir, root.join("dist"));

    assert!(root.join("dist/index.js").is_file());
    assert!(root.join("dist/index.js.map").is_file());
    assert!(!root.join("dist/old.js").exists());
}

#[tokio::test]
async fn test_browser_script_bundle_with_plugins() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "src/main.ts", "document.body.append('hi')\n");
    write(
        root,
        "bliz.toml",
        "plugins = [\"./plugins/svg.js\", \"esbuild-plugin-env\"]\n",
    );

    let project = Project::load(root, &ProjectConfig::default()).unwrap();
    let entry = resolve(&project.root, &project.config).unwrap();

    let bundler = RecordingBundler::default();
    BuildOrchestrator::new(project)
        .with_bundler(bundler.clone())
        .build(entry.as_ref())
        .await
        .unwrap();

    let requests = bundler.requests.lock().unwrap();
    assert_eq!(requests[0].platform, Platform::Browser);
    assert_eq!(requests[0].plugins, vec!["./plugins/svg.js", "esbuild-plugin-env"]);
}

#[tokio::test]
async fn test_bundler_failure_carries_diagnostics() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "index.ts", "import 'missing'\n");

    let project = Project::load(root, &ProjectConfig::default()).unwrap();
    let entry = resolve(&project.root, &project.config).unwrap();

    let bundler = RecordingBundler {
        fail: true,
        ..Default::default()
    };
    let err = BuildOrchestrator::new(project)
        .with_bundler(bundler)
        .build(entry.as_ref())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Could not resolve"));
}

#[tokio::test]
async fn test_build_without_entry_fails() {
    let dir = tempdir().unwrap();
    write(dir.path(), "notes.md", "# nothing to build");

    let project = Project::load(dir.path(), &ProjectConfig::default()).unwrap();
    let entry = resolve(&project.root, &project.config).unwrap();
    assert!(entry.is_none());

    let err = BuildOrchestrator::new(project).build(entry.as_ref()).await.unwrap_err();
    assert!(matches!(err, BuildError::NoEntryPoint));
    assert!(!dir.path().join("dist").exists());
}

#[tokio::test]
async fn test_outdir_holding_the_entry_is_refused() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "src/index.js", "import './util.js'\n");
    write(root, "src/util.js", "export const x = 1\n");

    let overrides = ProjectConfig {
        outdir: Some("src".into()),
        ..Default::default()
    };
    let project = Project::load(root, &overrides).unwrap();
    let entry = resolve(&project.root, &project.config).unwrap().unwrap();

    let bundler = RecordingBundler::default();
    let err = BuildOrchestrator::new(project)
        .with_bundler(bundler.clone())
        .build(Some(&entry))
        .await
        .unwrap_err();

    assert!(matches!(err, BuildError::UnsafeOutdir(_)));
    assert!(bundler.requests.lock().unwrap().is_empty());
    assert!(root.join("src/index.js").is_file());
    assert!(root.join("src/util.js").is_file());
}

#[cfg(unix)]
#[tokio::test]
async fn test_framework_build_is_delegated() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "vite.config.ts", "export default {}\n");
    write(root, "index.html", "<body></body>");

    let project = Project::load(root, &ProjectConfig::default()).unwrap();
    let entry = resolve(&project.root, &project.config).unwrap().unwrap();
    assert_eq!(entry.kind, EntryKind::Framework(Framework::Vite));

    let bundler = RecordingBundler::default();
    let mode = BuildOrchestrator::new(project)
        .with_bundler(bundler.clone())
        .with_framework_command(DelegateCommand::new("sh", &["-c", "mkdir -p dist && touch dist/app.js"]))
        .build(Some(&entry))
        .await
        .unwrap();

    assert_eq!(mode, BuildMode::Framework(Framework::Vite));
    assert!(root.join("dist/app.js").is_file());
    assert!(bundler.requests.lock().unwrap().is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn test_failed_framework_build_is_fatal() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "vite.config.js", "export default {}\n");

    let project = Project::load(root, &ProjectConfig::default()).unwrap();
    let entry = resolve(&project.root, &project.config).unwrap();

    let err = BuildOrchestrator::new(project)
        .with_framework_command(DelegateCommand::new("sh", &["-c", "exit 3"]))
        .build(entry.as_ref())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        BuildError::Delegate(DelegateError::Failed { code: Some(3), .. })
    ));
    assert!(!root.join("dist").exists());
}
