// Copyright 2026 Bliz Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Opens the served URL in the user's default browser.

use std::process::{Command, Stdio};
use std::thread::JoinHandle;

fn opener(url: &str) -> Command {
    if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg(url);
        cmd
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", "", url]);
        cmd
    } else {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(url);
        cmd
    }
}

/// Spawns `cmd` with null stdio and reaps it on a background thread.
fn spawn_reaped(mut cmd: Command) -> std::io::Result<JoinHandle<()>> {
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    Ok(std::thread::spawn(move || match child.wait() {
        Ok(status) if !status.success() => tracing::warn!("Browser opener exited with {}", status),
        Ok(_) => {}
        Err(e) => tracing::warn!("Failed to wait for browser opener: {}", e),
    }))
}

/// Launches the platform opener for `url` without waiting for it.
///
/// Failure is reported as a warning only; the server keeps running.
pub fn open_browser(url: &str) -> bool {
    match spawn_reaped(opener(url)) {
        Ok(_) => {
            tracing::debug!("Opened browser at {}", url);
            true
        }
        Err(e) => {
            tracing::warn!("Failed to open browser: {}", e);
            false
        }
    }
}
