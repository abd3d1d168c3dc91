// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! PID-file and process-liveness helpers (spec §3.3, §4.4).
//!
//! Liveness is checked the same way the teacher's CLI checks its own daemon:
//! shell out to `kill -0 <pid>` rather than pulling in a `libc`/`nix`
//! dependency the rest of the pack doesn't use.

use std::path::Path;
use std::process::{Command, Stdio};

/// Read and parse the PID file. An unparseable file is treated the same as
/// a missing one, but the caller is responsible for removing it — see
/// [`is_live`] and the stale-marker discipline in spec §4.4.
pub fn read_pid(pid_path: &Path) -> Option<u32> {
    std::fs::read_to_string(pid_path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
}

pub fn write_pid(pid_path: &Path, pid: u32) -> std::io::Result<()> {
    if let Some(parent) = pid_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(pid_path, pid.to_string())
}

pub fn remove_if_exists(path: &Path) {
    if path.exists() {
        let _ = std::fs::remove_file(path);
    }
}

/// `true` if a process with the given PID exists (`kill -0`).
pub fn process_exists(pid: u32) -> bool {
    kill_signal("-0", pid)
}

pub fn terminate(pid: u32) -> bool {
    kill_signal("-15", pid)
}

pub fn force_kill(pid: u32) -> bool {
    kill_signal("-9", pid)
}

fn kill_signal(signal: &str, pid: u32) -> bool {
    Command::new("kill")
        .args([signal, &pid.to_string()])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Stale-marker discipline (spec §4.4): any observation of an unparseable or
/// dead-PID PID file removes it. Returns the live PID if the supervisor is
/// actually running.
pub fn live_pid(pid_path: &Path) -> Option<u32> {
    match read_pid(pid_path) {
        Some(pid) if process_exists(pid) => Some(pid),
        _ => {
            remove_if_exists(pid_path);
            None
        }
    }
}

#[cfg(test)]
#[path = "markers_tests.rs"]
mod tests;
