// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The control surface a CLI process drives: `start_manager`,
//! `stop_manager`, `is_manager_running`, `worker_count` (spec §4.4).
//!
//! These functions never run the monitor loop themselves — they spawn (or
//! signal) the separate `queuectl-supervisor` process that does, and
//! observe it only through the filesystem markers in [`crate::markers`].

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use queuectl_core::{pid_file_path, shutdown_file_path};

use crate::error::SupervisorError;
use crate::markers::{force_kill, live_pid, process_exists, remove_if_exists};

const START_LIVENESS_TIMEOUT: Duration = Duration::from_secs(2);
const STOP_POLL_TIMEOUT: Duration = Duration::from_secs(10);
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Start `n` workers under a freshly spawned supervisor process.
///
/// Refuses if a supervisor is already live. Supplemented from the Python
/// original's `worker_manager.py` (silent in the distilled spec): waits
/// briefly after spawn and re-verifies liveness before reporting success.
pub fn start_manager(worker_count_requested: u32, db_path: &Path) -> Result<(), SupervisorError> {
    let pid_path = pid_file_path(db_path);
    let shutdown_path = shutdown_file_path(db_path);

    if live_pid(&pid_path).is_some() {
        return Err(SupervisorError::AlreadyRunning);
    }
    remove_if_exists(&shutdown_path);

    Command::new(supervisor_binary_path())
        .arg(worker_count_requested.to_string())
        .env("QUEUECTL_DB_PATH", db_path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| SupervisorError::StartFailed(e.to_string()))?;

    let deadline = Instant::now() + START_LIVENESS_TIMEOUT;
    while Instant::now() < deadline {
        if live_pid(&pid_path).is_some() {
            return Ok(());
        }
        thread::sleep(Duration::from_millis(50));
    }

    Err(SupervisorError::StartFailed(
        "supervisor did not report liveness after spawn".to_string(),
    ))
}

/// Request graceful shutdown, escalating to a forceful kill if the
/// supervisor doesn't exit within the poll window.
pub fn stop_manager(db_path: &Path) -> Result<(), SupervisorError> {
    stop_manager_with_timeout(db_path, STOP_POLL_TIMEOUT, STOP_POLL_INTERVAL)
}

pub(crate) fn stop_manager_with_timeout(
    db_path: &Path,
    poll_timeout: Duration,
    poll_interval: Duration,
) -> Result<(), SupervisorError> {
    let pid_path = pid_file_path(db_path);
    let shutdown_path = shutdown_file_path(db_path);

    let Some(pid) = live_pid(&pid_path) else {
        remove_if_exists(&shutdown_path);
        return Err(SupervisorError::NotRunning);
    };

    std::fs::write(&shutdown_path, "")?;

    let deadline = Instant::now() + poll_timeout;
    while Instant::now() < deadline && process_exists(pid) {
        thread::sleep(poll_interval);
    }

    if process_exists(pid) {
        force_kill(pid);
    }

    remove_if_exists(&pid_path);
    remove_if_exists(&shutdown_path);
    Ok(())
}

pub fn is_manager_running(db_path: &Path) -> bool {
    live_pid(&pid_file_path(db_path)).is_some()
}

/// Count of direct children of the supervisor process, or 0 if it isn't
/// running. POSIX-only (`pgrep -P`), matching the teacher's `kill`-based
/// liveness checks rather than pulling in a `libc`/`nix` dependency.
pub fn worker_count(db_path: &Path) -> u32 {
    let Some(pid) = live_pid(&pid_file_path(db_path)) else {
        return 0;
    };
    count_children(pid)
}

fn count_children(pid: u32) -> u32 {
    Command::new("pgrep")
        .args(["-P", &pid.to_string()])
        .output()
        .map(|out| {
            String::from_utf8_lossy(&out.stdout)
                .lines()
                .filter(|line| !line.trim().is_empty())
                .count() as u32
        })
        .unwrap_or(0)
}

fn supervisor_binary_path() -> PathBuf {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let sibling = dir.join("queuectl-supervisor");
            if sibling.exists() {
                return sibling;
            }
        }
    }
    PathBuf::from("queuectl-supervisor")
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
