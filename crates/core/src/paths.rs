// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem liveness markers (spec §3.3): the PID file and shutdown file
//! both live alongside the database, since that's the one location every
//! cooperating process (CLI, supervisor, worker) already agrees on.

use std::path::{Path, PathBuf};

fn data_dir(db_path: &Path) -> PathBuf {
    match db_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Path to the file holding the supervisor's PID as decimal text.
pub fn pid_file_path(db_path: &Path) -> PathBuf {
    data_dir(db_path).join("worker_manager.pid")
}

/// Path to the sentinel file whose presence requests graceful shutdown.
pub fn shutdown_file_path(db_path: &Path) -> PathBuf {
    data_dir(db_path).join("worker_manager.shutdown")
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
