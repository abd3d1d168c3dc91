// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `queuectl-supervisor` — the long-running process that owns the worker
//! pool (spec §4.4).
//!
//! Never invoked directly by an operator: `manager::start_manager` spawns
//! this binary as a background process with `QUEUECTL_DB_PATH` set in its
//! environment. It is the only process that writes the PID file and the
//! only one that interprets the shutdown file as a command rather than a
//! plain existence check.

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use queuectl_core::{pid_file_path, shutdown_file_path};
use queuectl_storage::Store;
use queuectl_supervisor::markers::{force_kill, process_exists, remove_if_exists, write_pid};

/// How often the monitor loop checks the shutdown file and child liveness.
const MONITOR_INTERVAL: Duration = Duration::from_millis(500);

/// How long to wait for each child to exit gracefully before a forced kill.
const CHILD_JOIN_TIMEOUT: Duration = Duration::from_secs(10);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let worker_count: u32 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .filter(|&n| n > 0)
        .unwrap_or(1);

    let db_path = Store::resolve_db_path(None);
    let _log_guard = setup_logging(&db_path)?;

    tracing::info!(worker_count, db_path = %db_path.display(), "starting queuectl-supervisor");

    let store = Store::open(&db_path)?;
    let report = store.reconcile_stranded()?;
    if report.requeued > 0 || report.dead_lettered > 0 {
        tracing::info!(
            requeued = report.requeued,
            dead_lettered = report.dead_lettered,
            "reconciled stranded jobs from a prior crash"
        );
    }
    drop(store);

    let mut children: Vec<Child> = (0..worker_count)
        .map(|worker_id| spawn_worker(worker_id, &db_path))
        .collect::<Result<_, _>>()?;

    let pid_path = pid_file_path(&db_path);
    let shutdown_path = shutdown_file_path(&db_path);
    write_pid(&pid_path, std::process::id())?;

    monitor(&mut children, &shutdown_path);

    tracing::info!("shutdown requested, joining workers");
    join_children(&mut children);

    remove_if_exists(&pid_path);
    remove_if_exists(&shutdown_path);
    tracing::info!("queuectl-supervisor stopped");
    Ok(())
}

fn spawn_worker(worker_id: u32, db_path: &Path) -> std::io::Result<Child> {
    Command::new(worker_binary_path())
        .arg(worker_id.to_string())
        .env("QUEUECTL_DB_PATH", db_path)
        .stdin(Stdio::null())
        .spawn()
}

fn worker_binary_path() -> PathBuf {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let sibling = dir.join("queuectl-worker");
            if sibling.exists() {
                return sibling;
            }
        }
    }
    PathBuf::from("queuectl-worker")
}

/// Poll until the shutdown file appears or every child has exited on its
/// own. Either way the supervisor proceeds to join/clean up; a child exiting
/// unexpectedly is not auto-respawned (spec §7: only an operator restart
/// replaces a dead worker) — but once none are left alive there is nothing
/// left to supervise, so the loop stops rather than leaving a live PID file
/// over a dead pool.
fn monitor(children: &mut [Child], shutdown_path: &Path) {
    loop {
        if shutdown_path.exists() {
            return;
        }

        let mut any_alive = false;
        for child in children.iter_mut() {
            match child.try_wait() {
                Ok(Some(status)) => {
                    tracing::warn!(pid = child.id(), ?status, "worker process exited unexpectedly");
                }
                Ok(None) => any_alive = true,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to poll worker liveness");
                    any_alive = true;
                }
            }
        }
        if !any_alive {
            tracing::warn!("all workers have exited, shutting down supervisor");
            return;
        }

        std::thread::sleep(MONITOR_INTERVAL);
    }
}

fn join_children(children: &mut [Child]) {
    let deadline = Instant::now() + CHILD_JOIN_TIMEOUT;
    for child in children.iter_mut() {
        loop {
            match child.try_wait() {
                Ok(Some(_)) => break,
                Ok(None) if Instant::now() >= deadline => {
                    tracing::warn!(pid = child.id(), "worker did not exit in time, killing");
                    let _ = child.kill();
                    let _ = child.wait();
                    break;
                }
                Ok(None) => std::thread::sleep(Duration::from_millis(100)),
                Err(_) => break,
            }
        }
        // Belt-and-suspenders: some platforms report try_wait() done while the
        // OS process lingers briefly; make sure it's really gone.
        if process_exists(child.id()) {
            force_kill(child.id());
        }
    }
}

fn setup_logging(db_path: &Path) -> Result<tracing_appender::non_blocking::WorkerGuard, std::io::Error> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let log_dir: PathBuf = match db_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::never(&log_dir, "queuectl.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}
