// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker process entry point.
//!
//! Spawned by the supervisor as an independent OS process (never invoked
//! directly by an operator): `queuectl-worker <worker-id>`, with
//! `QUEUECTL_DB_PATH` set in its environment so it opens the same database
//! the supervisor resolved (spec §6.5).

use std::path::PathBuf;

use queuectl_core::shutdown_file_path;
use queuectl_executor::Executor;
use queuectl_storage::Store;
use queuectl_worker::ShutdownSignal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let worker_id: u32 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);

    let db_path = Store::resolve_db_path(None);
    let _log_guard = setup_logging(&db_path, worker_id)?;

    tracing::info!(worker_id, db_path = %db_path.display(), "starting queuectl-worker");

    let store = Store::open(&db_path)?;
    let executor = Executor::new();
    let shutdown = ShutdownSignal::new(shutdown_file_path(&db_path));

    if let Err(e) = queuectl_worker::run(worker_id, &store, &executor, &shutdown).await {
        tracing::error!(worker_id, error = %e, "worker exiting after a fatal store error");
        return Err(e.into());
    }

    Ok(())
}

fn setup_logging(
    db_path: &std::path::Path,
    worker_id: u32,
) -> Result<tracing_appender::non_blocking::WorkerGuard, std::io::Error> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let log_dir: PathBuf = match db_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::never(&log_dir, format!("queuectl-worker-{worker_id}.log"));
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}
