// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `queuectl start/stop/status` — thin wrapper over the supervisor control
//! surface (spec §4.4, §6.2). No behavior of its own beyond argument
//! parsing and delegating to `queuectl-supervisor`.

use std::path::Path;

use anyhow::Result;
use queuectl_supervisor::{is_manager_running, start_manager, stop_manager, worker_count};

use crate::output::{print_status, OutputFormat};

pub fn start(db_path: &Path, n: u32) -> Result<()> {
    start_manager(n, db_path)?;
    println!("started {n} worker(s)");
    Ok(())
}

pub fn stop(db_path: &Path) -> Result<()> {
    stop_manager(db_path)?;
    println!("stopped");
    Ok(())
}

pub fn status(db_path: &Path, format: OutputFormat) -> Result<()> {
    let running = is_manager_running(db_path);
    let count = if running { worker_count(db_path) } else { 0 };
    print_status(running, count, format)
}
