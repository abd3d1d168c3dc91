// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The claim → execute → record loop (spec §4.3).

use std::time::Duration;

use queuectl_core::Job;
use queuectl_executor::Executor;
use queuectl_storage::Store;

use crate::error::WorkerError;
use crate::shutdown::ShutdownSignal;

/// Run the worker loop until `shutdown` is observed between jobs.
///
/// Cancellation is cooperative and coarse: a claimed job always runs to
/// completion (or to the executor's own 300s timeout) before the shutdown
/// check is consulted again.
pub async fn run(worker_id: u32, store: &Store, executor: &Executor, shutdown: &ShutdownSignal) -> Result<(), WorkerError> {
    tracing::info!(worker_id, "worker started");

    while !shutdown.is_set() {
        match store.claim()? {
            None => {
                tokio::time::sleep(Duration::from_secs(poll_interval_secs(store))).await;
            }
            Some(job) => execute_claimed_job(worker_id, store, executor, &job).await?,
        }
    }

    tracing::info!(worker_id, "worker shutting down");
    Ok(())
}

async fn execute_claimed_job(worker_id: u32, store: &Store, executor: &Executor, job: &Job) -> Result<(), WorkerError> {
    tracing::info!(worker_id, job_id = %job.id, command = %job.command, "executing job");

    let result = executor.run(&job.command).await;

    // A write failure here is almost always a transient busy/I/O hiccup, not
    // the fatal corruption that should end a worker's life: log it and move
    // on, leaving the job in `processing` for startup reconciliation to pick
    // back up rather than propagating and killing this worker.
    if result.is_success() {
        match store.finish_success(&job.id, result.exit_code, Some(&result.stdout), Some(&result.stderr)) {
            Ok(()) => tracing::info!(worker_id, job_id = %job.id, "job completed"),
            Err(e) => tracing::error!(
                worker_id,
                job_id = %job.id,
                error = %e,
                "failed to record job success; leaving job for reconciliation"
            ),
        }
    } else {
        let error_message = failure_message(&result.stdout, &result.stderr, result.exit_code);
        match store.finish_failure(
            &job.id,
            result.exit_code,
            Some(&error_message),
            Some(&result.stdout),
            Some(&result.stderr),
            job.attempts,
            job.max_retries,
            backoff_base(store),
        ) {
            Ok(()) => tracing::warn!(
                worker_id,
                job_id = %job.id,
                attempt = job.attempts,
                max_retries = job.max_retries,
                "job failed"
            ),
            Err(e) => tracing::error!(
                worker_id,
                job_id = %job.id,
                error = %e,
                "failed to record job failure; leaving job for reconciliation"
            ),
        }
    }

    Ok(())
}

/// Pick the most informative available message, matching the Python
/// original's `stderr or stdout or f"exit {code}"` fallback chain.
fn failure_message(stdout: &str, stderr: &str, exit_code: i32) -> String {
    if !stderr.is_empty() {
        stderr.to_string()
    } else if !stdout.is_empty() {
        stdout.to_string()
    } else {
        format!("exit {exit_code}")
    }
}

fn poll_interval_secs(store: &Store) -> u64 {
    // A corrupt or non-positive stored value falls back to 1s, same defensive
    // floor the Python original applies on top of the store's own default.
    store
        .get_config_u32("worker_poll_interval")
        .ok()
        .filter(|&v| v > 0)
        .unwrap_or(1) as u64
}

fn backoff_base(store: &Store) -> u32 {
    store.get_config_u32("backoff_base").ok().filter(|&v| v > 0).unwrap_or(2)
}

#[cfg(test)]
#[path = "loop_runner_tests.rs"]
mod tests;
