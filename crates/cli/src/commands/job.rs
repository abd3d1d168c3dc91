// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Producer & Inspector command handlers: `enqueue`, `get`, `list`,
//! `counts`, `retry` (spec §6.1).

use anyhow::Result;
use clap::Args;
use queuectl_core::{JobState, NewJob, UuidIdGen};
use queuectl_storage::Store;

use crate::output::{print_counts, print_job, print_job_list, OutputFormat};

#[derive(Args)]
pub struct EnqueueArgs {
    /// Shell command to run
    pub command: String,
    /// Explicit job id (a fresh UUID is generated if omitted)
    #[arg(long)]
    pub id: Option<String>,
    /// Retry budget (falls back to the configured `max_retries` default)
    #[arg(long)]
    pub max_retries: Option<u32>,
    /// Dispatch priority; higher runs first (default 0)
    #[arg(long)]
    pub priority: Option<i64>,
    /// Earliest eligible time, as an ISO-8601 timestamp
    #[arg(long)]
    pub next_run_at: Option<String>,
}

pub fn enqueue(store: &Store, args: EnqueueArgs, format: OutputFormat) -> Result<()> {
    let mut new_job = NewJob::new(args.command);
    if let Some(id) = args.id {
        new_job = new_job.with_id(id);
    }
    if let Some(mr) = args.max_retries {
        new_job = new_job.with_max_retries(mr);
    }
    if let Some(p) = args.priority {
        new_job = new_job.with_priority(p);
    }
    if let Some(nra) = args.next_run_at {
        new_job = new_job.with_next_run_at(nra);
    }

    let job = queuectl_storage::enqueue(store, new_job, &UuidIdGen)?;
    print_job(&job, format)
}

pub fn get(store: &Store, id: &str, format: OutputFormat) -> Result<()> {
    let job = store.get(id)?;
    print_job(&job, format)
}

#[derive(Args)]
pub struct ListArgs {
    /// Filter to a single state: pending, processing, completed, dead
    #[arg(long)]
    pub state: Option<String>,
    #[arg(long, default_value_t = 50)]
    pub limit: i64,
    #[arg(long, default_value_t = 0)]
    pub offset: i64,
}

pub fn list(store: &Store, args: ListArgs, format: OutputFormat) -> Result<()> {
    let state = args
        .state
        .as_deref()
        .map(|s| s.parse::<JobState>())
        .transpose()?;
    let jobs = store.list(state, args.limit, args.offset)?;
    print_job_list(&jobs, format)
}

pub fn counts(store: &Store, format: OutputFormat) -> Result<()> {
    let counts = store.counts_by_state()?;
    print_counts(&counts, format)
}

#[derive(Args)]
pub struct RetryArgs {
    pub id: String,
    /// Override the job's retry budget on replay
    #[arg(long)]
    pub max_retries: Option<u32>,
}

pub fn retry(store: &Store, args: RetryArgs, format: OutputFormat) -> Result<()> {
    store.retry_job(&args.id, args.max_retries)?;
    let job = store.get(&args.id)?;
    print_job(&job, format)
}
