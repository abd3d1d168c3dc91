// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting shared across command handlers.

use clap::ValueEnum;
use queuectl_core::{Job, JobCounts};
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print a single job, in the requested format.
pub fn print_job(job: &Job, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(job)?),
        OutputFormat::Text => {
            println!("id:           {}", job.id);
            println!("state:        {}", job.state);
            println!("command:      {}", job.command);
            println!("attempts:     {}/{}", job.attempts, job.max_retries);
            println!("priority:     {}", job.priority);
            println!("created_at:   {}", job.created_at);
            println!("updated_at:   {}", job.updated_at);
            if let Some(ts) = job.started_at {
                println!("started_at:   {ts}");
            }
            if let Some(ts) = job.finished_at {
                println!("finished_at:  {ts}");
            }
            if let Some(ts) = job.next_run_at {
                println!("next_run_at:  {ts}");
            }
            if let Some(code) = job.result_code {
                println!("result_code:  {code}");
            }
            if let Some(err) = &job.last_error {
                println!("last_error:   {err}");
            }
            if let Some(out) = &job.stdout {
                println!("stdout:\n{out}");
            }
            if let Some(err) = &job.stderr {
                println!("stderr:\n{err}");
            }
        }
    }
    Ok(())
}

/// Print a list of jobs as a fixed-width table, or as JSON.
pub fn print_job_list(jobs: &[Job], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(jobs)?),
        OutputFormat::Text => {
            if jobs.is_empty() {
                println!("No jobs.");
                return Ok(());
            }
            println!(
                "{:<36}  {:<10}  {:>5}  {:>8}  {}",
                "ID", "STATE", "PRIO", "ATTEMPTS", "COMMAND"
            );
            for job in jobs {
                println!(
                    "{:<36}  {:<10}  {:>5}  {:>8}  {}",
                    truncate(&job.id, 36),
                    job.state,
                    job.priority,
                    format!("{}/{}", job.attempts, job.max_retries),
                    truncate(&job.command, 60),
                );
            }
        }
    }
    Ok(())
}

pub fn print_counts(counts: &JobCounts, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(counts)?),
        OutputFormat::Text => {
            println!("pending:    {}", counts.pending);
            println!("processing: {}", counts.processing);
            println!("completed:  {}", counts.completed);
            println!("failed:     {}", counts.failed);
            println!("dead:       {}", counts.dead);
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct StatusReport {
    running: bool,
    worker_count: u32,
}

pub fn print_status(running: bool, worker_count: u32, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&StatusReport { running, worker_count })?)
        }
        OutputFormat::Text => {
            if running {
                println!("supervisor: running ({worker_count} workers)");
            } else {
                println!("supervisor: not running");
            }
        }
    }
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{truncated}…")
}
