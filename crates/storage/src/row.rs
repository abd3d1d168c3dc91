// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mapping between SQLite rows and [`Job`].

use chrono::{DateTime, Utc};
use queuectl_core::{Job, JobState};
use rusqlite::Row;
use std::str::FromStr;

pub const JOB_COLUMNS: &str = "id, command, state, attempts, max_retries, priority, \
     created_at, updated_at, started_at, finished_at, next_run_at, \
     result_code, last_error, stdout, stderr";

pub fn job_from_row(row: &Row<'_>) -> rusqlite::Result<Job> {
    let state_str: String = row.get("state")?;
    let state = JobState::from_str(&state_str).unwrap_or(JobState::Pending);

    Ok(Job {
        id: row.get("id")?,
        command: row.get("command")?,
        state,
        attempts: row.get::<_, i64>("attempts")? as u32,
        max_retries: row.get::<_, i64>("max_retries")? as u32,
        priority: row.get("priority")?,
        created_at: parse_ts(row, "created_at")?,
        updated_at: parse_ts(row, "updated_at")?,
        started_at: parse_ts_opt(row, "started_at")?,
        finished_at: parse_ts_opt(row, "finished_at")?,
        next_run_at: parse_ts_opt(row, "next_run_at")?,
        result_code: row.get("result_code")?,
        last_error: row.get("last_error")?,
        stdout: row.get("stdout")?,
        stderr: row.get("stderr")?,
    })
}

fn parse_ts(row: &Row<'_>, col: &str) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(col)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e)))
}

fn parse_ts_opt(row: &Row<'_>, col: &str) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(col)?;
    match raw {
        None => Ok(None),
        Some(raw) => DateTime::parse_from_rfc3339(&raw)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))),
    }
}
