// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job record and its state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Output streams are truncated to this many bytes (by head) before storage.
pub const MAX_OUTPUT_BYTES: usize = 10_000;

/// `last_error` is truncated to this many bytes (by head) before storage.
pub const MAX_ERROR_BYTES: usize = 2_000;

/// Truncate a byte string to at most `max` bytes, cutting on a UTF-8
/// boundary so the result is always valid `str` data.
pub fn truncate_bytes(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    s[..end].to_string()
}

/// State of a job as it moves through the queue.
///
/// `Failed` is carried for forward-compatibility with stores that persist it
/// as a transient bookkeeping state, but the state machine this crate drives
/// only ever produces `Pending`, `Processing`, `Completed`, and `Dead`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Pending,
    Processing,
    Completed,
    Failed,
    Dead,
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Pending => "pending",
            JobState::Processing => "processing",
            JobState::Completed => "completed",
            JobState::Failed => "failed",
            JobState::Dead => "dead",
        }
    }

    /// Terminal states are immutable except via DLQ replay (only from `Dead`).
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Dead)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for JobState {
    type Err = UnknownJobState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(JobState::Pending),
            "processing" => Ok(JobState::Processing),
            "completed" => Ok(JobState::Completed),
            "failed" => Ok(JobState::Failed),
            "dead" => Ok(JobState::Dead),
            other => Err(UnknownJobState(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown job state: {0}")]
pub struct UnknownJobState(pub String);

/// A job record, as persisted by the store (spec §3.1).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Job {
    pub id: String,
    pub command: String,
    pub state: JobState,
    pub attempts: u32,
    pub max_retries: u32,
    pub priority: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub next_run_at: Option<DateTime<Utc>>,
    pub result_code: Option<i32>,
    pub last_error: Option<String>,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
}

/// Fields a caller supplies when enqueuing a new job; everything else is
/// defaulted by the Producer API (spec §4.5).
#[derive(Debug, Clone)]
pub struct NewJob {
    pub id: Option<String>,
    pub command: String,
    pub max_retries: Option<u32>,
    pub priority: Option<i64>,
    pub next_run_at: Option<String>,
}

impl NewJob {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            id: None,
            command: command.into(),
            max_retries: None,
            priority: None,
            next_run_at: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_next_run_at(mut self, next_run_at: impl Into<String>) -> Self {
        self.next_run_at = Some(next_run_at.into());
        self
    }
}

/// Aggregate counts across all known job states (spec §6.1 `counts()`).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobCounts {
    pub pending: u64,
    pub processing: u64,
    pub completed: u64,
    pub failed: u64,
    pub dead: u64,
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
