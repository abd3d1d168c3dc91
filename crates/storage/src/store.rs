// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The durable job/config store and its atomic claim protocol (spec §4.1).

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use queuectl_core::config::{default_for, normalize_key};
use queuectl_core::job::truncate_bytes;
use queuectl_core::{Job, JobCounts, JobState, MAX_ERROR_BYTES, MAX_OUTPUT_BYTES};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

use crate::error::StoreError;
use crate::row::{job_from_row, JOB_COLUMNS};
use crate::schema;

/// How long a connection waits on SQLite's write lock before giving up
/// (spec §5: "a timeout (≥10 s) is used to avoid permanent hangs").
const BUSY_TIMEOUT: Duration = Duration::from_secs(10);

/// SQLite-backed persistent storage for jobs and configuration.
///
/// Each operation opens no new connection beyond the one held by `Store`
/// itself; callers that need one store per OS process (the worker and
/// supervisor both do) construct their own `Store` rather than sharing a
/// connection across threads.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the store at `db_path`, creating its parent
    /// directory and initializing the schema.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(db_path)?;
        Self::configure(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory store, for tests that don't need on-disk durability.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::configure(&conn)?;
        Ok(Self { conn })
    }

    fn configure(conn: &Connection) -> Result<(), StoreError> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        schema::init(conn)?;
        Ok(())
    }

    /// Resolve the database path per spec §6.5: an explicit path wins over
    /// `QUEUECTL_DB_PATH`, which wins over the configured default.
    pub fn resolve_db_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(p) = explicit {
            return p.to_path_buf();
        }
        if let Ok(env_path) = std::env::var("QUEUECTL_DB_PATH") {
            if !env_path.is_empty() {
                return PathBuf::from(env_path);
            }
        }
        PathBuf::from(default_for("db_path").unwrap_or("./data/queuectl.db"))
    }

    /// Open the store at the resolved path (see [`Store::resolve_db_path`]).
    pub fn open_resolved(explicit: Option<&Path>) -> Result<Self, StoreError> {
        Self::open(Self::resolve_db_path(explicit))
    }

    // --- Producer: insert --------------------------------------------------

    /// Insert a new, fully-resolved pending job. Fails with
    /// [`StoreError::duplicate_id`] if `id` already exists (spec §3.1
    /// invariant: "inserting a job with an existing id fails").
    pub fn insert_job(
        &self,
        id: &str,
        command: &str,
        max_retries: u32,
        priority: i64,
        next_run_at: Option<&str>,
    ) -> Result<Job, StoreError> {
        let now = Utc::now().to_rfc3339();
        let result = self.conn.execute(
            "INSERT INTO jobs (id, command, state, attempts, max_retries, priority, created_at, updated_at, next_run_at)
             VALUES (?1, ?2, 'pending', 0, ?3, ?4, ?5, ?5, ?6)",
            params![id, command, max_retries, priority, now, next_run_at],
        );

        match result {
            Ok(_) => self.get(id),
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(StoreError::duplicate_id(id))
            }
            Err(e) => Err(e.into()),
        }
    }

    // --- The claim protocol --------------------------------------------------

    /// Atomically claim one eligible pending job (spec §4.1).
    ///
    /// Returns `Ok(None)` both when there is genuinely no claimable job and
    /// when the store is busy (another writer holds the lock past the
    /// busy timeout) — the caller's poll loop absorbs either case the same
    /// way.
    pub fn claim(&self) -> Result<Option<Job>, StoreError> {
        match self.try_claim() {
            Ok(job) => Ok(job),
            Err(StoreError::Sql(ref e)) if is_busy(e) => {
                tracing::warn!("database busy during claim, treating as no job");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn try_claim(&self) -> Result<Option<Job>, StoreError> {
        // BEGIN IMMEDIATE takes the RESERVED lock up front, not on first
        // write, so two workers racing to claim never both pass the SELECT
        // before either has taken the lock.
        self.conn.execute_batch("BEGIN IMMEDIATE")?;

        let now = Utc::now().to_rfc3339();

        let claimable: Option<String> = self
            .conn
            .query_row(
                "SELECT id FROM jobs
                 WHERE state = 'pending' AND (next_run_at IS NULL OR next_run_at <= ?1)
                 ORDER BY priority DESC, created_at ASC
                 LIMIT 1",
                params![now],
                |row| row.get(0),
            )
            .optional()?;

        let Some(job_id) = claimable else {
            self.conn.execute_batch("ROLLBACK")?;
            return Ok(None);
        };

        let affected = self.conn.execute(
            "UPDATE jobs
             SET state = 'processing',
                 attempts = attempts + 1,
                 started_at = COALESCE(started_at, ?1),
                 updated_at = ?1
             WHERE id = ?2 AND state = 'pending'",
            params![now, job_id],
        )?;

        if affected == 0 {
            // Lost the race to another writer between the SELECT and the
            // UPDATE (shouldn't happen under BEGIN IMMEDIATE, but the
            // conditional WHERE is the actual safety net, not the lock).
            self.conn.execute_batch("ROLLBACK")?;
            return Ok(None);
        }

        let job = self.conn.query_row(
            &format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = ?1"),
            params![job_id],
            job_from_row,
        )?;

        self.conn.execute_batch("COMMIT")?;
        Ok(Some(job))
    }

    // --- Terminal transitions ------------------------------------------------

    pub fn finish_success(
        &self,
        job_id: &str,
        result_code: i32,
        stdout: Option<&str>,
        stderr: Option<&str>,
    ) -> Result<(), StoreError> {
        let now = Utc::now().to_rfc3339();
        let stdout = stdout.map(|s| truncate_bytes(s, MAX_OUTPUT_BYTES));
        let stderr = stderr.map(|s| truncate_bytes(s, MAX_OUTPUT_BYTES));

        self.conn.execute(
            "UPDATE jobs
             SET state = 'completed', result_code = ?1, finished_at = ?2, updated_at = ?2,
                 stdout = ?3, stderr = ?4
             WHERE id = ?5",
            params![result_code, now, stdout, stderr, job_id],
        )?;
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub fn finish_failure(
        &self,
        job_id: &str,
        result_code: i32,
        error: Option<&str>,
        stdout: Option<&str>,
        stderr: Option<&str>,
        attempts_so_far: u32,
        max_retries: u32,
        backoff_base: u32,
    ) -> Result<(), StoreError> {
        let now = Utc::now();
        let now_str = now.to_rfc3339();
        let error = error.map(|s| truncate_bytes(s, MAX_ERROR_BYTES));
        let stdout = stdout.map(|s| truncate_bytes(s, MAX_OUTPUT_BYTES));
        let stderr = stderr.map(|s| truncate_bytes(s, MAX_OUTPUT_BYTES));

        if attempts_so_far >= max_retries {
            self.conn.execute(
                "UPDATE jobs
                 SET state = 'dead', result_code = ?1, last_error = ?2, finished_at = ?3,
                     updated_at = ?3, stdout = ?4, stderr = ?5
                 WHERE id = ?6",
                params![result_code, error, now_str, stdout, stderr, job_id],
            )?;
        } else {
            let delay_secs = queuectl_core::retry_delay_secs(backoff_base, attempts_so_far);
            let delay = chrono::Duration::seconds(i64::try_from(delay_secs).unwrap_or(i64::MAX));
            let next_run_at = (now + delay).to_rfc3339();

            self.conn.execute(
                "UPDATE jobs
                 SET state = 'pending', result_code = ?1, last_error = ?2, next_run_at = ?3,
                     updated_at = ?4, stdout = ?5, stderr = ?6
                 WHERE id = ?7",
                params![result_code, error, next_run_at, now_str, stdout, stderr, job_id],
            )?;
        }
        Ok(())
    }

    /// Move a job from the DLQ back to `pending` (spec §4.1 "DLQ replay").
    pub fn retry_job(&self, job_id: &str, max_retries: Option<u32>) -> Result<(), StoreError> {
        let state: Option<String> = self
            .conn
            .query_row("SELECT state FROM jobs WHERE id = ?1", params![job_id], |r| r.get(0))
            .optional()?;

        let Some(state) = state else {
            return Err(StoreError::not_found(job_id));
        };
        if state != JobState::Dead.as_str() {
            return Err(StoreError::not_in_dlq(job_id));
        }

        let now = Utc::now().to_rfc3339();
        match max_retries {
            Some(mr) => self.conn.execute(
                "UPDATE jobs SET state = 'pending', attempts = 0, max_retries = ?1, next_run_at = NULL, updated_at = ?2 WHERE id = ?3",
                params![mr, now, job_id],
            )?,
            None => self.conn.execute(
                "UPDATE jobs SET state = 'pending', attempts = 0, next_run_at = NULL, updated_at = ?1 WHERE id = ?2",
                params![now, job_id],
            )?,
        };
        Ok(())
    }

    // --- Reads ---------------------------------------------------------------

    pub fn get(&self, job_id: &str) -> Result<Job, StoreError> {
        self.conn
            .query_row(&format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = ?1"), params![job_id], job_from_row)
            .optional()?
            .ok_or_else(|| StoreError::not_found(job_id))
    }

    pub fn list(&self, state: Option<JobState>, limit: i64, offset: i64) -> Result<Vec<Job>, StoreError> {
        let jobs = match state {
            Some(state) => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {JOB_COLUMNS} FROM jobs WHERE state = ?1 ORDER BY created_at DESC LIMIT ?2 OFFSET ?3"
                ))?;
                stmt.query_map(params![state.as_str(), limit, offset], job_from_row)?
                    .collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {JOB_COLUMNS} FROM jobs ORDER BY created_at DESC LIMIT ?1 OFFSET ?2"
                ))?;
                stmt.query_map(params![limit, offset], job_from_row)?
                    .collect::<Result<Vec<_>, _>>()?
            }
        };
        Ok(jobs)
    }

    pub fn counts_by_state(&self) -> Result<JobCounts, StoreError> {
        let mut stmt = self.conn.prepare("SELECT state, COUNT(*) FROM jobs GROUP BY state")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
        })?;

        let mut counts = JobCounts::default();
        for row in rows {
            let (state, count) = row?;
            match state.as_str() {
                "pending" => counts.pending = count,
                "processing" => counts.processing = count,
                "completed" => counts.completed = count,
                "failed" => counts.failed = count,
                "dead" => counts.dead = count,
                _ => {}
            }
        }
        Ok(counts)
    }

    // --- Config ----------------------------------------------------------------

    pub fn set_config(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let key = normalize_key(key);
        self.conn.execute(
            "INSERT INTO config (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    /// Raw config lookup, with no fallback to defaults.
    pub fn get_config_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        let key = normalize_key(key);
        Ok(self
            .conn
            .query_row("SELECT value FROM config WHERE key = ?1", params![key], |r| r.get(0))
            .optional()?)
    }

    /// Config lookup with fall-through to the hard-coded default (spec §4.5).
    pub fn get_config(&self, key: &str) -> Result<String, StoreError> {
        if let Some(value) = self.get_config_raw(key)? {
            return Ok(value);
        }
        default_for(key)
            .map(|s| s.to_string())
            .ok_or_else(|| StoreError::config_invalid(key))
    }

    pub fn get_config_u32(&self, key: &str) -> Result<u32, StoreError> {
        self.get_config(key)?
            .parse()
            .map_err(|_| StoreError::config_invalid(key))
    }

    /// Raw access to the underlying connection, for sibling modules
    /// (`reconcile`) that need bulk queries outside the core CRUD surface.
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn is_busy(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if matches!(e.code, ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
    )
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
