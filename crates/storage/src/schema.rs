// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Schema creation and idempotent migration.

use rusqlite::Connection;

const CREATE_CONFIG_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS config (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    )
";

const CREATE_JOBS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS jobs (
        id TEXT PRIMARY KEY,
        command TEXT NOT NULL,
        state TEXT NOT NULL CHECK (state IN ('pending','processing','completed','failed','dead')),
        attempts INTEGER NOT NULL DEFAULT 0,
        max_retries INTEGER NOT NULL DEFAULT 3,
        priority INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        started_at TEXT,
        finished_at TEXT,
        next_run_at TEXT,
        result_code INTEGER,
        last_error TEXT,
        stdout TEXT,
        stderr TEXT
    )
";

const CREATE_CLAIM_INDEX: &str = "
    CREATE INDEX IF NOT EXISTS idx_jobs_state_priority_created
    ON jobs(state, priority, created_at)
";

/// Create the schema if absent, and apply idempotent migrations for
/// databases created by an older version of this crate (mirrors the
/// `ALTER TABLE ... ADD COLUMN` guards in the Python original's
/// `Store.init_db`, which tolerates "duplicate column" errors).
pub fn init(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(CREATE_CONFIG_TABLE, [])?;
    conn.execute(CREATE_JOBS_TABLE, [])?;
    conn.execute(CREATE_CLAIM_INDEX, [])?;

    for migration in [
        "ALTER TABLE jobs ADD COLUMN stdout TEXT",
        "ALTER TABLE jobs ADD COLUMN stderr TEXT",
        "ALTER TABLE jobs ADD COLUMN priority INTEGER DEFAULT 0",
    ] {
        if let Err(err) = conn.execute(migration, []) {
            if !is_duplicate_column(&err) {
                return Err(err);
            }
        }
    }

    Ok(())
}

fn is_duplicate_column(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("duplicate column name")
    )
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
