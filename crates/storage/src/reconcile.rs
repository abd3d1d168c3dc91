// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Startup reconciliation for jobs stranded in `processing` by a worker that
//! died without recording an outcome (spec §9, adopted as a required
//! extension rather than left optional: a killed worker otherwise leaves its
//! claimed job permanently unrunnable).

use chrono::Utc;
use rusqlite::params;

use crate::error::StoreError;
use crate::store::Store;

/// Counts of what [`Store::reconcile_stranded`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub requeued: u64,
    pub dead_lettered: u64,
}

impl Store {
    /// Requeue or dead-letter every job left in `processing`.
    ///
    /// Jobs under their retry budget go back to `pending` with a short
    /// `next_run_at` delay; `attempts` is left as-is, since the prior claim
    /// already counted the stranded run as an attempt. Jobs that had already
    /// exhausted their budget go straight to `dead`.
    pub fn reconcile_stranded(&self) -> Result<ReconcileReport, StoreError> {
        let conn = self.connection();
        let mut stmt = conn.prepare("SELECT id, attempts, max_retries FROM jobs WHERE state = 'processing'")?;
        let stranded: Vec<(String, i64, i64)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
            .collect::<Result<_, _>>()?;
        drop(stmt);

        let mut report = ReconcileReport::default();
        let now = Utc::now();
        let now_str = now.to_rfc3339();

        for (id, attempts, max_retries) in stranded {
            if attempts >= max_retries {
                conn.execute(
                    "UPDATE jobs SET state = 'dead', finished_at = ?1, updated_at = ?1 WHERE id = ?2",
                    params![now_str, id],
                )?;
                report.dead_lettered += 1;
            } else {
                let next_run_at = (now + chrono::Duration::seconds(2)).to_rfc3339();
                conn.execute(
                    "UPDATE jobs SET state = 'pending', started_at = NULL, next_run_at = ?1, updated_at = ?2 WHERE id = ?3",
                    params![next_run_at, now_str, id],
                )?;
                report.requeued += 1;
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
