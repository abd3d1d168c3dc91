// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Producer API (spec §4.5): turn a [`NewJob`] into a persisted [`Job`],
//! filling in defaults the caller left unset.

use queuectl_core::{IdGen, Job, NewJob};

use crate::error::StoreError;
use crate::store::Store;

/// Enqueue `new_job`, generating an id via `id_gen` when the caller didn't
/// supply one and falling back to the store's configured `max_retries`
/// when the caller didn't supply that either.
pub fn enqueue(store: &Store, new_job: NewJob, id_gen: &impl IdGen) -> Result<Job, StoreError> {
    let id = match new_job.id {
        Some(id) => id,
        None => id_gen.next(),
    };
    let max_retries = match new_job.max_retries {
        Some(max_retries) => max_retries,
        None => store.get_config_u32("max_retries")?,
    };
    let priority = new_job.priority.unwrap_or(0);

    store.insert_job(&id, &new_job.command, max_retries, priority, new_job.next_run_at.as_deref())
}

#[cfg(test)]
#[path = "producer_tests.rs"]
mod tests;
