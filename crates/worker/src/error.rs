// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use queuectl_storage::StoreError;
use thiserror::Error;

/// Only a broken store ends a worker's life. A bad command, a timeout, or a
/// nonzero exit is converted to `finish_failure` inside the loop; a write
/// failure recording that outcome is logged and swallowed there too. Only
/// `Store::claim` (outside any job's bookkeeping) propagates here, and only
/// for the store errors it doesn't already absorb itself (spec §7).
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error(transparent)]
    Store(#[from] StoreError),
}
