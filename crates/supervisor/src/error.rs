// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use queuectl_storage::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("supervisor is already running")]
    AlreadyRunning,
    #[error("supervisor is not running")]
    NotRunning,
    #[error("failed to start supervisor: {0}")]
    StartFailed(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
