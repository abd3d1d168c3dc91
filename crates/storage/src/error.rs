// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store error type.

use queuectl_core::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("store busy: {0}")]
    Busy(String),
    #[error(transparent)]
    Sql(#[from] rusqlite::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn not_found(id: impl Into<String>) -> Self {
        StoreError::Domain(DomainError::NotFound(id.into()))
    }

    pub fn not_in_dlq(id: impl Into<String>) -> Self {
        StoreError::Domain(DomainError::NotInDlq(id.into()))
    }

    pub fn config_invalid(key: impl Into<String>) -> Self {
        StoreError::Domain(DomainError::ConfigInvalid(key.into()))
    }

    pub fn duplicate_id(id: impl Into<String>) -> Self {
        StoreError::Domain(DomainError::DuplicateId(id.into()))
    }
}
