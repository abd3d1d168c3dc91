// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! queuectl-storage: the durable SQLite-backed job/config store.

pub mod error;
pub mod producer;
pub mod reconcile;
mod row;
mod schema;
pub mod store;

pub use error::StoreError;
pub use producer::enqueue;
pub use reconcile::ReconcileReport;
pub use store::Store;
