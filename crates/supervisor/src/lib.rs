// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! queuectl-supervisor: worker pool lifecycle (spec §4.4).
//!
//! This crate is split into the control surface a CLI process drives
//! ([`manager`]: start/stop/query, all filesystem-rendezvous based) and the
//! PID-file/process-liveness primitives ([`markers`]) both the control
//! surface and the `queuectl-supervisor` binary itself rely on. The binary
//! that actually runs the monitor loop lives in `src/main.rs`.

pub mod error;
pub mod manager;
pub mod markers;

pub use error::SupervisorError;
pub use manager::{is_manager_running, start_manager, stop_manager, worker_count};
