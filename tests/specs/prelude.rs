//! Test helpers for behavioral specifications.
//!
//! Black-box: every test drives the compiled `queuectl` / `queuectl-worker`
//! / `queuectl-supervisor` binaries with `assert_cmd` and inspects the
//! store directly through `queuectl-storage` for assertions that aren't
//! convenient to parse out of CLI output.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::PathBuf;
use std::time::{Duration, Instant};

use assert_cmd::Command;
use queuectl_core::JobState;
use queuectl_storage::Store;
use tempfile::TempDir;

pub const SPEC_POLL_INTERVAL_MS: u64 = 20;

/// An isolated queue: its own temp directory, its own `db_path`, and no
/// shared state with any other test.
pub struct Queue {
    dir: TempDir,
}

impl Queue {
    pub fn new() -> Self {
        Self { dir: tempfile::tempdir().expect("tempdir") }
    }

    pub fn db_path(&self) -> PathBuf {
        self.dir.path().join("queuectl.db")
    }

    /// A `queuectl` invocation scoped to this queue's database.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("queuectl").expect("queuectl binary");
        cmd.arg("--db-path").arg(self.db_path());
        cmd
    }

    /// Open a direct store handle, for assertions CLI output doesn't cover.
    pub fn store(&self) -> Store {
        Store::open(self.db_path()).expect("open store")
    }

    pub fn start(&self, workers: u32) {
        self.cli()
            .arg("start")
            .arg(workers.to_string())
            .assert()
            .success();
    }

    pub fn stop(&self) {
        let _ = self.cli().arg("stop").output();
    }
}

impl Drop for Queue {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Poll `condition` until it returns true or `timeout` elapses.
pub fn wait_for<F: FnMut() -> bool>(timeout: Duration, mut condition: F) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if condition() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(SPEC_POLL_INTERVAL_MS));
    }
}

/// Poll until `job_id` reaches `state`, or panic with the job's last known
/// snapshot on timeout.
pub fn wait_for_state(store: &Store, job_id: &str, state: JobState, timeout: Duration) {
    let mut last = None;
    let reached = wait_for(timeout, || match store.get(job_id) {
        Ok(job) => {
            let hit = job.state == state;
            last = Some(job);
            hit
        }
        Err(_) => false,
    });
    assert!(
        reached,
        "job {job_id} did not reach {state:?} within {timeout:?}; last seen: {last:?}"
    );
}
