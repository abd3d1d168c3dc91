//! S4: a job's state survives a worker crash against the same database
//! (spec §8.1 invariant 8, §8.2).

use std::thread::sleep;
use std::time::Duration;

use assert_cmd::cargo::cargo_bin;
use queuectl_core::{JobState, NewJob, UuidIdGen};

use crate::prelude::{wait_for_state, Queue};

#[test]
fn job_survives_a_worker_crash() {
    let queue = Queue::new();
    let store = queue.store();

    let job = queuectl_storage::enqueue(
        &store,
        NewJob::new("sleep 1 && echo done"),
        &UuidIdGen,
    )
    .unwrap();

    let mut worker = std::process::Command::new(cargo_bin("queuectl-worker"))
        .arg("0")
        .env("QUEUECTL_DB_PATH", queue.db_path())
        .spawn()
        .unwrap();

    sleep(Duration::from_millis(500));
    worker.kill().unwrap();
    worker.wait().unwrap();

    let mid_flight = store.get(&job.id).unwrap();
    assert!(matches!(mid_flight.state, JobState::Pending | JobState::Processing));

    queue.start(1);
    wait_for_state(&store, &job.id, JobState::Completed, Duration::from_secs(10));
}
