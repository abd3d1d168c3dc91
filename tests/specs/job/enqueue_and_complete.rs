//! S1: enqueue a job, start one worker, watch it complete (spec §8.2).

use std::time::Duration;

use queuectl_core::{JobState, NewJob, UuidIdGen};

use crate::prelude::{wait_for_state, Queue};

#[test]
fn enqueue_and_complete_within_ten_seconds() {
    let queue = Queue::new();
    let store = queue.store();

    let job = queuectl_storage::enqueue(
        &store,
        NewJob::new("echo ok").with_max_retries(3),
        &UuidIdGen,
    )
    .unwrap();

    queue.start(1);
    wait_for_state(&store, &job.id, JobState::Completed, Duration::from_secs(10));

    let done = store.get(&job.id).unwrap();
    assert_eq!(done.result_code, Some(0));
    assert!(done.stdout.unwrap_or_default().contains("ok"));
    assert_eq!(done.attempts, 1);
}

#[test]
fn inserting_a_duplicate_id_fails() {
    let queue = Queue::new();
    let store = queue.store();

    store.insert_job("dup", "true", 3, 0, None).unwrap();
    let err = store.insert_job("dup", "true", 3, 0, None).unwrap_err();
    assert!(err.to_string().contains("dup"));
}

#[test]
fn get_on_a_missing_job_fails_not_found() {
    let queue = Queue::new();
    let store = queue.store();
    assert!(store.get("missing").is_err());
}
