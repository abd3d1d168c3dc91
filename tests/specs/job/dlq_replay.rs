//! S5: replaying a dead-lettered job resets it to pending (spec §8.2).

use queuectl_core::JobState;

use crate::prelude::Queue;

#[test]
fn retry_job_resets_a_dead_job_to_pending() {
    let queue = Queue::new();
    let store = queue.store();

    store.insert_job("j2", "exit 1", 2, 0, None).unwrap();
    store
        .finish_failure("j2", 1, Some("boom"), None, None, 2, 2, 2)
        .unwrap();
    assert_eq!(store.get("j2").unwrap().state, JobState::Dead);

    store.retry_job("j2", Some(5)).unwrap();

    let replayed = store.get("j2").unwrap();
    assert_eq!(replayed.state, JobState::Pending);
    assert_eq!(replayed.attempts, 0);
    assert_eq!(replayed.max_retries, 5);
    assert!(replayed.next_run_at.is_none());
}

#[test]
fn retry_job_refuses_a_job_that_is_not_in_the_dlq() {
    let queue = Queue::new();
    let store = queue.store();

    store.insert_job("still-pending", "true", 3, 0, None).unwrap();
    let err = store.retry_job("still-pending", None).unwrap_err();
    assert!(err.to_string().contains("dead-letter"));
}
