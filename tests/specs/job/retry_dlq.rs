//! S2: a job that always fails exhausts its retry budget and lands in the
//! dead-letter queue (spec §8.2).

use std::time::Duration;

use queuectl_core::{JobState, NewJob, UuidIdGen};

use crate::prelude::{wait_for_state, Queue};

#[test]
fn exhausting_retries_dead_letters_the_job() {
    let queue = Queue::new();
    let store = queue.store();
    store.set_config("backoff_base", "1").unwrap();

    let job = queuectl_storage::enqueue(
        &store,
        NewJob::new("exit 1").with_max_retries(2),
        &UuidIdGen,
    )
    .unwrap();

    queue.start(1);
    wait_for_state(&store, &job.id, JobState::Dead, Duration::from_secs(30));

    let dead = store.get(&job.id).unwrap();
    assert!(dead.attempts >= 2);
    assert_ne!(dead.result_code, Some(0));
}
