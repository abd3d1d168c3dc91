//! S3: several workers drain the same queue without double-claiming a job
//! (spec §8.1 invariant 1, §8.2).

use std::time::Duration;

use queuectl_core::{JobState, NewJob, UuidIdGen};

use crate::prelude::{wait_for, Queue};

#[test]
fn five_jobs_three_workers_each_runs_exactly_once() {
    let queue = Queue::new();
    let store = queue.store();

    let ids: Vec<String> = (0..5)
        .map(|i| {
            queuectl_storage::enqueue(
                &store,
                NewJob::new(format!("sleep 0.5 && echo job-{i}")),
                &UuidIdGen,
            )
            .unwrap()
            .id
        })
        .collect();

    queue.start(3);

    let all_completed = wait_for(Duration::from_secs(30), || {
        ids.iter().all(|id| {
            store
                .get(id)
                .map(|j| j.state == JobState::Completed)
                .unwrap_or(false)
        })
    });
    assert!(all_completed, "not all jobs completed within 30s");

    for id in &ids {
        let job = store.get(id).unwrap();
        assert_eq!(job.attempts, 1, "job {id} ran more than once");
        assert_eq!(job.result_code, Some(0));
    }
}
