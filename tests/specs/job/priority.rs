//! S6: higher-priority jobs are claimed before lower-priority ones (spec
//! §8.1 invariant 2, §8.2).

use queuectl_core::NewJob;

use crate::prelude::Queue;

#[test]
fn higher_priority_is_claimed_first() {
    let queue = Queue::new();
    let store = queue.store();

    let low = queuectl_storage::enqueue(&store, NewJob::new("true").with_priority(0), &queuectl_core::SequentialIdGen::new("low")).unwrap();
    let high = queuectl_storage::enqueue(&store, NewJob::new("true").with_priority(5), &queuectl_core::SequentialIdGen::new("high")).unwrap();

    let first = store.claim().unwrap().expect("a job should be claimable");
    assert_eq!(first.id, high.id);

    let second = store.claim().unwrap().expect("a job should be claimable");
    assert_eq!(second.id, low.id);

    assert!(store.claim().unwrap().is_none());
}

#[test]
fn equal_priority_falls_back_to_fifo_order() {
    let queue = Queue::new();
    let store = queue.store();

    let first_in = store.insert_job("a", "true", 3, 0, None).unwrap();
    std::thread::sleep(std::time::Duration::from_millis(5));
    let second_in = store.insert_job("b", "true", 3, 0, None).unwrap();

    let claimed_first = store.claim().unwrap().unwrap();
    assert_eq!(claimed_first.id, first_in.id);
    let claimed_second = store.claim().unwrap().unwrap();
    assert_eq!(claimed_second.id, second_in.id);
}
