//! Supervisor lifecycle: start/stop/status and stale-PID reconciliation
//! (spec §4.4, §8.1 invariant 7).

use std::time::Duration;

use queuectl_core::pid_file_path;
use queuectl_supervisor::{is_manager_running, start_manager, stop_manager, worker_count};

use crate::prelude::{wait_for, Queue};

#[test]
fn start_then_stop_round_trips() {
    let queue = Queue::new();
    let db_path = queue.db_path();

    start_manager(2, &db_path).unwrap();
    assert!(is_manager_running(&db_path));

    let settled = wait_for(Duration::from_secs(2), || worker_count(&db_path) == 2);
    assert!(settled, "expected 2 worker children, saw {}", worker_count(&db_path));

    stop_manager(&db_path).unwrap();
    assert!(!is_manager_running(&db_path));
}

#[test]
fn starting_twice_is_refused() {
    let queue = Queue::new();
    let db_path = queue.db_path();

    start_manager(1, &db_path).unwrap();
    let err = start_manager(1, &db_path).unwrap_err();
    assert!(err.to_string().contains("already running"));

    stop_manager(&db_path).unwrap();
}

#[test]
fn stopping_when_not_running_is_refused() {
    let queue = Queue::new();
    let db_path = queue.db_path();
    let err = stop_manager(&db_path).unwrap_err();
    assert!(err.to_string().contains("not running"));
}

#[test]
fn a_stale_pid_file_is_treated_as_not_running_and_removed() {
    let queue = Queue::new();
    let db_path = queue.db_path();
    let pid_path = pid_file_path(&db_path);

    std::fs::create_dir_all(pid_path.parent().unwrap()).unwrap();
    // PID 999999 is vanishingly unlikely to be a live process in any test
    // environment.
    std::fs::write(&pid_path, "999999").unwrap();

    assert!(!is_manager_running(&db_path));
    assert!(!pid_path.exists(), "stale PID file should have been cleaned up");
}
