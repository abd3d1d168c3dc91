use super::*;
use queuectl_core::JobState;
use tempfile::tempdir;

#[tokio::test]
async fn loop_claims_executes_and_completes_a_job_then_stops_at_shutdown() {
    let store = Store::open_in_memory().unwrap();
    store.insert_job("j1", "echo hi", 3, 0, None).unwrap();

    let dir = tempdir().unwrap();
    let shutdown_path = dir.path().join("queuectl.shutdown");
    let shutdown = ShutdownSignal::new(&shutdown_path);

    // Shutdown file is created by a side task once the one job is done, so
    // the loop body runs exactly once before observing it.
    let store_for_writer = &store;
    tokio::spawn({
        let shutdown_path = shutdown_path.clone();
        async move {
            loop {
                if store_for_writer.get("j1").map(|j| j.state == JobState::Completed).unwrap_or(false) {
                    std::fs::write(&shutdown_path, "").unwrap();
                    break;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        }
    });

    run(1, &store, &Executor::new(), &shutdown).await.unwrap();

    let job = store.get("j1").unwrap();
    assert_eq!(job.state, JobState::Completed);
    assert_eq!(job.stdout.as_deref(), Some("hi\n"));
}

#[tokio::test]
async fn failed_job_records_stderr_as_last_error() {
    let store = Store::open_in_memory().unwrap();
    store.insert_job("j1", "echo boom 1>&2; exit 1", 0, 0, None).unwrap();

    let dir = tempdir().unwrap();
    let shutdown = ShutdownSignal::new(dir.path().join("queuectl.shutdown"));

    let job = store.claim().unwrap().unwrap();
    execute_claimed_job(1, &store, &Executor::new(), &job).await.unwrap();

    let job = store.get("j1").unwrap();
    assert_eq!(job.state, JobState::Dead, "max_retries of 0 exhausts the budget immediately");
    assert_eq!(job.last_error.as_deref(), Some("boom\n"));

    let _ = shutdown.is_set();
}

#[test]
fn poll_interval_floors_a_non_positive_stored_value() {
    let store = Store::open_in_memory().unwrap();
    store.set_config("worker_poll_interval", "0").unwrap();
    assert_eq!(poll_interval_secs(&store), 1);
}

#[test]
fn failure_message_prefers_stderr_then_stdout_then_exit_code() {
    assert_eq!(failure_message("out", "err", 1), "err");
    assert_eq!(failure_message("out", "", 1), "out");
    assert_eq!(failure_message("", "", 7), "exit 7");
}
