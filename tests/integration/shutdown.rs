//! Scheduler shutdown integration tests.

use chrono::{TimeZone, Utc};
use jobwatch::{Dispatcher, InMemoryStore, Scheduler, SchedulerState, SearchCycle};
use std::sync::Arc;
use std::time::Duration;

use crate::common::{RecordingChannel, ScriptedSource, job};

fn scheduler() -> Scheduler {
    let store = Arc::new(InMemoryStore::new());
    let source = Arc::new(
        ScriptedSource::default().with("system administrator", vec![job("1", "Admin")]),
    );
    let dispatcher = Arc::new(Dispatcher::new(Arc::new(RecordingChannel::default())));
    let cycle = Arc::new(SearchCycle::new(store.clone(), source, dispatcher));
    Scheduler::new(cycle, store, "Europe/Berlin")
}

/// Test: Shutdown ends the scheduler task promptly, long before the next fire.
#[tokio::test]
async fn test_shutdown_ends_task() {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
    let (handle, task) = scheduler().start_at(now).await.unwrap();
    assert_eq!(handle.state().await, SchedulerState::WaitingForFire);

    handle.shutdown().await.unwrap();

    tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("scheduler task did not exit")
        .unwrap();
    assert_eq!(handle.state().await, SchedulerState::Idle);
}

/// Test: Manual triggers work repeatedly, and the ledger suppresses the
/// second one's posting.
#[tokio::test]
async fn test_repeated_manual_triggers_are_idempotent() {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
    let (handle, _task) = scheduler().start_at(now).await.unwrap();

    let first = handle.trigger_now().await.unwrap();
    let second = handle.trigger_now().await.unwrap();

    assert_eq!(first.published, 1);
    assert_eq!(second.new_jobs, 0);
    assert_eq!(second.published, 0);
    handle.shutdown().await.unwrap();
}
