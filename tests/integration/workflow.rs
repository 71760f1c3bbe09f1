//! End-to-end cycles over the on-disk state files.

use jobwatch::{Dispatcher, FileStore, SearchConfig, SearchCycle, StateStore};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tempfile::TempDir;

use crate::common::{RecordingChannel, ScriptedSource, job};

fn config(keywords: &[&str]) -> SearchConfig {
    SearchConfig {
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        ..SearchConfig::default()
    }
}

async fn cycle(
    dir: &TempDir,
    source: Arc<ScriptedSource>,
) -> (SearchCycle, Arc<FileStore>, Arc<RecordingChannel>) {
    let store = Arc::new(FileStore::open(dir.path()).await.unwrap());
    let channel = Arc::new(RecordingChannel::default());
    let dispatcher = Arc::new(Dispatcher::new(channel.clone()));
    (
        SearchCycle::new(store.clone(), source, dispatcher),
        store,
        channel,
    )
}

fn read_json(dir: &TempDir, name: &str) -> Value {
    let content = std::fs::read_to_string(dir.path().join(name)).unwrap();
    serde_json::from_str(&content).unwrap()
}

/// Test: A fresh data directory gets the default config, and one cycle
/// publishes each new job once and records it in the ledger file.
#[tokio::test]
async fn test_first_cycle_on_fresh_directory() {
    let dir = TempDir::new().unwrap();
    let source = Arc::new(ScriptedSource::default().with(
        "system administrator",
        vec![
            job("1", "Linux System Administrator"),
            job("2", "Windows System Administrator"),
        ],
    ));
    let (cycle, _store, channel) = cycle(&dir, source).await;

    let report = cycle.run().await.unwrap();

    assert_eq!(report.new_jobs, 2);
    assert_eq!(report.published, 2);
    assert_eq!(channel.contents().len(), 2);
    assert!(channel.contents()[0].contains("**System Administrator**"));

    let config = read_json(&dir, "config.json");
    assert_eq!(config["location"], "Coburg");
    assert_eq!(config["execution_time"], "12:00");

    let seen = read_json(&dir, "jobs_seen.json");
    assert_eq!(seen["posted_ids"], serde_json::json!(["1", "2"]));
}

/// Test: After a restart the ledger still suppresses already-posted jobs;
/// only genuinely new ones are published.
#[tokio::test]
async fn test_restart_does_not_repost() {
    let dir = TempDir::new().unwrap();
    let first = Arc::new(
        ScriptedSource::default().with("system administrator", vec![job("1", "Admin")]),
    );
    let (cycle_a, _, channel_a) = cycle(&dir, first).await;
    cycle_a.run().await.unwrap();
    assert_eq!(channel_a.contents().len(), 1);

    let second = Arc::new(ScriptedSource::default().with(
        "system administrator",
        vec![job("1", "Admin"), job("3", "Senior Admin")],
    ));
    let (cycle_b, _, channel_b) = cycle(&dir, second).await;
    let report = cycle_b.run().await.unwrap();

    assert_eq!(report.fetched, 2);
    assert_eq!(report.new_jobs, 1);
    assert_eq!(channel_b.contents().len(), 1);
    assert!(channel_b.contents()[0].contains("Senior"));

    let seen = read_json(&dir, "jobs_seen.json");
    assert_eq!(seen["posted_ids"], serde_json::json!(["1", "3"]));
}

/// Test: A posting returned for several keywords is published once, and a
/// failing keyword does not stop the others.
#[tokio::test]
async fn test_keywords_share_ledger_and_fail_independently() {
    let dir = TempDir::new().unwrap();
    let source = Arc::new(
        ScriptedSource::default()
            .with("devops", vec![job("7", "DevOps Engineer")])
            .failing("sre")
            .with("linux", vec![job("7", "DevOps Engineer"), job("8", "Linux Admin")]),
    );
    let (cycle, store, channel) = cycle(&dir, source.clone()).await;
    store.save_config(&config(&["devops", "sre", "linux"])).await.unwrap();

    let report = cycle.run().await.unwrap();

    assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    assert_eq!(report.failed_keywords, 1);
    assert_eq!(report.fetched, 3);
    assert_eq!(report.new_jobs, 2);
    assert_eq!(channel.contents().len(), 2);
}

/// Test: A cycle with nothing new leaves the ledger file untouched.
#[tokio::test]
async fn test_no_new_jobs_leaves_ledger_absent() {
    let dir = TempDir::new().unwrap();
    let source = Arc::new(ScriptedSource::default());
    let (cycle, _, channel) = cycle(&dir, source).await;

    let report = cycle.run().await.unwrap();

    assert_eq!(report.new_jobs, 0);
    assert!(channel.contents().is_empty());
    assert!(!dir.path().join("jobs_seen.json").exists());
}
