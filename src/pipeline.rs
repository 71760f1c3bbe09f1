//! One search cycle: fetch → dedup → commit → dispatch.
//!
//! Ordering within a cycle is fixed: every keyword is fetched and merged
//! through the ledger first, the ledger is persisted once, and only then are
//! messages published. A job is therefore marked seen before it is shown,
//! trading a possibly missed posting for never posting one twice.

use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::core::job::JobRecord;
use crate::core::types::CycleId;
use crate::dispatch::{DispatchReport, Dispatcher};
use crate::source::JobSource;
use crate::storage::{SeenLedger, StateStore, StorageError};

/// Errors that abort a cycle before anything is published.
#[derive(Debug, Error)]
pub enum CycleError {
    /// Reading the configuration or ledger, or committing the ledger, failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Summary of one cycle.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub cycle_id: String,
    /// Keywords queried.
    pub keywords: usize,
    /// Keywords whose request failed.
    pub failed_keywords: usize,
    /// Postings returned across all keywords, before dedup.
    pub fetched: usize,
    /// Postings that survived dedup.
    pub new_jobs: usize,
    pub published: usize,
    pub publish_failures: usize,
    #[serde(with = "duration_millis")]
    pub duration: Duration,
}

mod duration_millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }
}

/// The search→dedup→dispatch pipeline.
pub struct SearchCycle {
    store: Arc<dyn StateStore>,
    source: Arc<dyn JobSource>,
    dispatcher: Arc<Dispatcher>,
}

impl SearchCycle {
    pub fn new(
        store: Arc<dyn StateStore>,
        source: Arc<dyn JobSource>,
        dispatcher: Arc<Dispatcher>,
    ) -> Self {
        Self {
            store,
            source,
            dispatcher,
        }
    }

    /// Run one full cycle.
    ///
    /// Per-keyword fetch failures are logged and contribute nothing; they do
    /// not fail the cycle. A failure to load state or to commit the ledger
    /// aborts the cycle before any message is published.
    pub async fn run(&self) -> Result<CycleReport, CycleError> {
        let cycle_id = CycleId::new();
        let start = Instant::now();

        let config = self.store.load_config().await?;
        let mut ledger = SeenLedger::load(self.store.as_ref()).await?;

        tracing::info!(
            cycle_id = %cycle_id,
            keywords = config.keywords.len(),
            seen = ledger.len(),
            "Starting search cycle"
        );

        let mut fetched = 0;
        let mut failed_keywords = 0;
        let mut new_jobs: Vec<JobRecord> = Vec::new();

        for keyword in &config.keywords {
            match self.source.search(&config, keyword).await {
                Ok(candidates) => {
                    fetched += candidates.len();
                    new_jobs.extend(ledger.filter_new(candidates));
                }
                Err(e) => {
                    failed_keywords += 1;
                    tracing::error!(cycle_id = %cycle_id, keyword = %keyword, error = %e, "Error fetching jobs");
                }
            }
        }

        let mut report = CycleReport {
            cycle_id: cycle_id.to_string(),
            keywords: config.keywords.len(),
            failed_keywords,
            fetched,
            new_jobs: new_jobs.len(),
            published: 0,
            publish_failures: 0,
            duration: Duration::ZERO,
        };

        if new_jobs.is_empty() {
            tracing::info!(cycle_id = %cycle_id, fetched, "No new jobs found");
            report.duration = start.elapsed();
            return Ok(report);
        }

        let committed = ledger.commit(self.store.as_ref()).await?;
        tracing::debug!(cycle_id = %cycle_id, committed, "Ledger committed");

        let DispatchReport { published, failed } =
            self.dispatcher.publish(&new_jobs, &config.keywords).await;
        report.published = published;
        report.publish_failures = failed;
        report.duration = start.elapsed();

        tracing::info!(
            cycle_id = %cycle_id,
            new_jobs = report.new_jobs,
            published,
            publish_failures = failed,
            "Search cycle finished"
        );
        Ok(report)
    }
}
