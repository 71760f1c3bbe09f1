//! Scheduler engine implementation.
//!
//! The scheduler is responsible for:
//! - Firing the search cycle at the daily execution time
//! - Manual cycle triggers that leave the daily timer untouched
//! - Graceful shutdown

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::{RwLock, mpsc};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::core::schedule::{DailySchedule, FIRE_INTERVAL};
use crate::pipeline::{CycleReport, SearchCycle};
use crate::storage::StateStore;

use super::handle::{COMMAND_CHANNEL_BUFFER, SchedulerHandle, SharedStatus};
use super::types::{SchedulerCommand, SchedulerError, SchedulerState};

/// Main scheduler for search cycles.
pub struct Scheduler {
    cycle: Arc<SearchCycle>,
    store: Arc<dyn StateStore>,
    /// IANA zone the execution time is interpreted in.
    timezone: String,
}

impl Scheduler {
    /// Create a scheduler driving `cycle`, reading the execution time from
    /// `store`.
    pub fn new(
        cycle: Arc<SearchCycle>,
        store: Arc<dyn StateStore>,
        timezone: impl Into<String>,
    ) -> Self {
        Self {
            cycle,
            store,
            timezone: timezone.into(),
        }
    }

    /// Daily schedule from the persisted execution time.
    pub async fn schedule(&self) -> Result<DailySchedule, SchedulerError> {
        let config = self.store.load_config().await?;
        Ok(DailySchedule::new(config.execution_time()?, &self.timezone)?)
    }

    /// Start the scheduler and return a handle for controlling it.
    pub async fn start(self) -> Result<(SchedulerHandle, JoinHandle<()>), SchedulerError> {
        self.start_at(Utc::now()).await
    }

    /// Start the scheduler treating `now` as the current wall-clock time.
    pub async fn start_at(
        self,
        now: DateTime<Utc>,
    ) -> Result<(SchedulerHandle, JoinHandle<()>), SchedulerError> {
        let schedule = self.schedule().await?;
        let next_fire = schedule.next_after(now);
        let delay = (next_fire - now).to_std().unwrap_or_default();
        let deadline = Instant::now() + delay;

        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_BUFFER);
        let status = Arc::new(RwLock::new(SharedStatus {
            state: SchedulerState::WaitingForFire,
            next_fire: Some(next_fire),
            last_cycle: None,
        }));

        let handle = SchedulerHandle {
            command_tx,
            status: Arc::clone(&status),
        };

        let local = next_fire.with_timezone(&schedule.timezone());
        tracing::info!(
            next_fire = %next_fire,
            "Waiting until {} ({}s)",
            local.format("%Y-%m-%d %H:%M %Z"),
            delay.as_secs()
        );

        let scheduler_task = tokio::spawn(async move {
            self.run(command_rx, status, deadline, next_fire).await;
        });

        Ok((handle, scheduler_task))
    }

    /// Main scheduler loop.
    async fn run(
        self,
        mut command_rx: mpsc::Receiver<SchedulerCommand>,
        status: Arc<RwLock<SharedStatus>>,
        mut deadline: Instant,
        mut next_fire: DateTime<Utc>,
    ) {
        let interval = chrono::Duration::seconds(FIRE_INTERVAL.as_secs() as i64);

        loop {
            tokio::select! {
                _ = tokio::time::sleep_until(deadline) => {
                    tracing::info!(scheduled_for = %next_fire, "Scheduled search cycle starting");
                    if let Err(e) = self.run_cycle(&status).await {
                        tracing::error!(error = %e, "Scheduled search cycle failed");
                    }

                    // Fires missed while a cycle overran or the host slept are
                    // collapsed into the next one.
                    let now = Instant::now();
                    loop {
                        deadline += FIRE_INTERVAL;
                        next_fire += interval;
                        if deadline > now {
                            break;
                        }
                    }
                    status.write().await.next_fire = Some(next_fire);
                    tracing::info!(next_fire = %next_fire, "Next search cycle scheduled");
                }

                Some(command) = command_rx.recv() => {
                    match command {
                        SchedulerCommand::Trigger { response } => {
                            tracing::info!("Manual search cycle triggered");
                            let result = self.run_cycle(&status).await;
                            let _ = response.send(result);
                        }
                        SchedulerCommand::Shutdown { response } => {
                            {
                                let mut s = status.write().await;
                                s.state = SchedulerState::Idle;
                                s.next_fire = None;
                            }
                            tracing::info!("Scheduler stopped");
                            let _ = response.send(());
                            break;
                        }
                    }
                }
            }
        }
    }

    async fn run_cycle(
        &self,
        status: &RwLock<SharedStatus>,
    ) -> Result<CycleReport, SchedulerError> {
        status.write().await.state = SchedulerState::Running;
        let result = self.cycle.run().await;

        let mut s = status.write().await;
        s.state = SchedulerState::WaitingForFire;
        match result {
            Ok(report) => {
                s.last_cycle = Some(report.clone());
                Ok(report)
            }
            Err(e) => Err(e.into()),
        }
    }
}
