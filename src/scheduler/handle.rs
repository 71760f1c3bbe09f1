//! Scheduler handle for controlling the scheduler.
//!
//! A `SchedulerHandle` is cheap to clone and is how the HTTP surface and the
//! binary talk to the running scheduler loop.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::{RwLock, mpsc, oneshot};

use crate::pipeline::CycleReport;

use super::types::{SchedulerCommand, SchedulerError, SchedulerState, SchedulerStatus};

/// Buffer size for the command channel between SchedulerHandle and Scheduler.
pub(crate) const COMMAND_CHANNEL_BUFFER: usize = 32;

/// State shared between the scheduler loop and its handles.
#[derive(Debug)]
pub(crate) struct SharedStatus {
    pub(crate) state: SchedulerState,
    pub(crate) next_fire: Option<DateTime<Utc>>,
    pub(crate) last_cycle: Option<CycleReport>,
}

/// Handle for controlling the scheduler.
#[derive(Clone)]
pub struct SchedulerHandle {
    pub(crate) command_tx: mpsc::Sender<SchedulerCommand>,
    pub(crate) status: Arc<RwLock<SharedStatus>>,
}

impl SchedulerHandle {
    /// Send a command and wait for its response.
    async fn send_command<T>(
        &self,
        build_command: impl FnOnce(oneshot::Sender<T>) -> SchedulerCommand,
        operation: &str,
    ) -> Result<T, SchedulerError> {
        let (response_tx, response_rx) = oneshot::channel();
        self.command_tx
            .send(build_command(response_tx))
            .await
            .map_err(|_| {
                SchedulerError::ChannelError(format!("failed to send {} command", operation))
            })?;

        response_rx.await.map_err(|_| {
            SchedulerError::ChannelError(format!("failed to receive {} response", operation))
        })
    }

    /// Run one search cycle immediately and return its report.
    ///
    /// Rejected with [`SchedulerError::AlreadyRunning`] while a cycle is in
    /// progress. The daily timer is not shifted.
    pub async fn trigger_now(&self) -> Result<CycleReport, SchedulerError> {
        if self.state().await == SchedulerState::Running {
            return Err(SchedulerError::AlreadyRunning);
        }
        self.send_command(|response| SchedulerCommand::Trigger { response }, "trigger")
            .await?
    }

    /// Stop the scheduler loop. Waits for an in-flight cycle to finish.
    pub async fn shutdown(&self) -> Result<(), SchedulerError> {
        self.send_command(|response| SchedulerCommand::Shutdown { response }, "shutdown")
            .await
    }

    /// Get the current scheduler state.
    pub async fn state(&self) -> SchedulerState {
        self.status.read().await.state
    }

    /// Wall-clock instant of the next timer fire.
    pub async fn next_fire(&self) -> Option<DateTime<Utc>> {
        self.status.read().await.next_fire
    }

    /// State, next fire and the last cycle's report.
    pub async fn status(&self) -> SchedulerStatus {
        let status = self.status.read().await;
        SchedulerStatus {
            state: status.state,
            next_fire: status.next_fire,
            last_cycle: status.last_cycle.clone(),
        }
    }
}
