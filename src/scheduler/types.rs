//! Scheduler type definitions.
//!
//! Error types, state enums, and command types for the scheduler.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::oneshot;

use crate::config::ConfigError;
use crate::core::schedule::ScheduleError;
use crate::pipeline::{CycleError, CycleReport};
use crate::storage::StorageError;

/// Errors that can occur in the scheduler.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Storage error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The search cycle aborted.
    #[error("cycle failed: {0}")]
    Cycle(#[from] CycleError),

    /// The persisted execution time or configured time zone is unusable.
    #[error("invalid schedule: {0}")]
    Schedule(#[from] ScheduleError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Channel error.
    #[error("channel error: {0}")]
    ChannelError(String),

    /// A cycle is already in progress.
    #[error("a search cycle is already running")]
    AlreadyRunning,
}

/// State of the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerState {
    /// The scheduler loop is not running.
    Idle,
    /// Sleeping until the next fire.
    WaitingForFire,
    /// A search cycle is in progress.
    Running,
}

/// Snapshot of the scheduler for status reporting.
#[derive(Debug, Clone, Serialize)]
pub struct SchedulerStatus {
    pub state: SchedulerState,
    pub next_fire: Option<DateTime<Utc>>,
    pub last_cycle: Option<CycleReport>,
}

/// Commands that can be sent to the scheduler.
pub(crate) enum SchedulerCommand {
    /// Run one cycle now, outside the daily timer.
    Trigger {
        response: oneshot::Sender<Result<CycleReport, SchedulerError>>,
    },
    /// Shutdown the scheduler.
    Shutdown { response: oneshot::Sender<()> },
}
