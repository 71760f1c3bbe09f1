//! jobwatch - daily job-posting notifier.
//!
//! Polls a job-search API once a day per keyword, drops postings that were
//! already announced, and publishes the rest to a chat channel with Save and
//! Skip buttons. Users adjust the search through slash commands.

pub mod api;
pub mod app;
pub mod commands;
pub mod config;
pub mod core;
pub mod dispatch;
pub mod logging;
pub mod pipeline;
pub mod scheduler;
pub mod source;
pub mod storage;

pub use api::{ApiConfig, ApiError, ApiState, build_router, start_server};
pub use app::{AppContext, AppError};
pub use commands::{Command, CommandError, CommandHandler, Reply};
pub use config::{ConfigError, SearchConfig, Settings, WorkType};
pub use core::highlight::highlight_keywords;
pub use core::job::JobRecord;
pub use core::schedule::{DailySchedule, FIRE_INTERVAL, ScheduleError, TimeOfDay};
pub use core::types::{CycleId, JobId};
pub use dispatch::{ChannelError, ChatChannel, DiscordChannel, Dispatcher, OutboundMessage};
pub use pipeline::{CycleError, CycleReport, SearchCycle};
pub use scheduler::{Scheduler, SchedulerError, SchedulerHandle, SchedulerState};
pub use source::{AdzunaClient, JobSource, SourceError};
pub use storage::{FileStore, InMemoryStore, SeenLedger, StateStore, StorageError};
