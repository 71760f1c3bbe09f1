//! Daily scheduler for search cycles.
//!
//! The scheduler loop owns a single timer and a command channel. The first
//! fire is computed from the persisted execution time; each later fire is a
//! fixed 24 hours after the previous one.

mod engine;
mod handle;
mod types;

pub use engine::Scheduler;
pub use handle::SchedulerHandle;
pub use types::{SchedulerError, SchedulerState, SchedulerStatus};
