//! Core domain types: identifiers, job records, daily schedules, and title
//! highlighting.

pub mod highlight;
pub mod job;
pub mod schedule;
pub mod types;
