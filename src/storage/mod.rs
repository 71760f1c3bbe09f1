//! Storage abstraction for the bot's persisted state.
//!
//! Three records are persisted: the search configuration, the seen-jobs
//! ledger, and the saved-jobs log. Backends are pluggable behind
//! [`StateStore`]: JSON files on disk for production, memory for tests.
//!
//! Every mutation is a scoped load→mutate→replace sequence executed by the
//! backend, so callers never hold a stale copy across a write.

mod file;
mod ledger;
mod memory;

pub use file::FileStore;
pub use ledger::SeenLedger;
pub use memory::InMemoryStore;

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::SearchConfig;
use crate::core::job::JobRecord;
use crate::core::types::JobId;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing a backing file failed.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Storage lock was poisoned.
    #[error("storage lock poisoned")]
    LockPoisoned,

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    SerializationError(String),
}

/// In-place edit applied to the search configuration inside one
/// load→mutate→replace sequence.
pub type ConfigUpdate<'a> = &'a (dyn Fn(&mut SearchConfig) + Send + Sync);

/// Storage trait for persisting bot state.
#[async_trait]
pub trait StateStore: Send + Sync {
    // Search configuration

    /// Load the search configuration, materializing and persisting the
    /// defaults when none exists yet.
    async fn load_config(&self) -> Result<SearchConfig, StorageError>;

    /// Replace the search configuration as a whole.
    async fn save_config(&self, config: &SearchConfig) -> Result<(), StorageError>;

    /// Load, edit and replace the search configuration in one step.
    /// Returns the stored result.
    async fn update_config(&self, update: ConfigUpdate<'_>) -> Result<SearchConfig, StorageError>;

    // Seen-jobs ledger

    /// Load the set of already-dispatched job ids (empty when absent).
    async fn load_seen(&self) -> Result<HashSet<JobId>, StorageError>;

    /// Add ids to the persisted ledger. The ledger never shrinks.
    async fn extend_seen(&self, ids: &[JobId]) -> Result<(), StorageError>;

    // Saved-jobs log

    /// All saved jobs, oldest first.
    async fn list_saved(&self) -> Result<Vec<JobRecord>, StorageError>;

    /// Append a job to the saved-jobs log.
    async fn append_saved(&self, job: JobRecord) -> Result<(), StorageError>;

    /// Remove every saved job.
    async fn clear_saved(&self) -> Result<(), StorageError>;
}
