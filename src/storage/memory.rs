//! In-memory storage implementation.
//!
//! Provides a thread-safe in-memory backend for testing and development.
//! Data is not persisted across restarts.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::RwLock;

use super::{ConfigUpdate, StateStore, StorageError};
use crate::config::SearchConfig;
use crate::core::job::JobRecord;
use crate::core::types::JobId;

/// In-memory storage backend.
pub struct InMemoryStore {
    config: RwLock<Option<SearchConfig>>,
    seen: RwLock<HashSet<JobId>>,
    saved: RwLock<Vec<JobRecord>>,
}

impl InMemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            config: RwLock::new(None),
            seen: RwLock::new(HashSet::new()),
            saved: RwLock::new(Vec::new()),
        }
    }

    /// Create a store seeded with a search configuration.
    pub fn with_config(config: SearchConfig) -> Self {
        let store = Self::new();
        if let Ok(mut slot) = store.config.write() {
            *slot = Some(config);
        }
        store
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateStore for InMemoryStore {
    async fn load_config(&self) -> Result<SearchConfig, StorageError> {
        let mut config = self.config.write().map_err(|_| StorageError::LockPoisoned)?;
        Ok(config.get_or_insert_with(SearchConfig::default).clone())
    }

    async fn save_config(&self, new_config: &SearchConfig) -> Result<(), StorageError> {
        let mut config = self.config.write().map_err(|_| StorageError::LockPoisoned)?;
        *config = Some(new_config.clone());
        Ok(())
    }

    async fn update_config(&self, update: ConfigUpdate<'_>) -> Result<SearchConfig, StorageError> {
        let mut config = self.config.write().map_err(|_| StorageError::LockPoisoned)?;
        let current = config.get_or_insert_with(SearchConfig::default);
        update(current);
        Ok(current.clone())
    }

    async fn load_seen(&self) -> Result<HashSet<JobId>, StorageError> {
        let seen = self.seen.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(seen.clone())
    }

    async fn extend_seen(&self, ids: &[JobId]) -> Result<(), StorageError> {
        let mut seen = self.seen.write().map_err(|_| StorageError::LockPoisoned)?;
        seen.extend(ids.iter().cloned());
        Ok(())
    }

    async fn list_saved(&self) -> Result<Vec<JobRecord>, StorageError> {
        let saved = self.saved.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(saved.clone())
    }

    async fn append_saved(&self, job: JobRecord) -> Result<(), StorageError> {
        let mut saved = self.saved.write().map_err(|_| StorageError::LockPoisoned)?;
        saved.push(job);
        Ok(())
    }

    async fn clear_saved(&self) -> Result<(), StorageError> {
        let mut saved = self.saved.write().map_err(|_| StorageError::LockPoisoned)?;
        saved.clear();
        Ok(())
    }
}
