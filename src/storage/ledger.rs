//! Seen-jobs ledger: the deduplication state of the pipeline.
//!
//! The ledger is a working copy of the persisted id set. `filter_new` marks
//! ids as seen immediately, so two keywords returning the same posting in one
//! cycle yield a single new job. Marked ids reach durable storage only on
//! `commit`, which the pipeline calls once per cycle before dispatching.

use std::collections::HashSet;

use super::{StateStore, StorageError};
use crate::core::job::JobRecord;
use crate::core::types::JobId;

/// Working copy of the seen-jobs set plus the ids marked since the last commit.
#[derive(Debug, Default)]
pub struct SeenLedger {
    seen: HashSet<JobId>,
    pending: Vec<JobId>,
}

impl SeenLedger {
    /// Start from an explicit set of seen ids.
    pub fn from_ids(ids: impl IntoIterator<Item = JobId>) -> Self {
        Self {
            seen: ids.into_iter().collect(),
            pending: Vec::new(),
        }
    }

    /// Load the ledger from storage.
    pub async fn load(store: &dyn StateStore) -> Result<Self, StorageError> {
        Ok(Self::from_ids(store.load_seen().await?))
    }

    /// Whether `id` has been seen, committed or not.
    pub fn contains(&self, id: &JobId) -> bool {
        self.seen.contains(id)
    }

    /// Number of known ids, committed or not.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether the ledger knows no ids at all.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Ids marked since the last commit, in marking order.
    pub fn pending(&self) -> &[JobId] {
        &self.pending
    }

    /// Keep the candidates whose id is unseen, marking each kept id as seen.
    ///
    /// Order of the surviving candidates is preserved; a duplicate id within
    /// `candidates` survives only once.
    pub fn filter_new(&mut self, candidates: Vec<JobRecord>) -> Vec<JobRecord> {
        candidates
            .into_iter()
            .filter(|job| {
                if self.seen.insert(job.id.clone()) {
                    self.pending.push(job.id.clone());
                    true
                } else {
                    false
                }
            })
            .collect()
    }

    /// Persist the ids marked since the last commit. Returns how many were
    /// written; nothing is written when there are none.
    pub async fn commit(&mut self, store: &dyn StateStore) -> Result<usize, StorageError> {
        if self.pending.is_empty() {
            return Ok(0);
        }
        store.extend_seen(&self.pending).await?;
        let written = self.pending.len();
        self.pending.clear();
        Ok(written)
    }
}
