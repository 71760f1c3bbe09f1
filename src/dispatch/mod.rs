//! Dispatcher: publishes new jobs to the chat channel.
//!
//! Each job becomes one message with Save and Skip actions. Published jobs
//! are remembered in-process so a later button press can be resolved back to
//! the full record. That registry is never pruned and grows with every
//! published job for the life of the process; a restart clears it. A publish
//! failure is logged and counted; it never undoes the ledger commit that
//! preceded it.

mod discord;
mod message;

pub use discord::DiscordChannel;
pub use message::{
    ActionKind, ActionRef, ActionStyle, MessageAction, OutboundMessage, render_job_message,
};

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::core::job::JobRecord;
use crate::core::types::JobId;

/// Errors from the chat platform.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// Transport-level failure.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The platform answered with a non-success status.
    #[error("platform error {status}: {message}")]
    Status { status: u16, message: String },

    /// The channel refused the message for a non-HTTP reason.
    #[error("message rejected: {0}")]
    Rejected(String),
}

/// A destination for formatted messages with interactive actions.
#[async_trait]
pub trait ChatChannel: Send + Sync {
    /// Publish one message.
    async fn send(&self, message: &OutboundMessage) -> Result<(), ChannelError>;
}

/// Outcome of publishing a batch of jobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub published: usize,
    pub failed: usize,
}

/// Publishes jobs and resolves their actions later.
pub struct Dispatcher {
    channel: Arc<dyn ChatChannel>,
    published: RwLock<HashMap<JobId, JobRecord>>,
}

impl Dispatcher {
    /// Create a dispatcher publishing into `channel`.
    pub fn new(channel: Arc<dyn ChatChannel>) -> Self {
        Self {
            channel,
            published: RwLock::new(HashMap::new()),
        }
    }

    /// Publish each job in order. Keywords are highlighted in the titles.
    pub async fn publish<S: AsRef<str> + Sync>(
        &self,
        jobs: &[JobRecord],
        keywords: &[S],
    ) -> DispatchReport {
        let mut report = DispatchReport::default();

        for job in jobs {
            let message = render_job_message(job, keywords);
            match self.channel.send(&message).await {
                Ok(()) => {
                    self.published
                        .write()
                        .await
                        .insert(job.id.clone(), job.clone());
                    report.published += 1;
                }
                Err(e) => {
                    tracing::error!(job_id = %job.id, error = %e, "Failed to publish job message");
                    report.failed += 1;
                }
            }
        }

        report
    }

    /// The record behind a published message, if it was published by this
    /// process.
    pub async fn lookup(&self, id: &JobId) -> Option<JobRecord> {
        self.published.read().await.get(id).cloned()
    }
}
