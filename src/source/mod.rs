//! Job source: queries the external job-search API.
//!
//! One query is issued per keyword. A [`JobSource`] only performs network
//! I/O; it never touches persisted state.

mod adzuna;
mod types;

pub use adzuna::{AdzunaClient, AdzunaCredentials};
pub use types::{SearchResponse, SearchResult};

use async_trait::async_trait;
use thiserror::Error;

use crate::config::SearchConfig;
use crate::core::job::JobRecord;

/// Errors from a single job-search request.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body was not the expected JSON.
    #[error("malformed response: {0}")]
    Decode(String),
}

/// A searchable source of job postings.
#[async_trait]
pub trait JobSource: Send + Sync {
    /// Fetch the first page of postings for one keyword, using the location
    /// and radius from `config`.
    async fn search(&self, config: &SearchConfig, keyword: &str)
    -> Result<Vec<JobRecord>, SourceError>;
}
