//! Wire types for the job-search API.
//!
//! Only the fields the bot keeps are modelled; everything else in the
//! payload is ignored during decoding. Results are decoded one by one so a
//! single malformed entry is dropped without losing its siblings.

use serde::Deserialize;
use serde_json::Value;

use crate::core::job::JobRecord;
use crate::core::types::JobId;

/// Search response body.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<Value>,
}

impl SearchResponse {
    /// Decode each result into a record, skipping entries that do not fit.
    pub fn into_records(self) -> Vec<JobRecord> {
        self.results
            .into_iter()
            .enumerate()
            .filter_map(|(index, raw)| match serde_json::from_value::<SearchResult>(raw) {
                Ok(result) => Some(JobRecord::from(result)),
                Err(e) => {
                    tracing::warn!(index, error = %e, "Skipping malformed search result");
                    None
                }
            })
            .collect()
    }
}

/// A single posting in a search response.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    pub id: JobId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<DisplayName>,
    #[serde(default)]
    pub location: Option<DisplayName>,
    #[serde(default)]
    pub redirect_url: Option<String>,
}

/// Nested object carrying a `display_name`.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayName {
    #[serde(default)]
    pub display_name: Option<String>,
}

impl From<SearchResult> for JobRecord {
    fn from(result: SearchResult) -> Self {
        JobRecord {
            id: result.id,
            title: result.title.unwrap_or_default(),
            company: result.company.and_then(|c| c.display_name),
            location: result.location.and_then(|l| l.display_name),
            url: result.redirect_url.unwrap_or_default(),
        }
    }
}
