//! The normalized job-posting record.
//!
//! A `JobRecord` is what survives from a job-search API result: everything
//! outside this shape is discarded when the record is built. Records are
//! immutable once fetched and are what the dispatcher publishes and the
//! saved-jobs log stores.

use serde::{Deserialize, Serialize};

use super::types::JobId;

/// A job posting reduced to the fields the bot displays and stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Identifier assigned by the job-search API.
    pub id: JobId,
    /// Posting title.
    pub title: String,
    /// Display name of the hiring company, when the API provides one.
    #[serde(default)]
    pub company: Option<String>,
    /// Display name of the posting's location, when the API provides one.
    #[serde(default)]
    pub location: Option<String>,
    /// Link to the posting.
    pub url: String,
}

impl JobRecord {
    /// Create a record with only the mandatory fields set.
    pub fn new(id: impl Into<JobId>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            company: None,
            location: None,
            url: url.into(),
        }
    }

    /// Set the company display name.
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    /// Set the location display name.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Company name, or a placeholder when absent.
    pub fn company_or_unknown(&self) -> &str {
        self.company.as_deref().unwrap_or("Unknown company")
    }

    /// Location name, or a placeholder when absent.
    pub fn location_or_unknown(&self) -> &str {
        self.location.as_deref().unwrap_or("Unknown location")
    }
}
