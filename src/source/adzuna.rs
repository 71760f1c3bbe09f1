//! Adzuna job-search client.

use async_trait::async_trait;
use std::time::Duration;

use super::types::SearchResponse;
use super::{JobSource, SourceError};
use crate::config::{AdzunaSettings, ConfigError, SearchConfig, require};
use crate::core::job::JobRecord;

/// Only the first result page is ever requested.
const SEARCH_PAGE: u32 = 1;

/// Application credentials for the job-search API.
#[derive(Debug, Clone)]
pub struct AdzunaCredentials {
    pub app_id: String,
    pub app_key: String,
}

/// Client for the Adzuna search endpoint.
pub struct AdzunaClient {
    client: reqwest::Client,
    base_url: String,
    country: String,
    results_per_page: u32,
    credentials: AdzunaCredentials,
}

impl AdzunaClient {
    /// Create a client against `base_url` (e.g. `https://api.adzuna.com`).
    pub fn new(
        base_url: impl Into<String>,
        country: impl Into<String>,
        credentials: AdzunaCredentials,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            country: country.into(),
            results_per_page: 3,
            credentials,
        })
    }

    /// Build a client from settings, requiring the credentials to be present.
    pub fn from_settings(settings: &AdzunaSettings) -> Result<Self, ConfigError> {
        let credentials = AdzunaCredentials {
            app_id: require(&settings.app_id, "ADZUNA_APP_ID")?.to_string(),
            app_key: require(&settings.app_key, "ADZUNA_APP_KEY")?.to_string(),
        };
        let client = Self::new(
            &settings.base_url,
            &settings.country,
            credentials,
            Duration::from_secs(settings.request_timeout_secs),
        )
        .map_err(|e| ConfigError::InvalidConfig(format!("HTTP client: {}", e)))?;
        Ok(client.with_results_per_page(settings.results_per_page))
    }

    /// Set the page size.
    pub fn with_results_per_page(mut self, results_per_page: u32) -> Self {
        self.results_per_page = results_per_page;
        self
    }

    /// Search endpoint for the configured country.
    pub fn search_url(&self) -> String {
        format!(
            "{}/v1/api/jobs/{}/search/{}",
            self.base_url, self.country, SEARCH_PAGE
        )
    }
}

#[async_trait]
impl JobSource for AdzunaClient {
    async fn search(
        &self,
        config: &SearchConfig,
        keyword: &str,
    ) -> Result<Vec<JobRecord>, SourceError> {
        let results_per_page = self.results_per_page.to_string();
        let distance = config.radius.to_string();
        let resp = self
            .client
            .get(self.search_url())
            .query(&[
                ("app_id", self.credentials.app_id.as_str()),
                ("app_key", self.credentials.app_key.as_str()),
                ("results_per_page", results_per_page.as_str()),
                ("what", keyword),
                ("where", config.location.as_str()),
                ("distance", distance.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        let parsed: SearchResponse =
            serde_json::from_str(&body).map_err(|e| SourceError::Decode(e.to_string()))?;

        let jobs = parsed.into_records();
        tracing::debug!(keyword, count = jobs.len(), "Fetched postings");
        Ok(jobs)
    }
}
