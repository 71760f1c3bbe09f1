//! Search configuration record.
//!
//! Exactly one `SearchConfig` exists at any time. It is read and written as a
//! whole, persisted as `config.json`, and materialized with defaults on first
//! access.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::ConfigError;
use crate::core::schedule::TimeOfDay;

/// Work-arrangement filter stored with the search configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkType {
    Remote,
    Hybrid,
    Onsite,
    #[default]
    All,
}

impl WorkType {
    /// Lower-case name as stored and displayed.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkType::Remote => "remote",
            WorkType::Hybrid => "hybrid",
            WorkType::Onsite => "onsite",
            WorkType::All => "all",
        }
    }
}

impl FromStr for WorkType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "remote" => Ok(WorkType::Remote),
            "hybrid" => Ok(WorkType::Hybrid),
            "onsite" => Ok(WorkType::Onsite),
            "all" => Ok(WorkType::All),
            other => Err(ConfigError::InvalidConfig(format!(
                "unknown work type '{}', expected remote, hybrid, onsite or all",
                other
            ))),
        }
    }
}

/// Stored values outside the known set read back as `All`, so a record
/// written by an older release still loads.
impl<'de> Deserialize<'de> for WorkType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        let Some(raw) = raw else {
            return Ok(WorkType::All);
        };
        Ok(raw.parse().unwrap_or_else(|_| {
            tracing::warn!(work_type = %raw, "Unknown stored work type, using 'all'");
            WorkType::All
        }))
    }
}

impl fmt::Display for WorkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-editable search parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Free-text location passed to the job-search API.
    pub location: String,
    /// Search radius in kilometres.
    #[serde(deserialize_with = "lenient_radius")]
    pub radius: u32,
    /// One query is issued per keyword, in this order.
    pub keywords: Vec<String>,
    #[serde(default)]
    pub work_type: WorkType,
    /// Daily run time, "HH:MM".
    #[serde(default = "default_execution_time")]
    pub execution_time: String,
}

/// Negative stored radii clamp to zero.
fn lenient_radius<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    let clamped = raw.clamp(0, i64::from(u32::MAX));
    if clamped != raw {
        tracing::warn!(radius = raw, clamped, "Stored radius out of range");
    }
    Ok(clamped as u32)
}

fn default_execution_time() -> String {
    "12:00".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            location: "Coburg".to_string(),
            radius: 100,
            keywords: vec!["system administrator".to_string()],
            work_type: WorkType::All,
            execution_time: default_execution_time(),
        }
    }
}

impl SearchConfig {
    /// Parsed execution time.
    pub fn execution_time(&self) -> Result<TimeOfDay, ConfigError> {
        self.execution_time
            .parse()
            .map_err(|e| ConfigError::InvalidConfig(format!("execution_time: {}", e)))
    }

    /// Check the record's invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(ConfigError::InvalidConfig(
                "at least one keyword is required".to_string(),
            ));
        }
        self.execution_time()?;
        Ok(())
    }
}

/// Split a comma-separated keyword list into trimmed, non-empty keywords,
/// preserving order.
pub fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}
