//! Process settings.
//!
//! Settings come from an optional YAML file (`jobwatch.yaml`) with secrets and
//! deployment identifiers layered on top from the environment. Environment
//! values always win over the file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::error::ConfigError;

/// Default time zone the daily run time is interpreted in.
pub const DEFAULT_TIMEZONE: &str = "Europe/Berlin";

/// Top-level settings (jobwatch.yaml).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding config.json, jobs_seen.json and saved_jobs.json.
    pub data_dir: PathBuf,
    /// IANA time zone for the daily execution time.
    pub timezone: String,
    pub adzuna: AdzunaSettings,
    pub discord: DiscordSettings,
    pub api: ApiSettings,
    pub logging: LogSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            timezone: DEFAULT_TIMEZONE.to_string(),
            adzuna: AdzunaSettings::default(),
            discord: DiscordSettings::default(),
            api: ApiSettings::default(),
            logging: LogSettings::default(),
        }
    }
}

/// Log file settings. Console output is always on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Directory for the rotating log file; `None` disables file output.
    pub dir: Option<PathBuf>,
    /// File name prefix; files are named `<prefix>.<date>.log`.
    pub file_prefix: String,
    /// Rotated files kept before the oldest is removed.
    pub max_files: usize,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            dir: Some(PathBuf::from("logs")),
            file_prefix: "jobbot".to_string(),
            max_files: 7,
        }
    }
}

/// Job-search API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdzunaSettings {
    pub base_url: String,
    /// Country code used in the search path, e.g. "de".
    pub country: String,
    pub results_per_page: u32,
    pub request_timeout_secs: u64,
    pub app_id: Option<String>,
    pub app_key: Option<String>,
}

impl Default for AdzunaSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.adzuna.com".to_string(),
            country: "de".to_string(),
            results_per_page: 3,
            request_timeout_secs: 10,
            app_id: None,
            app_key: None,
        }
    }
}

/// Chat platform settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordSettings {
    pub api_base: String,
    pub bot_token: Option<String>,
    pub channel_id: Option<String>,
    pub application_id: Option<String>,
    /// Hex-encoded Ed25519 public key used to verify inbound interactions.
    pub public_key: Option<String>,
}

impl Default for DiscordSettings {
    fn default() -> Self {
        Self {
            api_base: "https://discord.com/api/v10".to_string(),
            bot_token: None,
            channel_id: None,
            application_id: None,
            public_key: None,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8565,
        }
    }
}

impl Settings {
    /// Load settings from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_yaml(&content).map_err(|e| match e {
            ConfigError::YamlFileError { source, .. } => ConfigError::YamlFileError {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Parse settings from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::YamlFileError {
            path: PathBuf::from("<inline>"),
            source: e,
        })
    }

    /// Load settings the way the binary does: optional file, then `.env` and
    /// the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        // A missing .env is the normal case in production.
        let _ = dotenvy::dotenv();
        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Overlay values from an environment lookup.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let set = |target: &mut Option<String>, key: &str| {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                *target = Some(value);
            }
        };

        set(&mut self.discord.bot_token, "DISCORD_BOT_TOKEN");
        set(&mut self.discord.channel_id, "DISCORD_CHANNEL_ID");
        set(&mut self.discord.application_id, "DISCORD_APPLICATION_ID");
        set(&mut self.discord.public_key, "DISCORD_PUBLIC_KEY");
        set(&mut self.adzuna.app_id, "ADZUNA_APP_ID");
        set(&mut self.adzuna.app_key, "ADZUNA_APP_KEY");

        if let Some(country) = lookup("ADZUNA_COUNTRY").filter(|v| !v.trim().is_empty()) {
            self.adzuna.country = country;
        }
        if let Some(dir) = lookup("JOBWATCH_DATA_DIR").filter(|v| !v.trim().is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(tz) = lookup("JOBWATCH_TIMEZONE").filter(|v| !v.trim().is_empty()) {
            self.timezone = tz;
        }
        if let Some(dir) = lookup("JOBWATCH_LOG_DIR").filter(|v| !v.trim().is_empty()) {
            self.logging.dir = Some(PathBuf::from(dir));
        }
    }

    /// Check values that have no sensible fallback.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.adzuna.results_per_page == 0 {
            return Err(ConfigError::InvalidConfig(
                "adzuna.results_per_page must be at least 1".to_string(),
            ));
        }
        if self.logging.max_files == 0 {
            return Err(ConfigError::InvalidConfig(
                "logging.max_files must be at least 1".to_string(),
            ));
        }
        self.timezone
            .parse::<chrono_tz::Tz>()
            .map_err(|_| ConfigError::InvalidConfig(format!("unknown timezone: {}", self.timezone)))?;
        Ok(())
    }
}

/// Return a required optional setting, or a `MissingField` error naming its
/// environment variable.
pub fn require<'a>(value: &'a Option<String>, env_name: &str) -> Result<&'a str, ConfigError> {
    value
        .as_deref()
        .ok_or_else(|| ConfigError::MissingField(env_name.to_string()))
}
