//! Configuration loading and validation.
//!
//! Two layers: the persisted, user-editable [`SearchConfig`], and the
//! process-level [`Settings`] read from YAML and the environment.

mod error;
mod settings;
mod types;

pub use error::ConfigError;
pub use settings::{
    AdzunaSettings, ApiSettings, DEFAULT_TIMEZONE, DiscordSettings, LogSettings, Settings,
    require,
};
pub use types::{SearchConfig, WorkType, parse_keywords};
