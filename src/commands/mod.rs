//! Command surface: the slash commands and button actions users invoke.
//!
//! Every command produces a private [`Reply`] for the invoking user. Commands
//! are thin edits over the persisted state; validation failures leave state
//! unchanged and are reported back as a rejection message.

mod definitions;
mod handlers;

pub use definitions::{CommandSpec, OptionKind, OptionSpec, definitions};
pub use handlers::{CommandHandler, FAVORITES_LIMIT};

use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

use crate::dispatch::ActionRef;
use crate::storage::StorageError;

/// Errors from command execution.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The user's input was rejected.
    #[error("{0}")]
    Validation(String),

    /// Persisted state could not be read or written.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// A parsed user invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the most recently saved jobs.
    Favorites,
    /// Empty the saved-jobs log.
    ClearFavorites,
    /// Export saved jobs (disabled).
    ExportFavorites,
    /// Replace location, radius, keywords and work type at once.
    Config {
        location: String,
        radius: i64,
        keywords: String,
        work_type: Option<String>,
    },
    /// Show the current search configuration.
    ShowConfig,
    /// Change the daily execution time.
    SetTime { time: String },
    /// A Save or Skip button press.
    Action(ActionRef),
}

impl Command {
    /// Build a command from a slash-command name and its named options.
    pub fn from_invocation(
        name: &str,
        options: &HashMap<String, Value>,
    ) -> Result<Self, CommandError> {
        match name {
            "favorites" => Ok(Command::Favorites),
            "clear_favorites" => Ok(Command::ClearFavorites),
            "export_favorites" => Ok(Command::ExportFavorites),
            "show_config" => Ok(Command::ShowConfig),
            "set_time" => Ok(Command::SetTime {
                time: string_option(options, "time")?,
            }),
            "config" => Ok(Command::Config {
                location: string_option(options, "location")?,
                radius: integer_option(options, "radius")?,
                keywords: string_option(options, "keywords")?,
                work_type: options
                    .get("work_type")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            }),
            other => Err(CommandError::Validation(format!(
                "Unknown command: {}",
                other
            ))),
        }
    }

    /// Build a command from a button's custom id.
    pub fn from_action_id(custom_id: &str) -> Result<Self, CommandError> {
        custom_id
            .parse::<ActionRef>()
            .map(Command::Action)
            .map_err(CommandError::Validation)
    }
}

fn string_option(options: &HashMap<String, Value>, name: &str) -> Result<String, CommandError> {
    options
        .get(name)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| CommandError::Validation(format!("Missing option: {}", name)))
}

fn integer_option(options: &HashMap<String, Value>, name: &str) -> Result<i64, CommandError> {
    options
        .get(name)
        .and_then(Value::as_i64)
        .ok_or_else(|| CommandError::Validation(format!("Missing option: {}", name)))
}

/// A private response to the invoking user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub content: String,
    /// Visible only to the invoking user.
    pub ephemeral: bool,
}

impl Reply {
    /// A reply only the invoking user can see.
    pub fn private(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: true,
        }
    }
}
