//! Command execution against the persisted state.

use std::sync::Arc;

use super::{Command, CommandError, Reply};
use crate::config::{SearchConfig, WorkType, parse_keywords};
use crate::core::job::JobRecord;
use crate::core::schedule::TimeOfDay;
use crate::dispatch::{ActionKind, ActionRef, Dispatcher};
use crate::storage::StateStore;

/// Number of saved jobs `favorites` shows.
pub const FAVORITES_LIMIT: usize = 10;

/// Longest message content the chat platform accepts, in characters.
pub const MESSAGE_LIMIT: usize = 2000;

const INVALID_TIME: &str = "❌ Invalid format. Use HH:MM (e.g. 08:00).";

/// Executes commands and button actions.
pub struct CommandHandler {
    store: Arc<dyn StateStore>,
    dispatcher: Arc<Dispatcher>,
}

impl CommandHandler {
    pub fn new(store: Arc<dyn StateStore>, dispatcher: Arc<Dispatcher>) -> Self {
        Self { store, dispatcher }
    }

    /// Execute a command and turn any failure into a user-facing reply.
    pub async fn handle(&self, command: Command) -> Reply {
        match self.execute(command).await {
            Ok(reply) => reply,
            Err(CommandError::Validation(message)) => Reply::private(format!("❌ {}", message)),
            Err(e) => {
                tracing::error!(error = %e, "Command failed");
                Reply::private("❌ Something went wrong, please try again later.")
            }
        }
    }

    /// Execute a command.
    pub async fn execute(&self, command: Command) -> Result<Reply, CommandError> {
        match command {
            Command::Favorites => self.favorites().await,
            Command::ClearFavorites => {
                self.store.clear_saved().await?;
                tracing::info!("Saved jobs cleared");
                Ok(Reply::private("🧹 All saved jobs have been cleared."))
            }
            Command::ExportFavorites => Ok(Reply::private("📎 Export is currently disabled.")),
            Command::Config {
                location,
                radius,
                keywords,
                work_type,
            } => {
                self.configure(location, radius, &keywords, work_type.as_deref())
                    .await
            }
            Command::ShowConfig => {
                let config = self.store.load_config().await?;
                Ok(Reply::private(format_config(&config)))
            }
            Command::SetTime { time } => self.set_time(&time).await,
            Command::Action(action) => self.action(action).await,
        }
    }

    async fn favorites(&self) -> Result<Reply, CommandError> {
        let saved = self.store.list_saved().await?;
        if saved.is_empty() {
            return Ok(Reply::private("📭 No saved jobs found."));
        }

        let start = saved.len().saturating_sub(FAVORITES_LIMIT);
        let blocks: Vec<String> = saved[start..].iter().map(format_saved_job).collect();
        Ok(Reply::private(fit_blocks(&blocks, MESSAGE_LIMIT)))
    }

    async fn configure(
        &self,
        location: String,
        radius: i64,
        keywords: &str,
        work_type: Option<&str>,
    ) -> Result<Reply, CommandError> {
        let location = location.trim().to_string();
        if location.is_empty() {
            return Err(CommandError::Validation("Location must not be empty.".to_string()));
        }
        let radius = u32::try_from(radius)
            .map_err(|_| CommandError::Validation("Radius must be a non-negative number.".to_string()))?;
        let keywords = parse_keywords(keywords);
        if keywords.is_empty() {
            return Err(CommandError::Validation(
                "At least one keyword is required.".to_string(),
            ));
        }
        let work_type = match work_type {
            Some(raw) => raw
                .parse::<WorkType>()
                .map_err(|_| {
                    CommandError::Validation(
                        "Work type must be one of remote, hybrid, onsite, all.".to_string(),
                    )
                })?,
            None => WorkType::All,
        };

        let stored = self
            .store
            .update_config(&move |config: &mut SearchConfig| {
                config.location = location.clone();
                config.radius = radius;
                config.keywords = keywords.clone();
                config.work_type = work_type;
            })
            .await?;

        tracing::info!(
            location = %stored.location,
            radius = stored.radius,
            keywords = ?stored.keywords,
            work_type = %stored.work_type,
            "Search configuration updated"
        );
        Ok(Reply::private("✅ Configuration saved."))
    }

    async fn set_time(&self, raw: &str) -> Result<Reply, CommandError> {
        let time = match raw.parse::<TimeOfDay>() {
            Ok(time) => time,
            Err(_) => return Ok(Reply::private(INVALID_TIME)),
        };

        let normalized = time.to_string();
        self.store
            .update_config(&|config: &mut SearchConfig| {
                config.execution_time = normalized.clone();
            })
            .await?;

        tracing::info!(execution_time = %time, "Execution time updated");
        Ok(Reply::private(format!("✅ Time set to {}.", time)))
    }

    async fn action(&self, action: ActionRef) -> Result<Reply, CommandError> {
        match action.kind {
            ActionKind::Skip => {
                tracing::debug!(job_id = %action.job_id, "Job skipped");
                Ok(Reply::private("⏩ Skipped."))
            }
            ActionKind::Save => match self.dispatcher.lookup(&action.job_id).await {
                Some(job) => {
                    tracing::info!(job_id = %job.id, title = %job.title, "Job saved");
                    self.store.append_saved(job).await?;
                    Ok(Reply::private("✅ Job saved!"))
                }
                None => {
                    tracing::warn!(job_id = %action.job_id, "Save requested for unknown job");
                    Ok(Reply::private("⚠️ This job is no longer available."))
                }
            },
        }
    }
}

/// Join blocks with blank lines, dropping the oldest until the text fits
/// `limit` characters. A single oversized block is cut off.
fn fit_blocks(blocks: &[String], limit: usize) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut used = 0;
    for block in blocks.iter().rev() {
        let cost = block.chars().count() + if kept.is_empty() { 0 } else { 2 };
        if used + cost > limit {
            break;
        }
        used += cost;
        kept.push(block);
    }

    if kept.is_empty() {
        return blocks
            .last()
            .map(|b| b.chars().take(limit).collect())
            .unwrap_or_default();
    }
    kept.reverse();
    kept.join("\n\n")
}

fn format_saved_job(job: &JobRecord) -> String {
    format!(
        "💼 **{}**\n🏢 {}\n📍 {}\n🔗 {}",
        job.title,
        job.company_or_unknown(),
        job.location_or_unknown(),
        job.url
    )
}

fn format_config(config: &SearchConfig) -> String {
    format!(
        "📍 Location: {}\n📏 Radius: {} km\n🔍 Keywords: {}\n🧭 Work type: {}\n⏰ Execution time: {}",
        config.location,
        config.radius,
        config.keywords.join(", "),
        config.work_type,
        config.execution_time
    )
}
