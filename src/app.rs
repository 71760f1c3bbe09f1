//! Application wiring.
//!
//! `AppContext` owns every long-lived component and is built once from
//! [`Settings`]. Handlers and tasks receive what they need from it explicitly.

use std::sync::Arc;
use thiserror::Error;

use crate::api::{ApiState, SignatureVerifier};
use crate::commands::{CommandHandler, definitions};
use crate::config::{ConfigError, Settings};
use crate::dispatch::{DiscordChannel, Dispatcher};
use crate::pipeline::SearchCycle;
use crate::scheduler::{Scheduler, SchedulerError, SchedulerHandle};
use crate::source::AdzunaClient;
use crate::storage::{FileStore, StateStore, StorageError};

/// Errors raised while assembling or running the application.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Long-lived components shared by the scheduler, the command surface and
/// the HTTP server.
pub struct AppContext {
    pub settings: Settings,
    pub store: Arc<dyn StateStore>,
    pub dispatcher: Arc<Dispatcher>,
    pub cycle: Arc<SearchCycle>,
    pub commands: Arc<CommandHandler>,
    discord: Arc<DiscordChannel>,
}

impl AppContext {
    /// Validate settings, open the state directory and build the clients.
    pub async fn build(settings: Settings) -> Result<Self, AppError> {
        settings.validate()?;

        let store: Arc<dyn StateStore> = Arc::new(FileStore::open(settings.data_dir.clone()).await?);
        let source = Arc::new(AdzunaClient::from_settings(&settings.adzuna)?);
        let discord = Arc::new(DiscordChannel::from_settings(&settings.discord)?);
        let dispatcher = Arc::new(Dispatcher::new(discord.clone()));
        let cycle = Arc::new(SearchCycle::new(
            Arc::clone(&store),
            source,
            Arc::clone(&dispatcher),
        ));
        let commands = Arc::new(CommandHandler::new(
            Arc::clone(&store),
            Arc::clone(&dispatcher),
        ));

        tracing::info!(
            data_dir = %settings.data_dir.display(),
            timezone = %settings.timezone,
            channel_id = %discord.channel_id(),
            "Application initialized"
        );

        Ok(Self {
            settings,
            store,
            dispatcher,
            cycle,
            commands,
            discord,
        })
    }

    /// A scheduler driving this context's search cycle.
    pub fn scheduler(&self) -> Scheduler {
        Scheduler::new(
            Arc::clone(&self.cycle),
            Arc::clone(&self.store),
            self.settings.timezone.clone(),
        )
    }

    /// Register the slash commands with the platform. Failure is logged and
    /// the bot keeps running.
    pub async fn sync_commands(&self) {
        let Some(application_id) = self.settings.discord.application_id.as_deref() else {
            tracing::warn!("DISCORD_APPLICATION_ID not set, skipping slash-command sync");
            return;
        };
        match self.discord.sync_commands(application_id, &definitions()).await {
            Ok(count) => tracing::info!(count, "Slash commands synced"),
            Err(e) => tracing::error!(error = %e, "Failed to sync slash commands"),
        }
    }

    /// HTTP state bound to a running scheduler.
    pub fn api_state(&self, handle: SchedulerHandle) -> Result<ApiState, ConfigError> {
        let verifier = match self.settings.discord.public_key.as_deref() {
            Some(key) => Some(Arc::new(SignatureVerifier::from_hex(key)?)),
            None => {
                tracing::warn!("DISCORD_PUBLIC_KEY not set, interactions endpoint disabled");
                None
            }
        };
        Ok(ApiState {
            handle,
            commands: Arc::clone(&self.commands),
            verifier,
        })
    }
}
