//! Discord REST implementation of [`ChatChannel`].
//!
//! Publishing uses `POST /channels/{id}/messages` with a single action row of
//! buttons. Slash commands are registered with a bulk overwrite of the
//! application's global commands.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

use super::message::{ActionStyle, MessageAction, OutboundMessage};
use super::{ChannelError, ChatChannel};
use crate::commands::{CommandSpec, OptionKind};
use crate::config::{ConfigError, DiscordSettings, require};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

// Discord component and option type codes.
const COMPONENT_ACTION_ROW: u8 = 1;
const COMPONENT_BUTTON: u8 = 2;
const BUTTON_SUCCESS: u8 = 3;
const BUTTON_SECONDARY: u8 = 2;
const COMMAND_CHAT_INPUT: u8 = 1;
const OPTION_STRING: u8 = 3;
const OPTION_INTEGER: u8 = 4;

#[derive(Debug, Serialize)]
struct CreateMessage<'a> {
    content: &'a str,
    components: Vec<ActionRow>,
    allowed_mentions: AllowedMentions,
}

#[derive(Debug, Serialize)]
struct AllowedMentions {
    parse: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ActionRow {
    #[serde(rename = "type")]
    kind: u8,
    components: Vec<Button>,
}

#[derive(Debug, Serialize)]
struct Button {
    #[serde(rename = "type")]
    kind: u8,
    style: u8,
    label: String,
    custom_id: String,
}

impl From<&MessageAction> for Button {
    fn from(action: &MessageAction) -> Self {
        Button {
            kind: COMPONENT_BUTTON,
            style: match action.style {
                ActionStyle::Success => BUTTON_SUCCESS,
                ActionStyle::Secondary => BUTTON_SECONDARY,
            },
            label: action.label.clone(),
            custom_id: action.custom_id.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ApplicationCommand<'a> {
    name: &'a str,
    description: &'a str,
    #[serde(rename = "type")]
    kind: u8,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    options: Vec<ApplicationCommandOption<'a>>,
}

#[derive(Debug, Serialize)]
struct ApplicationCommandOption<'a> {
    #[serde(rename = "type")]
    kind: u8,
    name: &'a str,
    description: &'a str,
    required: bool,
}

impl<'a> From<&'a CommandSpec> for ApplicationCommand<'a> {
    fn from(spec: &'a CommandSpec) -> Self {
        ApplicationCommand {
            name: spec.name,
            description: spec.description,
            kind: COMMAND_CHAT_INPUT,
            options: spec
                .options
                .iter()
                .map(|o| ApplicationCommandOption {
                    kind: match o.kind {
                        OptionKind::String => OPTION_STRING,
                        OptionKind::Integer => OPTION_INTEGER,
                    },
                    name: o.name,
                    description: o.description,
                    required: o.required,
                })
                .collect(),
        }
    }
}

/// A Discord text channel the bot posts into.
pub struct DiscordChannel {
    client: reqwest::Client,
    api_base: String,
    token: String,
    channel_id: String,
}

impl DiscordChannel {
    /// Create a channel client. `api_base` is e.g. `https://discord.com/api/v10`.
    pub fn new(
        api_base: impl Into<String>,
        token: impl Into<String>,
        channel_id: impl Into<String>,
    ) -> Result<Self, ChannelError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token: token.into(),
            channel_id: channel_id.into(),
        })
    }

    /// Build from settings, requiring the bot token and channel id.
    pub fn from_settings(settings: &DiscordSettings) -> Result<Self, ConfigError> {
        let token = require(&settings.bot_token, "DISCORD_BOT_TOKEN")?;
        let channel_id = require(&settings.channel_id, "DISCORD_CHANNEL_ID")?;
        Self::new(&settings.api_base, token, channel_id)
            .map_err(|e| ConfigError::InvalidConfig(format!("HTTP client: {}", e)))
    }

    /// The channel this client posts into.
    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    fn auth_header(&self) -> String {
        format!("Bot {}", self.token)
    }

    /// Replace the application's global slash commands with `commands`.
    /// Returns how many commands were registered.
    pub async fn sync_commands(
        &self,
        application_id: &str,
        commands: &[CommandSpec],
    ) -> Result<usize, ChannelError> {
        let body: Vec<ApplicationCommand<'_>> = commands.iter().map(Into::into).collect();
        let url = format!("{}/applications/{}/commands", self.api_base, application_id);
        let resp = self
            .client
            .put(&url)
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ChannelError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body.len())
    }
}

#[async_trait]
impl ChatChannel for DiscordChannel {
    async fn send(&self, message: &OutboundMessage) -> Result<(), ChannelError> {
        let components = if message.actions.is_empty() {
            Vec::new()
        } else {
            vec![ActionRow {
                kind: COMPONENT_ACTION_ROW,
                components: message.actions.iter().map(Button::from).collect(),
            }]
        };
        let body = CreateMessage {
            content: &message.content,
            components,
            allowed_mentions: AllowedMentions { parse: Vec::new() },
        };

        let url = format!("{}/channels/{}/messages", self.api_base, self.channel_id);
        let resp = self
            .client
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ChannelError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }
}
