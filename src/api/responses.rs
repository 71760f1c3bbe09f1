//! API response types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::commands::Reply;
use crate::pipeline::CycleReport;
use crate::scheduler::{SchedulerState, SchedulerStatus};

/// Interaction response type: acknowledge a PING.
const PONG: u8 = 1;
/// Interaction response type: reply with a message.
const CHANNEL_MESSAGE: u8 = 4;
/// Message flag: only the invoking user sees the reply.
const EPHEMERAL: u32 = 1 << 6;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Scheduler state response.
#[derive(Debug, Serialize)]
pub struct SchedulerStateResponse {
    pub state: SchedulerState,
    pub next_fire: Option<DateTime<Utc>>,
    pub last_cycle: Option<CycleReport>,
}

impl From<SchedulerStatus> for SchedulerStateResponse {
    fn from(status: SchedulerStatus) -> Self {
        Self {
            state: status.state,
            next_fire: status.next_fire,
            last_cycle: status.last_cycle,
        }
    }
}

/// Body returned to the chat platform for an interaction.
#[derive(Debug, Serialize)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<InteractionMessage>,
}

#[derive(Debug, Serialize)]
pub struct InteractionMessage {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u32>,
}

impl InteractionResponse {
    pub fn pong() -> Self {
        Self {
            kind: PONG,
            data: None,
        }
    }

    pub fn reply(reply: Reply) -> Self {
        Self {
            kind: CHANNEL_MESSAGE,
            data: Some(InteractionMessage {
                content: reply.content,
                flags: reply.ephemeral.then_some(EPHEMERAL),
            }),
        }
    }
}
