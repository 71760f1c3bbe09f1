//! API request handlers.

use axum::{Json, body::Bytes, extract::State, http::HeaderMap};
use std::sync::Arc;

use crate::commands::{Command, CommandHandler, Reply};
use crate::pipeline::CycleReport;
use crate::scheduler::SchedulerHandle;

use super::errors::ApiError;
use super::interactions::{
    Interaction, InteractionKind, SIGNATURE_HEADER, SignatureVerifier, TIMESTAMP_HEADER,
};
use super::responses::{HealthResponse, InteractionResponse, SchedulerStateResponse};

/// Shared application state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub handle: SchedulerHandle,
    pub commands: Arc<CommandHandler>,
    /// Absent when no interaction public key is configured.
    pub verifier: Option<Arc<SignatureVerifier>>,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// Get scheduler state.
pub async fn get_scheduler_state(State(state): State<ApiState>) -> Json<SchedulerStateResponse> {
    Json(SchedulerStateResponse::from(state.handle.status().await))
}

/// Run one search cycle now.
pub async fn trigger_cycle(State(state): State<ApiState>) -> Result<Json<CycleReport>, ApiError> {
    let report = state.handle.trigger_now().await?;
    Ok(Json(report))
}

/// Chat-platform interaction webhook.
pub async fn interactions(
    State(state): State<ApiState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<InteractionResponse>, ApiError> {
    let verifier = state.verifier.as_ref().ok_or_else(|| {
        ApiError::ServiceUnavailable("interactions are not configured".to_string())
    })?;

    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized(format!("missing {} header", name)))
    };
    let signature = header(SIGNATURE_HEADER)?;
    let timestamp = header(TIMESTAMP_HEADER)?;
    if !verifier.verify(signature, timestamp, &body) {
        tracing::warn!("Rejected interaction with invalid signature");
        return Err(ApiError::Unauthorized("invalid request signature".to_string()));
    }

    let interaction: Interaction = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("invalid interaction: {}", e)))?;

    let kind = interaction.kind();
    let data = interaction.data.unwrap_or_default();
    let parsed = match kind {
        InteractionKind::Ping => return Ok(Json(InteractionResponse::pong())),
        InteractionKind::Command => {
            let name = data.name.as_deref().unwrap_or_default();
            tracing::debug!(command = name, "Slash command received");
            Command::from_invocation(name, &data.option_map())
        }
        InteractionKind::Component => {
            let custom_id = data.custom_id.as_deref().unwrap_or_default();
            tracing::debug!(custom_id, "Button press received");
            Command::from_action_id(custom_id)
        }
        InteractionKind::Other(kind) => {
            return Err(ApiError::BadRequest(format!(
                "unsupported interaction type {}",
                kind
            )));
        }
    };

    let reply = match parsed {
        Ok(command) => state.commands.handle(command).await,
        Err(e) => Reply::private(format!("❌ {}", e)),
    };
    Ok(Json(InteractionResponse::reply(reply)))
}
