//! Inbound chat-platform interactions: signature check and payload shapes.
//!
//! Every request carries an Ed25519 signature over `timestamp ‖ body`,
//! made with the application's key pair. Requests that fail verification are
//! rejected before the body is parsed.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::config::ConfigError;

pub const SIGNATURE_HEADER: &str = "x-signature-ed25519";
pub const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

/// Verifies interaction signatures against the application's public key.
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    key: VerifyingKey,
}

impl SignatureVerifier {
    /// Parse a hex-encoded 32-byte public key.
    pub fn from_hex(public_key: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| {
            ConfigError::InvalidConfig(format!("invalid interaction public key: {}", reason))
        };
        let bytes = hex::decode(public_key.trim()).map_err(|e| invalid(&e.to_string()))?;
        let bytes: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| invalid("expected 32 bytes"))?;
        let key = VerifyingKey::from_bytes(&bytes).map_err(|e| invalid(&e.to_string()))?;
        Ok(Self { key })
    }

    pub fn new(key: VerifyingKey) -> Self {
        Self { key }
    }

    /// True when `signature_hex` signs `timestamp` followed by `body`.
    pub fn verify(&self, signature_hex: &str, timestamp: &str, body: &[u8]) -> bool {
        let Ok(raw) = hex::decode(signature_hex) else {
            return false;
        };
        let Ok(raw) = <[u8; 64]>::try_from(raw.as_slice()) else {
            return false;
        };
        let signature = Signature::from_bytes(&raw);

        let mut message = Vec::with_capacity(timestamp.len() + body.len());
        message.extend_from_slice(timestamp.as_bytes());
        message.extend_from_slice(body);

        self.key.verify(&message, &signature).is_ok()
    }
}

/// Interaction kinds this service answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Ping,
    Command,
    Component,
    Other(u8),
}

impl From<u8> for InteractionKind {
    fn from(value: u8) -> Self {
        match value {
            1 => InteractionKind::Ping,
            2 => InteractionKind::Command,
            3 => InteractionKind::Component,
            other => InteractionKind::Other(other),
        }
    }
}

/// An interaction as posted by the platform. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
pub struct Interaction {
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub data: Option<InteractionData>,
}

#[derive(Debug, Default, Deserialize)]
pub struct InteractionData {
    /// Slash-command name.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub options: Vec<InteractionOption>,
    /// Button id.
    #[serde(default)]
    pub custom_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InteractionOption {
    pub name: String,
    #[serde(default)]
    pub value: Value,
}

impl Interaction {
    pub fn kind(&self) -> InteractionKind {
        InteractionKind::from(self.kind)
    }
}

impl InteractionData {
    /// Options keyed by name.
    pub fn option_map(&self) -> HashMap<String, Value> {
        self.options
            .iter()
            .map(|o| (o.name.clone(), o.value.clone()))
            .collect()
    }
}
