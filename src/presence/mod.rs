// src/presence/mod.rs
pub mod log_sink;
pub mod webhook;

use std::fmt;
use async_trait::async_trait;
use crate::models::snapshot::{DisplayMode, Occupancy};

pub use log_sink::LogPresence;
pub use webhook::WebhookPresence;

/// Longest text a presence activity accepts.
pub const MAX_PRESENCE_TEXT: usize = 128;

#[derive(Debug)]
pub enum PresenceError {
    InvalidText(String),
    Rejected(String),
    Transport(reqwest::Error),
}

impl fmt::Display for PresenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidText(text) => write!(f, "Invalid presence text: {:?}", text),
            Self::Rejected(reason) => write!(f, "Presence update rejected: {}", reason),
            Self::Transport(e) => write!(f, "Presence connection failed: {}", e),
        }
    }
}

impl std::error::Error for PresenceError {}

impl From<reqwest::Error> for PresenceError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e)
    }
}

/// External presence display (chat client status, relay service, ...).
#[async_trait]
pub trait PresenceSink: Send + Sync {
    /// Name of the sink, for logging
    fn name(&self) -> &'static str;

    /// Shows `text` with the status for `occupancy`; `mode` says whether it is the
    /// player count or the map.
    async fn set_presence(
        &self,
        text: &str,
        occupancy: Occupancy,
        mode: DisplayMode,
    ) -> Result<(), PresenceError>;
}

pub fn validate_text(text: &str) -> Result<(), PresenceError> {
    if text.trim().is_empty() || text.chars().count() > MAX_PRESENCE_TEXT {
        return Err(PresenceError::InvalidText(text.to_string()));
    }
    Ok(())
}
