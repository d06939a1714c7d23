// src/presence/log_sink.rs
use async_trait::async_trait;
use log::info;
use crate::models::snapshot::{DisplayMode, Occupancy};
use super::{validate_text, PresenceError, PresenceSink};

/// Writes presence changes to the log. Used when no webhook is configured.
#[derive(Debug, Default)]
pub struct LogPresence;

#[async_trait]
impl PresenceSink for LogPresence {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn set_presence(
        &self,
        text: &str,
        occupancy: Occupancy,
        mode: DisplayMode,
    ) -> Result<(), PresenceError> {
        validate_text(text)?;
        info!("Presence [{}] {} {}", occupancy.status(), mode.activity(), text);
        Ok(())
    }
}
