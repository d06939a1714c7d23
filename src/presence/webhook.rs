// src/presence/webhook.rs
use std::time::Duration;
use async_trait::async_trait;
use log::debug;
use serde::Serialize;
use crate::models::snapshot::{DisplayMode, Occupancy};
use super::{validate_text, PresenceError, PresenceSink};

#[derive(Debug, Serialize)]
struct PresencePayload<'a> {
    text: &'a str,
    status: &'static str,
    occupancy: Occupancy,
    mode: DisplayMode,
    activity: &'static str,
}

/// Relays presence updates as JSON to an HTTP endpoint owned by the chat client.
pub struct WebhookPresence {
    client: reqwest::Client,
    url: String,
}

impl WebhookPresence {
    pub fn new(url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl PresenceSink for WebhookPresence {
    fn name(&self) -> &'static str {
        "webhook"
    }

    async fn set_presence(
        &self,
        text: &str,
        occupancy: Occupancy,
        mode: DisplayMode,
    ) -> Result<(), PresenceError> {
        validate_text(text)?;

        let payload = PresencePayload {
            text,
            status: occupancy.status(),
            occupancy,
            mode,
            activity: mode.activity(),
        };
        let response = self.client.post(&self.url).json(&payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PresenceError::Rejected(format!("{} {}", status, body.trim())));
        }

        debug!("Webhook accepted presence {:?}", text);
        Ok(())
    }
}
