// src/telemetry/mod.rs
pub mod battlebit;
pub mod battlelog;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use async_trait::async_trait;
use lazy_static::lazy_static;
use log::{debug, warn};
use serde_json::Value;
use crate::config::Config;
use crate::maps::MapNames;
use crate::models::snapshot::Snapshot;

lazy_static! {
    static ref USER_AGENT: String = format!("bf4-status-bot/{}", env!("CARGO_PKG_VERSION"));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameVariant {
    /// Battlefield 4, polled through the Battlelog keeper snapshot.
    Bf4,
    /// BattleBit Remastered, polled through the public server list.
    Bbr,
}

impl FromStr for GameVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BF4" => Ok(Self::Bf4),
            "BBR" | "BATTLEBIT" => Ok(Self::Bbr),
            other => Err(format!("Unknown game {}", other)),
        }
    }
}

impl fmt::Display for GameVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bf4 => write!(f, "BF4"),
            Self::Bbr => write!(f, "BBR"),
        }
    }
}

impl GameVariant {
    /// Public host serving this variant's telemetry.
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::Bf4 => battlelog::DEFAULT_BASE_URL,
            Self::Bbr => battlebit::DEFAULT_BASE_URL,
        }
    }

    /// One round-trip to the variant's telemetry endpoint under `base_url`.
    pub async fn fetch(
        &self,
        client: &reqwest::Client,
        base_url: &str,
        server: &str,
        maps: &MapNames,
    ) -> Result<Snapshot, FetchError> {
        match self {
            Self::Bf4 => {
                let body = get_json(client, &battlelog::snapshot_url(base_url, server)).await?;
                battlelog::parse_snapshot(body, maps)
            }
            Self::Bbr => {
                let body = get_json(client, &battlebit::server_list_url(base_url)).await?;
                battlebit::parse_server_list(body, server)
            }
        }
    }
}

#[derive(Debug)]
pub enum FetchError {
    Transport(reqwest::Error),
    Status(reqwest::StatusCode),
    Decode(serde_json::Error),
    Shape(String),
    NoMatch(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "Request failed: {}", e),
            Self::Status(status) => write!(f, "Unexpected HTTP status {}", status),
            Self::Decode(e) => write!(f, "Malformed response: {}", e),
            Self::Shape(reason) => write!(f, "Unexpected response shape: {}", reason),
            Self::NoMatch(server) => write!(f, "No server matching {:?}", server),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e)
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e)
    }
}

async fn get_json(client: &reqwest::Client, url: &str) -> Result<Value, FetchError> {
    debug!("GET {}", url);
    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(FetchError::Status(response.status()));
    }
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Anything that can produce the current server snapshot. Implementations never fail:
/// unreachable or malformed telemetry comes back as an offline snapshot.
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    async fn fetch(&self) -> Snapshot;
}

pub struct StatusFetcher {
    client: reqwest::Client,
    variant: GameVariant,
    base_url: String,
    server: String,
    maps: Arc<MapNames>,
}

impl StatusFetcher {
    pub fn new(config: &Config, maps: Arc<MapNames>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(USER_AGENT.as_str())
            .build()?;

        let base_url = config
            .telemetry_base_url
            .clone()
            .unwrap_or_else(|| config.game.default_base_url().to_string());

        Ok(Self {
            client,
            variant: config.game,
            base_url: base_url.trim_end_matches('/').to_string(),
            server: config.server.clone(),
            maps,
        })
    }
}

#[async_trait]
impl TelemetrySource for StatusFetcher {
    async fn fetch(&self) -> Snapshot {
        let result = self
            .variant
            .fetch(&self.client, &self.base_url, &self.server, &self.maps)
            .await;
        match result {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("{} server {} is offline: {}", self.variant, self.server, e);
                Snapshot::offline()
            }
        }
    }
}

/// Saturating conversion for counts that arrive as signed JSON numbers.
pub(crate) fn to_count(value: i64) -> u32 {
    value.clamp(0, i64::from(u32::MAX)) as u32
}
