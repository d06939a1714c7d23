// src/telemetry/battlelog.rs
use std::collections::HashMap;
use serde::Deserialize;
use serde_json::Value;
use crate::maps::MapNames;
use crate::models::snapshot::Snapshot;
use super::{to_count, FetchError};

pub const DEFAULT_BASE_URL: &str = "https://keeper.battlelog.com";

pub fn snapshot_url(base_url: &str, server_guid: &str) -> String {
    format!("{}/snapshot/{}", base_url, server_guid)
}

#[derive(Debug, Deserialize)]
struct KeeperResponse {
    snapshot: Option<KeeperSnapshot>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeeperSnapshot {
    current_map: String,
    max_players: i64,
    #[serde(default)]
    waiting_players: i64,
    #[serde(default)]
    team_info: HashMap<String, TeamInfo>,
}

#[derive(Debug, Deserialize)]
struct TeamInfo {
    #[serde(default)]
    players: PlayerList,
}

/// Keeper keys players by persona id, but a plain array is accepted as well.
#[derive(Debug, Default, Deserialize)]
#[serde(untagged)]
enum PlayerList {
    Keyed(HashMap<String, Value>),
    Listed(Vec<Value>),
    #[default]
    Empty,
}

impl PlayerList {
    fn len(&self) -> usize {
        match self {
            Self::Keyed(players) => players.len(),
            Self::Listed(players) => players.len(),
            Self::Empty => 0,
        }
    }
}

pub fn parse_snapshot(body: Value, maps: &MapNames) -> Result<Snapshot, FetchError> {
    let response: KeeperResponse = serde_json::from_value(body)?;
    let snapshot = response
        .snapshot
        .ok_or_else(|| FetchError::Shape("snapshot is missing".to_string()))?;

    if snapshot.max_players <= 0 {
        return Err(FetchError::Shape(format!("maxPlayers is {}", snapshot.max_players)));
    }

    let players: usize = snapshot.team_info.values().map(|team| team.players.len()).sum();

    Ok(Snapshot::online(
        to_count(players as i64),
        to_count(snapshot.max_players),
        to_count(snapshot.waiting_players),
        maps.resolve(&snapshot.current_map),
    ))
}
