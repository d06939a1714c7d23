// src/telemetry/battlebit.rs
use serde::Deserialize;
use serde_json::Value;
use crate::models::snapshot::Snapshot;
use crate::utils::camel_to_spaced;
use super::{to_count, FetchError};

pub const DEFAULT_BASE_URL: &str = "https://publicapi.battlebit.cloud";

pub fn server_list_url(base_url: &str) -> String {
    format!("{}/Servers/GetServerList", base_url)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ServerEntry {
    map: String,
    players: i64,
    #[serde(default)]
    queue_players: i64,
    max_players: i64,
}

/// Picks the first listed server whose name contains `server_name`, ignoring case.
pub fn parse_server_list(body: Value, server_name: &str) -> Result<Snapshot, FetchError> {
    let servers = match body {
        Value::Array(servers) => servers,
        other => {
            return Err(FetchError::Shape(format!(
                "expected a server list, got {}",
                json_kind(&other)
            )))
        }
    };

    let needle = server_name.to_lowercase();
    let entry = servers
        .into_iter()
        .find(|server| {
            server
                .get("Name")
                .and_then(Value::as_str)
                .map(|name| name.to_lowercase().contains(&needle))
                .unwrap_or(false)
        })
        .ok_or_else(|| FetchError::NoMatch(server_name.to_string()))?;

    let entry: ServerEntry = serde_json::from_value(entry)?;
    if entry.max_players <= 0 {
        return Err(FetchError::Shape(format!("MaxPlayers is {}", entry.max_players)));
    }

    Ok(Snapshot::online(
        to_count(entry.players),
        to_count(entry.max_players),
        to_count(entry.queue_players),
        camel_to_spaced(&entry.map),
    ))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use crate::models::snapshot::Occupancy;

    fn server_list() -> Value {
        json!([
            {
                "Name": "Community #1 | Conquest",
                "Map": "Azagor",
                "Players": 12,
                "QueuePlayers": 0,
                "MaxPlayers": 128
            },
            {
                "Name": "E4GL | 24/7 Frontline",
                "Map": "SandySunset",
                "Players": 150,
                "QueuePlayers": 4,
                "MaxPlayers": 127
            },
            {
                "Name": "e4gl | second",
                "Map": "WineParadise",
                "Players": 1,
                "QueuePlayers": 0,
                "MaxPlayers": 64
            }
        ])
    }

    #[test]
    fn first_case_insensitive_match_wins() {
        let snapshot = parse_server_list(server_list(), "E4gl").unwrap();
        assert_eq!(snapshot.player_count, 127);
        assert_eq!(snapshot.max_slots, 127);
        assert_eq!(snapshot.queue_count, 4);
        assert_eq!(snapshot.occupancy, Occupancy::High);
        assert_eq!(snapshot.players_text(), "127/127 [4] on Sandy Sunset");
    }

    #[test]
    fn no_match_is_an_error() {
        let result = parse_server_list(server_list(), "missing");
        assert!(matches!(result, Err(FetchError::NoMatch(name)) if name == "missing"));
    }

    #[test]
    fn entries_without_name_are_skipped() {
        let body = json!([
            { "Map": "Azagor", "Players": 1, "MaxPlayers": 10 },
            { "Name": "target", "Map": "TensaTown", "Players": 4, "MaxPlayers": 10 }
        ]);
        let snapshot = parse_server_list(body, "TARGET").unwrap();
        assert_eq!(snapshot.map_name, "Tensa Town");
        assert_eq!(snapshot.occupancy, Occupancy::Medium);
        assert_eq!(snapshot.queue_count, 0);
    }

    #[test]
    fn malformed_match_is_an_error() {
        let body = json!([{ "Name": "target", "Map": "Azagor", "Players": "many" }]);
        assert!(matches!(parse_server_list(body, "target"), Err(FetchError::Decode(_))));
        assert!(matches!(
            parse_server_list(json!({ "error": "down" }), "target"),
            Err(FetchError::Shape(_))
        ));
    }
}
