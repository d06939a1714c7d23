// src/models/snapshot.rs
use serde::Serialize;

pub const OFFLINE_TEXT: &str = "offline";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Occupancy {
    High,
    Medium,
    Low,
    Offline,
}

impl Occupancy {
    /// Classifies `players / max_slots`: >= 60% is high, >= 35% medium, below that low.
    pub fn classify(players: u32, max_slots: u32) -> Self {
        if max_slots == 0 {
            return Self::Offline;
        }
        // integer cross-multiplication keeps the 0.60 and 0.35 boundaries exact
        let players = u64::from(players) * 100;
        let max_slots = u64::from(max_slots);
        if players >= max_slots * 60 {
            Self::High
        } else if players >= max_slots * 35 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Status indicator shown next to the presence text.
    pub fn status(&self) -> &'static str {
        match self {
            Self::High => "online",
            Self::Medium => "idle",
            Self::Low | Self::Offline => "dnd",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    Players,
    Map,
}

impl DisplayMode {
    /// Activity kind the text is shown as: the player count is watched, the map is played.
    pub fn activity(&self) -> &'static str {
        match self {
            Self::Players => "watching",
            Self::Map => "playing",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub player_count: u32,
    pub max_slots: u32,
    pub queue_count: u32,
    pub map_name: String,
    pub occupancy: Occupancy,
    pub is_offline: bool,
}

impl Snapshot {
    /// Builds an online snapshot, clamping the player count into `[0, max_slots]`.
    /// A zero `max_slots` cannot be classified and yields an offline snapshot.
    pub fn online(player_count: u32, max_slots: u32, queue_count: u32, map_name: String) -> Self {
        if max_slots == 0 {
            return Self::offline();
        }
        let player_count = player_count.min(max_slots);
        Self {
            player_count,
            max_slots,
            queue_count,
            map_name,
            occupancy: Occupancy::classify(player_count, max_slots),
            is_offline: false,
        }
    }

    pub fn offline() -> Self {
        Self {
            player_count: 0,
            max_slots: 0,
            queue_count: 0,
            map_name: String::new(),
            occupancy: Occupancy::Offline,
            is_offline: true,
        }
    }

    /// Same reading with a different player count, reclassified.
    pub fn with_player_count(&self, player_count: u32) -> Self {
        if self.is_offline {
            return self.clone();
        }
        Self::online(player_count, self.max_slots, self.queue_count, self.map_name.clone())
    }

    pub fn players_text(&self) -> String {
        if self.is_offline {
            return OFFLINE_TEXT.to_string();
        }
        if self.queue_count > 0 {
            format!(
                "{}/{} [{}] on {}",
                self.player_count, self.max_slots, self.queue_count, self.map_name
            )
        } else {
            format!("{}/{} on {}", self.player_count, self.max_slots, self.map_name)
        }
    }

    pub fn map_text(&self) -> String {
        if self.is_offline {
            return OFFLINE_TEXT.to_string();
        }
        self.map_name.clone()
    }

    pub fn text_for(&self, mode: DisplayMode) -> String {
        match mode {
            DisplayMode::Players => self.players_text(),
            DisplayMode::Map => self.map_text(),
        }
    }
}
