// src/config.rs
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use log::{info, warn};
use crate::telemetry::GameVariant;
use crate::utils::clamp_rotation_interval;

pub const ENV_PREFIX: &str = "BF4STATUSBOT_";
pub const MIN_FETCH_INTERVAL_SECS: u64 = 15;
/// Read in order from the config folder; later files override earlier ones.
pub const CONFIG_FILES: [&str; 2] = ["default.toml", "user.toml"];
/// Table inside the config files holding this bot's settings.
pub const CONFIG_SECTION: &str = "BF4StatusBot";

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str, String),
    FetchIntervalTooShort(u64),
    File(String, String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(key) => write!(f, "Missing required setting {}{}", ENV_PREFIX, key),
            Self::Invalid(key, value) => {
                write!(f, "Invalid value for {}{}: {:?}", ENV_PREFIX, key, value)
            }
            Self::FetchIntervalTooShort(secs) => write!(
                f,
                "{}INTERVAL_DATA_FETCH must be at least {} seconds, got {}",
                ENV_PREFIX, MIN_FETCH_INTERVAL_SECS, secs
            ),
            Self::File(path, reason) => write!(f, "Failed to load config file {}: {}", path, reason),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug)]
pub struct Config {
    pub game: GameVariant,
    /// Battlelog GUID for BF4, name substring for BattleBit.
    pub server: String,
    pub fetch_interval_secs: u64,
    pub presence_interval_secs: u64,
    pub check_map: bool,
    pub maps_file: Option<PathBuf>,
    pub request_timeout_secs: u64,
    pub fetch_jitter_ms: u64,
    pub presence_webhook_url: Option<String>,
    /// Overrides the public telemetry host, e.g. for a caching proxy.
    pub telemetry_base_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            game: GameVariant::Bf4,
            server: String::new(),
            fetch_interval_secs: 20,
            presence_interval_secs: 20,
            check_map: true,
            maps_file: None,
            request_timeout_secs: 10,
            fetch_jitter_ms: 0,
            presence_webhook_url: None,
            telemetry_base_url: None,
        }
    }
}

impl Config {
    /// Settings from `default.toml` and `user.toml` in `folder`, overridden by
    /// prefixed environment variables.
    pub fn load(folder: &Path) -> Result<Self, ConfigError> {
        let files = load_folder(folder)?;
        Self::from_layers(&files, env_lookup)
    }

    /// `lookup` wins over `files`; keys are given without the prefix.
    pub fn from_layers<F>(files: &HashMap<String, String>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_lookup(|key| lookup(key).or_else(|| files.get(key).cloned()))
    }

    /// Builds the config from a key lookup; keys are given without the prefix.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let game: GameVariant = match get("GAME") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid("GAME", v))?,
            None => defaults.game,
        };

        let server = match game {
            GameVariant::Bf4 => get("SERVER_GUID").ok_or(ConfigError::Missing("SERVER_GUID"))?,
            GameVariant::Bbr => get("SERVER_NAME").ok_or(ConfigError::Missing("SERVER_NAME"))?,
        };

        let fetch_interval_secs =
            parse_or("INTERVAL_DATA_FETCH", get("INTERVAL_DATA_FETCH"), defaults.fetch_interval_secs)?;
        if fetch_interval_secs < MIN_FETCH_INTERVAL_SECS {
            return Err(ConfigError::FetchIntervalTooShort(fetch_interval_secs));
        }

        let request_timeout_secs =
            parse_or("REQUEST_TIMEOUT", get("REQUEST_TIMEOUT"), defaults.request_timeout_secs)?;
        if request_timeout_secs == 0 {
            return Err(ConfigError::Invalid("REQUEST_TIMEOUT", "0".to_string()));
        }

        Ok(Self {
            game,
            server,
            fetch_interval_secs,
            presence_interval_secs: parse_or(
                "INTERVAL_PRESENCE_CHANGE",
                get("INTERVAL_PRESENCE_CHANGE"),
                defaults.presence_interval_secs,
            )?,
            check_map: match get("CHECK_MAP") {
                Some(v) => parse_bool(&v).ok_or(ConfigError::Invalid("CHECK_MAP", v))?,
                None => defaults.check_map,
            },
            maps_file: get("MAPS_FILE").map(PathBuf::from),
            request_timeout_secs,
            fetch_jitter_ms: parse_or("FETCH_JITTER_MS", get("FETCH_JITTER_MS"), defaults.fetch_jitter_ms)?,
            presence_webhook_url: get("PRESENCE_WEBHOOK_URL"),
            telemetry_base_url: get("TELEMETRY_URL"),
        })
    }

    pub fn fetch_interval(&self) -> Duration {
        Duration::from_secs(self.fetch_interval_secs)
    }

    /// Presence rotation interval, clamped to 3..=120 seconds.
    pub fn rotation_interval(&self) -> Duration {
        clamp_rotation_interval(self.presence_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn fetch_jitter(&self) -> Duration {
        Duration::from_millis(self.fetch_jitter_ms)
    }
}

fn env_lookup(key: &str) -> Option<String> {
    env::var(format!("{}{}", ENV_PREFIX, key)).ok()
}

/// Flattens the config files in `folder` into uppercased keys. A missing folder or
/// file is skipped so the bot can run from the environment alone.
pub fn load_folder(folder: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let mut settings = HashMap::new();
    if !folder.is_dir() {
        warn!(
            "Config folder {} does not exist, configure the bot with {}* environment variables",
            folder.display(),
            ENV_PREFIX
        );
        return Ok(settings);
    }

    for name in CONFIG_FILES {
        let path = folder.join(name);
        if !path.is_file() {
            continue;
        }
        let raw = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::File(path.display().to_string(), e.to_string()))?;
        let table = parse_config_file(&raw)
            .map_err(|reason| ConfigError::File(path.display().to_string(), reason))?;
        info!("Loaded {} settings from {}", table.len(), path.display());
        settings.extend(table);
    }
    Ok(settings)
}

/// Top-level keys first, then `[default]`, then the bot's own section.
fn parse_config_file(raw: &str) -> Result<HashMap<String, String>, String> {
    let table: HashMap<String, toml::Value> = toml::from_str(raw).map_err(|e| e.to_string())?;

    let mut settings = HashMap::new();
    let mut sections = Vec::new();
    for (key, value) in table {
        match value {
            toml::Value::Table(section) => sections.push((key, section)),
            value => {
                settings.insert(key.to_uppercase(), scalar_to_string(&key, value)?);
            }
        }
    }

    for wanted in ["default", CONFIG_SECTION] {
        for (name, section) in &sections {
            if !name.eq_ignore_ascii_case(wanted) {
                continue;
            }
            for (key, value) in section {
                settings.insert(key.to_uppercase(), scalar_to_string(key, value.clone())?);
            }
        }
    }
    Ok(settings)
}

fn scalar_to_string(key: &str, value: toml::Value) -> Result<String, String> {
    match value {
        toml::Value::String(s) => Ok(s),
        toml::Value::Integer(i) => Ok(i.to_string()),
        toml::Value::Boolean(b) => Ok(b.to_string()),
        toml::Value::Float(f) => Ok(f.to_string()),
        other => Err(format!("{} must be a plain value, got {}", key, other.type_str())),
    }
}

fn parse_or<T: FromStr>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError> {
    match value {
        Some(v) => v.parse().map_err(|_| ConfigError::Invalid(key, v)),
        None => Ok(default),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
