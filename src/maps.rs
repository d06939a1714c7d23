// src/maps.rs
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use log::info;

const BUNDLED_MAPS: &str = include_str!("../resources/maps.json");

#[derive(Debug)]
pub enum MapTableError {
    Io(String, std::io::Error),
    Parse(serde_json::Error),
    Empty,
}

impl fmt::Display for MapTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(path, e) => write!(f, "Failed to read map table {}: {}", path, e),
            Self::Parse(e) => write!(f, "Failed to parse map table: {}", e),
            Self::Empty => write!(f, "Map table contains no entries"),
        }
    }
}

impl std::error::Error for MapTableError {}

/// Engine map identifier to display name lookup. Keys are stored uppercased.
#[derive(Debug, Clone)]
pub struct MapNames {
    names: HashMap<String, String>,
}

impl MapNames {
    pub fn from_json(raw: &str) -> Result<Self, MapTableError> {
        let table: HashMap<String, String> =
            serde_json::from_str(raw).map_err(MapTableError::Parse)?;

        if table.is_empty() {
            return Err(MapTableError::Empty);
        }

        let names = table
            .into_iter()
            .map(|(engine, display)| (engine.to_uppercase(), display))
            .collect();

        Ok(Self { names })
    }

    pub fn bundled() -> Result<Self, MapTableError> {
        Self::from_json(BUNDLED_MAPS)
    }

    /// Loads the table from `path` when given, otherwise the copy compiled into the binary.
    pub fn load(path: Option<&Path>) -> Result<Self, MapTableError> {
        let maps = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .map_err(|e| MapTableError::Io(path.display().to_string(), e))?;
                Self::from_json(&raw)?
            }
            None => Self::bundled()?,
        };
        info!("Loaded {} map names", maps.len());
        Ok(maps)
    }

    pub fn resolve(&self, engine_id: &str) -> String {
        match self.names.get(&engine_id.to_uppercase()) {
            Some(name) => name.clone(),
            None => format!("unknown map: {}", engine_id),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case() {
        let maps = MapNames::bundled().unwrap();
        assert_eq!(maps.resolve("mp_damage"), maps.resolve("MP_Damage"));
        assert_eq!(maps.resolve("MP_DAMAGE"), "Lancang Dam");
        assert_eq!(maps.resolve("xp3_prpganda"), "Propaganda");
    }

    #[test]
    fn unknown_map_keeps_identifier() {
        let maps = MapNames::bundled().unwrap();
        let name = maps.resolve("nonexistent_map");
        assert!(name.contains("nonexistent_map"));
        assert_eq!(name, "unknown map: nonexistent_map");
    }

    #[test]
    fn corrupt_table_is_an_error() {
        assert!(matches!(MapNames::from_json("{not json"), Err(MapTableError::Parse(_))));
        assert!(matches!(MapNames::from_json("{}"), Err(MapTableError::Empty)));
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = MapNames::load(Some(Path::new("/nonexistent/maps.json")));
        assert!(matches!(result, Err(MapTableError::Io(_, _))));
    }

    #[test]
    fn custom_table_keys_are_uppercased() {
        let maps = MapNames::from_json(r#"{"Mp_Custom": "Custom Map"}"#).unwrap();
        assert_eq!(maps.resolve("mp_custom"), "Custom Map");
        assert_eq!(maps.len(), 1);
    }
}
