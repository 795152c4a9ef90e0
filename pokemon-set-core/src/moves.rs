use crate::dex::to_id;
use crate::error::DexError;
use crate::types::Type;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveData {
    pub name: String,
    #[serde(rename = "type")]
    pub move_type: Type,
    pub category: MoveCategory,
    #[serde(default)]
    pub base_power: u32,
}

/// Moves keyed by id (`"earthquake"`, `"uturn"`).
#[derive(Clone, Debug, Default)]
pub struct MoveDex {
    moves: HashMap<String, MoveData>,
}

static BUILTIN_MOVES: Lazy<MoveDex> = Lazy::new(|| {
    let json_str = include_str!("../../data/moves.json");
    MoveDex::from_json_str(json_str, "data/moves.json").expect("Failed to parse data/moves.json")
});

impl MoveDex {
    /// The move table shipped with the crate.
    pub fn builtin() -> &'static MoveDex {
        &BUILTIN_MOVES
    }

    pub fn load(path: &Path) -> Result<Self, DexError> {
        let raw = std::fs::read_to_string(path).map_err(|source| DexError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw, &path.display().to_string())
    }

    pub fn from_json_str(json: &str, origin: &str) -> Result<Self, DexError> {
        let parsed: HashMap<String, MoveData> =
            serde_json::from_str(json).map_err(|source| DexError::Json {
                origin: origin.to_string(),
                source,
            })?;
        let moves = parsed
            .into_iter()
            .map(|(key, data)| (to_id(&key), data))
            .collect();
        Ok(Self { moves })
    }

    pub fn get(&self, name: &str) -> Option<&MoveData> {
        self.moves.get(&to_id(name))
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}
