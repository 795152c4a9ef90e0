//! The species dex: lower-cased species name → label/value catalog.

use crate::catalog::{Catalog, Side};
use crate::error::{CatalogError, DexError};
use crate::stats::BaseStats;
use crate::types::Type;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, warn};

/// Lower-case ASCII alphanumerics only: `"Iron Valiant"` → `"ironvaliant"`.
pub fn to_id(name: &str) -> String {
    name.to_ascii_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

#[derive(Clone, Debug, Default)]
pub struct Dex {
    species: Map<String, Value>,
}

impl Dex {
    pub fn load(path: &Path) -> Result<Self, DexError> {
        let raw = std::fs::read_to_string(path).map_err(|source| DexError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw, &path.display().to_string())
    }

    /// `origin` names the source in error messages.
    pub fn from_json_str(json: &str, origin: &str) -> Result<Self, DexError> {
        let value: Value = serde_json::from_str(json).map_err(|source| DexError::Json {
            origin: origin.to_string(),
            source,
        })?;
        Self::from_value(value, origin)
    }

    pub fn from_value(value: Value, origin: &str) -> Result<Self, DexError> {
        let Value::Object(root) = value else {
            return Err(DexError::NotAnObject {
                origin: origin.to_string(),
            });
        };
        let species: Map<String, Value> = root
            .into_iter()
            .filter(|(name, entry)| {
                let keep = entry.is_object();
                if !keep {
                    warn!(species = name.as_str(), "skipping dex entry that is not an object");
                }
                keep
            })
            .collect();
        debug!(origin, count = species.len(), "dex loaded");
        Ok(Self { species })
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    pub fn species_names(&self) -> impl Iterator<Item = &str> {
        self.species.keys().map(String::as_str)
    }

    /// Find a species by its lower-cased name, falling back to a match on
    /// [`to_id`] (`"Roaring-Moon"` finds `"roaringmoon"`). Returns the stored
    /// key alongside the catalog.
    pub fn catalog(&self, side: Side, species: &str) -> Result<(&str, &Catalog), CatalogError> {
        let wanted = species.to_lowercase();
        let found = self.species.get_key_value(&wanted).or_else(|| {
            let id = to_id(&wanted);
            self.species.iter().find(|(key, _)| to_id(key) == id)
        });
        match found {
            Some((key, Value::Object(catalog))) => Ok((key.as_str(), catalog)),
            _ => Err(CatalogError::SpeciesNotFound {
                side,
                species: wanted,
            }),
        }
    }
}

/// Battle-relevant facts about a species, read from its catalog.
#[derive(Clone, Debug, PartialEq)]
pub struct SpeciesData {
    pub name: String,
    pub types: Vec<Type>,
    pub base_stats: BaseStats,
}

impl SpeciesData {
    /// `key` is the dex key, used when the catalog carries no `name`.
    pub fn from_catalog(key: &str, catalog: &Catalog) -> Result<Self, DexError> {
        let name = catalog
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(key)
            .to_string();

        let mut types = Vec::with_capacity(2);
        for field in ["type1", "type2"] {
            let Some(type_name) = catalog.get(field).and_then(Value::as_str) else {
                continue;
            };
            if type_name.trim().is_empty() {
                continue;
            }
            let ty = Type::from_name(type_name).ok_or_else(|| DexError::UnknownType {
                species: key.to_string(),
                name: type_name.to_string(),
            })?;
            types.push(ty);
        }
        if types.is_empty() {
            return Err(DexError::MissingField {
                species: key.to_string(),
                field: "type1",
            });
        }

        let stat = |field: &'static str| -> Result<u32, DexError> {
            let value = catalog.get(field).and_then(|value| match value {
                Value::Number(n) => n.as_u64(),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            });
            let value = value.ok_or_else(|| DexError::MissingField {
                species: key.to_string(),
                field,
            })?;
            u8::try_from(value)
                .ok()
                .filter(|base| *base > 0)
                .map(u32::from)
                .ok_or_else(|| DexError::InvalidStat {
                    species: key.to_string(),
                    field,
                    value,
                })
        };
        let base_stats = BaseStats {
            hp: stat("hp")?,
            atk: stat("atk")?,
            def: stat("def")?,
            spa: stat("spa")?,
            spd: stat("spd")?,
            spe: stat("spe")?,
        };

        Ok(Self {
            name,
            types,
            base_stats,
        })
    }
}
