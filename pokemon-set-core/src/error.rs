//! Error types raised by the dex, catalog and damage layers.
//!
//! Set parsing itself never fails; these cover loading data and resolving
//! requests against it.

use crate::catalog::Side;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or reading a data file.
#[derive(Debug, Error)]
pub enum DexError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON in {origin}: {source}")]
    Json {
        origin: String,
        source: serde_json::Error,
    },

    #[error("{origin} must be a JSON object keyed by name")]
    NotAnObject { origin: String },

    #[error("species '{species}' is missing field '{field}'")]
    MissingField {
        species: String,
        field: &'static str,
    },

    #[error("species '{species}' has base {field} {value}, expected 1..=255")]
    InvalidStat {
        species: String,
        field: &'static str,
        value: u64,
    },

    #[error("species '{species}' has unknown type '{name}'")]
    UnknownType { species: String, name: String },
}

/// Lookup failures for a requested species or set. These stop the request.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum CatalogError {
    #[error("{side} species '{species}' not found")]
    SpeciesNotFound { side: Side, species: String },

    #[error("{side} species '{species}' has no set labelled '{label}'")]
    SetNotFound {
        side: Side,
        species: String,
        label: String,
    },

    #[error("{side} species '{species}' has no selectable sets")]
    NoSets { side: Side, species: String },
}

/// Per-move failures reported by a damage engine.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum DamageError {
    #[error("invalid move")]
    UnknownMove(String),
}
