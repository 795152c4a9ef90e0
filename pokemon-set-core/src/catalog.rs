//! Selection of parseable sets from a species' label→value dictionary.

use crate::dex::Dex;
use crate::error::CatalogError;
use crate::parser::{parse_set, ParsedSet};
use phf::phf_set;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use tracing::debug;

/// One species' entries, in the order they were stored.
pub type Catalog = Map<String, Value>;

/// Label prefix used by the dex for strategy sets.
pub const STRATEGY_PREFIX: &str = "strategy:";

/// Descriptive labels that never hold a set, compared lower-case.
static METADATA_LABELS: phf::Set<&'static str> = phf_set! {
    "name",
    "type1",
    "type2",
    "ability1",
    "ability2",
    "hidden ability",
    "format",
};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Attacker,
    Defender,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Attacker => f.write_str("attacker"),
            Side::Defender => f.write_str("defender"),
        }
    }
}

/// Which string-valued, non-metadata entries count as sets.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SelectionPolicy {
    /// Every string entry whose label is not a metadata label.
    AnyString,
    /// Only labels starting with the given marker.
    Prefix(String),
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        SelectionPolicy::Prefix(STRATEGY_PREFIX.to_string())
    }
}

impl SelectionPolicy {
    pub fn accepts(&self, label: &str) -> bool {
        if is_metadata_label(label) {
            return false;
        }
        match self {
            SelectionPolicy::AnyString => true,
            SelectionPolicy::Prefix(marker) => label.starts_with(marker.as_str()),
        }
    }
}

pub fn is_metadata_label(label: &str) -> bool {
    METADATA_LABELS.contains(label.to_lowercase().as_str())
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SelectedSet {
    pub label: String,
    pub set: ParsedSet,
}

/// Parse every entry of `catalog` that `policy` accepts, in catalog order.
pub fn select_sets(catalog: &Catalog, species: &str, policy: &SelectionPolicy) -> Vec<SelectedSet> {
    catalog
        .iter()
        .filter_map(|(label, value)| value.as_str().map(|raw| (label, raw)))
        .filter(|(label, _)| {
            let accepted = policy.accepts(label);
            if !accepted {
                debug!(species, label = label.as_str(), "entry not selected");
            }
            accepted
        })
        .map(|(label, raw)| SelectedSet {
            label: label.clone(),
            set: parse_set(species, raw),
        })
        .collect()
}

/// One side of a matchup request, written `species` or `species:label`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SetRequest {
    pub species: String,
    pub label: Option<String>,
}

impl SetRequest {
    /// The species is everything before the first `:`, lower-cased. The
    /// trimmed remainder, if any, names a single catalog label, which may
    /// itself contain `:` (`garchomp:strategy: Swords Dance`).
    pub fn from_arg(raw: &str) -> Self {
        match raw.split_once(':') {
            Some((species, label)) => Self {
                species: species.to_lowercase(),
                label: Some(label.trim().to_string()).filter(|label| !label.is_empty()),
            },
            None => Self {
                species: raw.to_lowercase(),
                label: None,
            },
        }
    }
}

/// Resolve one side of a request to its selected sets. Missing species,
/// missing labels and empty selections are hard failures naming the side.
pub fn resolve_sets(
    dex: &Dex,
    side: Side,
    request: &SetRequest,
    policy: &SelectionPolicy,
) -> Result<Vec<SelectedSet>, CatalogError> {
    let (key, catalog) = dex.catalog(side, &request.species)?;
    let selected = select_sets(catalog, key, policy);
    match &request.label {
        Some(label) => {
            let chosen: Vec<SelectedSet> = selected
                .into_iter()
                .filter(|entry| entry.label.trim().eq_ignore_ascii_case(label))
                .take(1)
                .collect();
            if chosen.is_empty() {
                return Err(CatalogError::SetNotFound {
                    side,
                    species: key.to_string(),
                    label: label.clone(),
                });
            }
            Ok(chosen)
        }
        None if selected.is_empty() => Err(CatalogError::NoSets {
            side,
            species: key.to_string(),
        }),
        None => Ok(selected),
    }
}
