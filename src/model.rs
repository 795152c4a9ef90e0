use crate::duel::Verdict;
use pokemon_set_core::damage::{Battler, DamageRange};
use pokemon_set_core::stats::{StatTable, StatsSet};
use pokemon_set_core::ParsedSet;
use serde::Serialize;

/// Catalog labels of the two sets in a pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetNames {
    pub a: String,
    pub b: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BattlerSummary {
    pub name: String,
    pub item: String,
    pub ability: String,
    pub nature: Option<String>,
    pub tera_type: Option<String>,
    pub evs: StatTable,
    pub ivs: StatTable,
    pub stats: StatsSet,
}

impl BattlerSummary {
    /// EVs and IVs are reported as written, stats as computed.
    pub fn new(set: &ParsedSet, battler: &Battler) -> Self {
        Self {
            name: battler.name.clone(),
            item: set.item.clone(),
            ability: set.ability.clone(),
            nature: set.nature.clone(),
            tera_type: set.tera_type.clone(),
            evs: set.evs,
            ivs: set.ivs,
            stats: battler.stats,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MoveOutcome {
    #[serde(rename_all = "camelCase")]
    Hit {
        name: String,
        min: u32,
        max: u32,
        min_percent: f64,
        max_percent: f64,
    },
    Failed {
        name: String,
        error: String,
    },
}

impl MoveOutcome {
    pub fn hit(name: &str, range: &DamageRange, defender_hp: u32) -> Self {
        let (min_percent, max_percent) = range.percent_of(defender_hp);
        MoveOutcome::Hit {
            name: name.to_string(),
            min: range.min(),
            max: range.max(),
            min_percent,
            max_percent,
        }
    }

    pub fn failed(name: &str, error: impl ToString) -> Self {
        MoveOutcome::Failed {
            name: name.to_string(),
            error: error.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            MoveOutcome::Hit { name, .. } | MoveOutcome::Failed { name, .. } => name,
        }
    }

    /// Failed moves count as 0.
    pub fn max_damage(&self) -> u32 {
        match self {
            MoveOutcome::Hit { max, .. } => *max,
            MoveOutcome::Failed { .. } => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchupReport {
    pub set_names: SetNames,
    pub attacker: BattlerSummary,
    pub defender: BattlerSummary,
    /// Attacker's moves into the defender, in set order.
    pub moves: Vec<MoveOutcome>,
    /// Defender's moves back into the attacker.
    pub reverse_moves: Vec<MoveOutcome>,
    pub verdict: Verdict,
}
