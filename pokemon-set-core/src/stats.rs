use phf::phf_map;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Stat {
    Hp,
    Atk,
    Def,
    Spa,
    Spd,
    Spe,
}

/// Short and long stat spellings, keyed lower-case.
static STAT_ALIASES: phf::Map<&'static str, Stat> = phf_map! {
    "hp" => Stat::Hp,
    "atk" => Stat::Atk,
    "def" => Stat::Def,
    "spa" => Stat::Spa,
    "spd" => Stat::Spd,
    "spe" => Stat::Spe,
    "at" => Stat::Atk,
    "df" => Stat::Def,
    "sa" => Stat::Spa,
    "sd" => Stat::Spd,
    "sp" => Stat::Spe,
};

impl Stat {
    pub const ALL: [Stat; 6] = [
        Stat::Hp,
        Stat::Atk,
        Stat::Def,
        Stat::Spa,
        Stat::Spd,
        Stat::Spe,
    ];

    /// Resolve a stat abbreviation in any letter case (`SpD`, `sd`, `SPE`...).
    pub fn from_alias(alias: &str) -> Option<Stat> {
        STAT_ALIASES.get(alias.to_lowercase().as_str()).copied()
    }

    pub fn key(self) -> &'static str {
        match self {
            Stat::Hp => "hp",
            Stat::Atk => "atk",
            Stat::Def => "def",
            Stat::Spa => "spa",
            Stat::Spd => "spd",
            Stat::Spe => "spe",
        }
    }
}

/// Per-stat values as written in a set. `None` marks a value that was present
/// but not a number.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct StatTable {
    pub hp: Option<i32>,
    pub atk: Option<i32>,
    pub def: Option<i32>,
    pub spa: Option<i32>,
    pub spd: Option<i32>,
    pub spe: Option<i32>,
}

pub const DEFAULT_EV: i32 = 0;
pub const DEFAULT_IV: i32 = 31;

impl StatTable {
    pub const fn filled(value: i32) -> Self {
        Self {
            hp: Some(value),
            atk: Some(value),
            def: Some(value),
            spa: Some(value),
            spd: Some(value),
            spe: Some(value),
        }
    }

    pub const fn default_evs() -> Self {
        Self::filled(DEFAULT_EV)
    }

    pub const fn default_ivs() -> Self {
        Self::filled(DEFAULT_IV)
    }

    pub fn get(&self, stat: Stat) -> Option<i32> {
        match stat {
            Stat::Hp => self.hp,
            Stat::Atk => self.atk,
            Stat::Def => self.def,
            Stat::Spa => self.spa,
            Stat::Spd => self.spd,
            Stat::Spe => self.spe,
        }
    }

    /// Copy of `self` with one slot replaced.
    #[must_use]
    pub fn with(mut self, stat: Stat, value: Option<i32>) -> Self {
        let slot = match stat {
            Stat::Hp => &mut self.hp,
            Stat::Atk => &mut self.atk,
            Stat::Def => &mut self.def,
            Stat::Spa => &mut self.spa,
            Stat::Spd => &mut self.spd,
            Stat::Spe => &mut self.spe,
        };
        *slot = value;
        self
    }

    /// Slots that hold the not-a-number marker.
    pub fn invalid_stats(&self) -> Vec<Stat> {
        Stat::ALL
            .into_iter()
            .filter(|stat| self.get(*stat).is_none())
            .collect()
    }

    /// Values clamped to `0..=max`, with invalid slots replaced by `fallback`.
    pub fn resolve(&self, fallback: i32, max: i32) -> [u32; 6] {
        Stat::ALL.map(|stat| self.get(stat).unwrap_or(fallback).clamp(0, max) as u32)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Nature {
    Hardy,
    Lonely,
    Brave,
    Adamant,
    Naughty,
    Bold,
    Docile,
    Relaxed,
    Impish,
    Lax,
    Timid,
    Hasty,
    Serious,
    Jolly,
    Naive,
    Modest,
    Mild,
    Quiet,
    Bashful,
    Rash,
    Calm,
    Gentle,
    Sassy,
    Careful,
    Quirky,
}

impl Nature {
    pub fn from_name(name: &str) -> Option<Nature> {
        let nature = match name.trim().to_lowercase().as_str() {
            "hardy" => Nature::Hardy,
            "lonely" => Nature::Lonely,
            "brave" => Nature::Brave,
            "adamant" => Nature::Adamant,
            "naughty" => Nature::Naughty,
            "bold" => Nature::Bold,
            "docile" => Nature::Docile,
            "relaxed" => Nature::Relaxed,
            "impish" => Nature::Impish,
            "lax" => Nature::Lax,
            "timid" => Nature::Timid,
            "hasty" => Nature::Hasty,
            "serious" => Nature::Serious,
            "jolly" => Nature::Jolly,
            "naive" => Nature::Naive,
            "modest" => Nature::Modest,
            "mild" => Nature::Mild,
            "quiet" => Nature::Quiet,
            "bashful" => Nature::Bashful,
            "rash" => Nature::Rash,
            "calm" => Nature::Calm,
            "gentle" => Nature::Gentle,
            "sassy" => Nature::Sassy,
            "careful" => Nature::Careful,
            "quirky" => Nature::Quirky,
            _ => return None,
        };
        Some(nature)
    }

    /// Stat multiplier in percent: 110, 100 or 90.
    pub fn modifier(self, stat: Stat) -> u32 {
        match self {
            Nature::Hardy | Nature::Docile | Nature::Serious | Nature::Bashful | Nature::Quirky => {
                100
            }
            Nature::Lonely => bonus(stat, Stat::Atk, Stat::Def),
            Nature::Brave => bonus(stat, Stat::Atk, Stat::Spe),
            Nature::Adamant => bonus(stat, Stat::Atk, Stat::Spa),
            Nature::Naughty => bonus(stat, Stat::Atk, Stat::Spd),
            Nature::Bold => bonus(stat, Stat::Def, Stat::Atk),
            Nature::Relaxed => bonus(stat, Stat::Def, Stat::Spe),
            Nature::Impish => bonus(stat, Stat::Def, Stat::Spa),
            Nature::Lax => bonus(stat, Stat::Def, Stat::Spd),
            Nature::Timid => bonus(stat, Stat::Spe, Stat::Atk),
            Nature::Hasty => bonus(stat, Stat::Spe, Stat::Def),
            Nature::Jolly => bonus(stat, Stat::Spe, Stat::Spa),
            Nature::Naive => bonus(stat, Stat::Spe, Stat::Spd),
            Nature::Modest => bonus(stat, Stat::Spa, Stat::Atk),
            Nature::Mild => bonus(stat, Stat::Spa, Stat::Def),
            Nature::Quiet => bonus(stat, Stat::Spa, Stat::Spe),
            Nature::Rash => bonus(stat, Stat::Spa, Stat::Spd),
            Nature::Calm => bonus(stat, Stat::Spd, Stat::Atk),
            Nature::Gentle => bonus(stat, Stat::Spd, Stat::Def),
            Nature::Sassy => bonus(stat, Stat::Spd, Stat::Spe),
            Nature::Careful => bonus(stat, Stat::Spd, Stat::Spa),
        }
    }
}

fn bonus(stat: Stat, boosted: Stat, lowered: Stat) -> u32 {
    if stat == boosted {
        110
    } else if stat == lowered {
        90
    } else {
        100
    }
}

pub fn calc_hp(base: u32, iv: u32, ev: u32, level: u32) -> u32 {
    if base == 1 {
        // Shedinja
        return 1;
    }
    let base_value = base.saturating_mul(2).saturating_add(iv + ev / 4);
    base_value.saturating_mul(level) / 100 + level + 10
}

pub fn calc_stat(base: u32, iv: u32, ev: u32, level: u32, nature_percent: u32) -> u32 {
    let base_value = base.saturating_mul(2).saturating_add(iv + ev / 4);
    let raw = base_value.saturating_mul(level) / 100 + 5;
    raw.saturating_mul(nature_percent) / 100
}

/// Apply a stat stage (-6..=+6) the way the games do: 2/2 .. 8/2 and 2/3 .. 2/8.
pub fn apply_boost(stat: u32, stage: i32) -> u32 {
    let stage = stage.clamp(-6, 6);
    if stage >= 0 {
        stat * (2 + stage as u32) / 2
    } else {
        stat * 2 / (2 + stage.unsigned_abs())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct BaseStats {
    pub hp: u32,
    pub atk: u32,
    pub def: u32,
    pub spa: u32,
    pub spd: u32,
    pub spe: u32,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct StatsSet {
    pub hp: u32,
    pub atk: u32,
    pub def: u32,
    pub spa: u32,
    pub spd: u32,
    pub spe: u32,
}

impl StatsSet {
    /// `evs`/`ivs` are indexed in [`Stat::ALL`] order.
    pub fn compute(
        base: &BaseStats,
        level: u32,
        evs: [u32; 6],
        ivs: [u32; 6],
        nature: Nature,
    ) -> Self {
        Self {
            hp: calc_hp(base.hp, ivs[0], evs[0], level),
            atk: calc_stat(base.atk, ivs[1], evs[1], level, nature.modifier(Stat::Atk)),
            def: calc_stat(base.def, ivs[2], evs[2], level, nature.modifier(Stat::Def)),
            spa: calc_stat(base.spa, ivs[3], evs[3], level, nature.modifier(Stat::Spa)),
            spd: calc_stat(base.spd, ivs[4], evs[4], level, nature.modifier(Stat::Spd)),
            spe: calc_stat(base.spe, ivs[5], evs[5], level, nature.modifier(Stat::Spe)),
        }
    }

    pub fn get(&self, stat: Stat) -> u32 {
        match stat {
            Stat::Hp => self.hp,
            Stat::Atk => self.atk,
            Stat::Def => self.def,
            Stat::Spa => self.spa,
            Stat::Spd => self.spd,
            Stat::Spe => self.spe,
        }
    }
}
