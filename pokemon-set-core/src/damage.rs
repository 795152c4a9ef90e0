//! Damage ranges between two battlers.
//!
//! The matchup layer only talks to [`DamageEngine`]. [`StandardCalc`] is the
//! engine shipped with the crate: singles, no crits, full-HP defender, and the
//! common item/ability modifiers.

use crate::dex::{to_id, SpeciesData};
use crate::error::DamageError;
use crate::moves::{MoveCategory, MoveData, MoveDex};
use crate::parser::ParsedSet;
use crate::stats::{apply_boost, Nature, Stat, StatsSet, DEFAULT_EV, DEFAULT_IV};
use crate::types::{effectiveness, Type};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

pub const MAX_EV: i32 = 252;
pub const MAX_IV: i32 = 31;
pub const DEFAULT_LEVEL: u32 = 100;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Burn,
    Paralysis,
    Poison,
    Toxic,
    Sleep,
    Freeze,
}

impl Status {
    /// Accepts Showdown ids (`brn`, `tox`...) and plain names.
    pub fn from_name(name: &str) -> Option<Status> {
        let status = match name.trim().to_ascii_lowercase().as_str() {
            "brn" | "burn" | "burned" => Status::Burn,
            "par" | "paralysis" | "paralyzed" => Status::Paralysis,
            "psn" | "poison" | "poisoned" => Status::Poison,
            "tox" | "toxic" | "badly poisoned" => Status::Toxic,
            "slp" | "sleep" | "asleep" => Status::Sleep,
            "frz" | "freeze" | "frozen" => Status::Freeze,
            _ => return None,
        };
        Some(status)
    }
}

/// Stat stages. HP has no stage.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Boosts {
    pub atk: i32,
    pub def: i32,
    pub spa: i32,
    pub spd: i32,
    pub spe: i32,
}

impl Boosts {
    /// Only the long stat keys are understood; the parser stores boost names
    /// as written, so `at+2` is ignored here.
    pub fn from_map(map: &BTreeMap<String, i32>) -> Self {
        let mut boosts = Boosts::default();
        for (key, stages) in map {
            let stages = (*stages).clamp(-6, 6);
            match key.as_str() {
                "atk" => boosts.atk = stages,
                "def" => boosts.def = stages,
                "spa" => boosts.spa = stages,
                "spd" => boosts.spd = stages,
                "spe" => boosts.spe = stages,
                other => debug!(key = other, "ignoring boost for unknown stat"),
            }
        }
        boosts
    }

    pub fn get(&self, stat: Stat) -> i32 {
        match stat {
            Stat::Hp => 0,
            Stat::Atk => self.atk,
            Stat::Def => self.def,
            Stat::Spa => self.spa,
            Stat::Spd => self.spd,
            Stat::Spe => self.spe,
        }
    }
}

/// A set realised against its species: final stats plus battle state.
#[derive(Clone, Debug, PartialEq)]
pub struct Battler {
    pub name: String,
    pub level: u32,
    pub types: Vec<Type>,
    pub tera_type: Option<Type>,
    pub nature: Nature,
    pub stats: StatsSet,
    pub item: String,
    pub ability: String,
    pub status: Option<Status>,
    pub boosts: Boosts,
}

impl Battler {
    /// EV/IV slots holding the not-a-number marker fall back to 0 / 31.
    /// Unknown natures are neutral; unknown tera types and statuses are dropped.
    pub fn from_set(set: &ParsedSet, species: &SpeciesData, level: u32) -> Self {
        let level = level.clamp(1, 100);
        let nature = match set.nature.as_deref() {
            Some(name) => Nature::from_name(name).unwrap_or_else(|| {
                debug!(species = set.name.as_str(), nature = name, "unknown nature, using neutral");
                Nature::Hardy
            }),
            None => Nature::Hardy,
        };
        for stat in set.evs.invalid_stats() {
            warn!(species = set.name.as_str(), stat = stat.key(), "EV is not a number, using 0");
        }
        for stat in set.ivs.invalid_stats() {
            warn!(species = set.name.as_str(), stat = stat.key(), "IV is not a number, using 31");
        }
        let evs = set.evs.resolve(DEFAULT_EV, MAX_EV);
        let ivs = set.ivs.resolve(DEFAULT_IV, MAX_IV);
        let stats = StatsSet::compute(&species.base_stats, level, evs, ivs, nature);

        let tera_type = set.tera_type.as_deref().and_then(|name| {
            let ty = Type::from_name(name);
            if ty.is_none() {
                warn!(species = set.name.as_str(), tera = name, "unknown tera type");
            }
            ty
        });
        let status = set.status.as_deref().and_then(|name| {
            let status = Status::from_name(name);
            if status.is_none() {
                warn!(species = set.name.as_str(), status = name, "unknown status");
            }
            status
        });

        Self {
            name: species.name.clone(),
            level,
            types: species.types.clone(),
            tera_type,
            nature,
            stats,
            item: set.item.clone(),
            ability: set.ability.clone(),
            status,
            boosts: Boosts::from_map(&set.boosts),
        }
    }

    /// Types used when being hit. A Stellar tera keeps the original types.
    pub fn effective_types(&self) -> Vec<Type> {
        match self.tera_type {
            Some(tera) if tera != Type::Stellar => vec![tera],
            _ => self.types.clone(),
        }
    }

    pub fn has_ability(&self, name: &str) -> bool {
        to_id(&self.ability) == to_id(name)
    }

    pub fn holds(&self, item: &str) -> bool {
        to_id(&self.item) == to_id(item)
    }

    pub fn boosted_stat(&self, stat: Stat) -> u32 {
        apply_boost(self.stats.get(stat), self.boosts.get(stat))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    Sun,
    Rain,
    Sand,
    Snow,
}

impl Weather {
    pub fn from_name(name: &str) -> Option<Weather> {
        let weather = match name.trim().to_ascii_lowercase().as_str() {
            "sun" | "sunnyday" | "harsh sunshine" => Weather::Sun,
            "rain" | "raindance" => Weather::Rain,
            "sand" | "sandstorm" => Weather::Sand,
            "snow" | "hail" => Weather::Snow,
            _ => return None,
        };
        Some(weather)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SideConditions {
    pub reflect: bool,
    pub light_screen: bool,
    pub aurora_veil: bool,
}

/// Singles battlefield.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Field {
    pub weather: Option<Weather>,
    pub attacker_side: SideConditions,
    pub defender_side: SideConditions,
}

impl Field {
    /// The same field seen from the other side.
    #[must_use]
    pub fn swapped(&self) -> Field {
        Field {
            weather: self.weather,
            attacker_side: self.defender_side,
            defender_side: self.attacker_side,
        }
    }
}

/// The sixteen damage rolls (random factor 85%..=100%).
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct DamageRange {
    pub rolls: Vec<u32>,
}

impl DamageRange {
    pub fn zero() -> Self {
        Self { rolls: vec![0; 16] }
    }

    pub fn min(&self) -> u32 {
        self.rolls.iter().copied().min().unwrap_or(0)
    }

    pub fn max(&self) -> u32 {
        self.rolls.iter().copied().max().unwrap_or(0)
    }

    /// `(min, max)` as a percentage of `hp`, one decimal place.
    pub fn percent_of(&self, hp: u32) -> (f64, f64) {
        if hp == 0 {
            return (0.0, 0.0);
        }
        let percent = |damage: u32| (damage as f64 * 1000.0 / hp as f64).round() / 10.0;
        (percent(self.min()), percent(self.max()))
    }
}

pub trait DamageEngine: Send + Sync {
    /// Damage of `move_name` from `attacker` into `defender`. An unknown move
    /// is an error for that move only.
    fn calculate(
        &self,
        attacker: &Battler,
        defender: &Battler,
        move_name: &str,
        field: &Field,
    ) -> Result<DamageRange, DamageError>;
}

#[derive(Clone, Debug, Default)]
pub struct StandardCalc {
    moves: MoveDex,
}

impl StandardCalc {
    pub fn new(moves: MoveDex) -> Self {
        Self { moves }
    }

    /// Engine over the embedded move table.
    pub fn builtin() -> Self {
        Self::new(MoveDex::builtin().clone())
    }

    pub fn moves(&self) -> &MoveDex {
        &self.moves
    }
}

impl DamageEngine for StandardCalc {
    fn calculate(
        &self,
        attacker: &Battler,
        defender: &Battler,
        move_name: &str,
        field: &Field,
    ) -> Result<DamageRange, DamageError> {
        let move_data = self
            .moves
            .get(move_name)
            .ok_or_else(|| DamageError::UnknownMove(move_name.to_string()))?;
        Ok(damage_range(attacker, defender, move_data, field))
    }
}

#[derive(Clone, Copy, Debug)]
pub struct DamageModifiers {
    pub weather: f32,
    pub stab: f32,
    pub burn: f32,
    pub final_modifier: f32,
}

impl Default for DamageModifiers {
    fn default() -> Self {
        Self {
            weather: 1.0,
            stab: 1.0,
            burn: 1.0,
            final_modifier: 1.0,
        }
    }
}

pub fn damage_range(
    attacker: &Battler,
    defender: &Battler,
    move_data: &MoveData,
    field: &Field,
) -> DamageRange {
    if move_data.category == MoveCategory::Status || move_data.base_power == 0 {
        return DamageRange::zero();
    }
    let move_type = move_data.move_type;
    let mut type_effectiveness = effectiveness(move_type, &defender.effective_types());
    if move_type == Type::Ground && defender.has_ability("Levitate") {
        type_effectiveness = 0.0;
    }
    if type_effectiveness == 0.0 {
        return DamageRange::zero();
    }

    let physical = move_data.category == MoveCategory::Physical;
    let (attack_stat, defense_stat) = if physical {
        (Stat::Atk, Stat::Def)
    } else {
        (Stat::Spa, Stat::Spd)
    };
    let attack = apply_modifier(
        attacker.boosted_stat(attack_stat),
        attack_modifier(attacker, defender, move_data),
    );
    let defense = apply_modifier(
        defender.boosted_stat(defense_stat),
        defense_modifier(defender, move_data, field),
    )
    .max(1);
    let power = apply_modifier(move_data.base_power, power_modifier(attacker, move_data)).max(1);

    let burned = attacker.status == Some(Status::Burn) && !attacker.has_ability("Guts");
    let modifiers = DamageModifiers {
        weather: weather_modifier(field.weather, move_type),
        stab: stab_modifier(attacker, move_type),
        burn: if physical && burned { 0.5 } else { 1.0 },
        final_modifier: final_modifier(attacker, defender, move_data, field, type_effectiveness),
    };
    let rolls = (85..=100)
        .map(|percent| {
            calculate_damage_with_modifiers(
                attacker.level,
                attack,
                defense,
                power,
                type_effectiveness,
                percent,
                modifiers,
            )
        })
        .collect();
    DamageRange { rolls }
}

pub(crate) fn chain_modifier(previous: f32, next: f32) -> f32 {
    let previous = (previous * 4096.0).floor() as u64;
    let next = (next * 4096.0).floor() as u64;
    let chained = (previous * next + 2048) >> 12;
    chained as f32 / 4096.0
}

/// Multiply by a 4096-based modifier, rounding halves down.
fn apply_modifier(value: u32, modifier: f32) -> u32 {
    if modifier <= 0.0 {
        return 0;
    }
    let modifier = (modifier * 4096.0).floor() as u64;
    let value = value as u64;
    ((value * modifier + 2048 - 1) / 4096) as u32
}

fn type_effectiveness_steps(type_effectiveness: f32) -> i8 {
    (type_effectiveness.ln() / 2.0_f32.ln()).round() as i8
}

fn apply_type_effectiveness(value: u32, type_effectiveness: f32) -> u32 {
    if type_effectiveness == 0.0 {
        return 0;
    }
    let steps = type_effectiveness_steps(type_effectiveness);
    if steps > 0 {
        value.saturating_mul(1u32 << steps as u32)
    } else if steps < 0 {
        value / (1u32 << (-steps) as u32)
    } else {
        value
    }
}

fn compute_base_damage(level: u32, attack: u32, defense: u32, power: u32) -> u32 {
    let mut base_damage = 2 * level / 5 + 2;
    base_damage = base_damage.saturating_mul(power);
    base_damage = base_damage.saturating_mul(attack);
    base_damage /= defense.max(1);
    base_damage / 50
}

/// One roll. `random_percent` is 85..=100.
pub fn calculate_damage_with_modifiers(
    level: u32,
    attack: u32,
    defense: u32,
    power: u32,
    type_effectiveness: f32,
    random_percent: u32,
    modifiers: DamageModifiers,
) -> u32 {
    if type_effectiveness == 0.0 {
        return 0;
    }
    let mut damage = compute_base_damage(level, attack, defense, power).saturating_add(2);
    damage = apply_modifier(damage, modifiers.weather);
    damage = damage.saturating_mul(random_percent.clamp(85, 100)) / 100;
    damage = apply_modifier(damage, modifiers.stab);
    damage = apply_type_effectiveness(damage, type_effectiveness);
    damage = apply_modifier(damage, modifiers.burn);
    damage = apply_modifier(damage, modifiers.final_modifier);
    damage.max(1)
}

fn stab_modifier(attacker: &Battler, move_type: Type) -> f32 {
    let original = attacker.types.contains(&move_type);
    let tera_match = attacker.tera_type == Some(move_type);
    if !original && !tera_match {
        1.0
    } else if (original && tera_match) || attacker.has_ability("Adaptability") {
        2.0
    } else {
        1.5
    }
}

fn weather_modifier(weather: Option<Weather>, move_type: Type) -> f32 {
    match (weather, move_type) {
        (Some(Weather::Sun), Type::Fire) | (Some(Weather::Rain), Type::Water) => 1.5,
        (Some(Weather::Sun), Type::Water) | (Some(Weather::Rain), Type::Fire) => 0.5,
        _ => 1.0,
    }
}

fn attack_modifier(attacker: &Battler, defender: &Battler, move_data: &MoveData) -> f32 {
    let physical = move_data.category == MoveCategory::Physical;
    let mut modifier = 1.0;
    if physical && (attacker.has_ability("Huge Power") || attacker.has_ability("Pure Power")) {
        modifier = chain_modifier(modifier, 2.0);
    }
    if physical && attacker.status.is_some() && attacker.has_ability("Guts") {
        modifier = chain_modifier(modifier, 1.5);
    }
    let choice_item = if physical { "Choice Band" } else { "Choice Specs" };
    if attacker.holds(choice_item) {
        modifier = chain_modifier(modifier, 1.5);
    }
    if matches!(move_data.move_type, Type::Fire | Type::Ice) && defender.has_ability("Thick Fat") {
        modifier = chain_modifier(modifier, 0.5);
    }
    modifier
}

fn defense_modifier(defender: &Battler, move_data: &MoveData, field: &Field) -> f32 {
    let physical = move_data.category == MoveCategory::Physical;
    let types = defender.effective_types();
    let mut modifier = 1.0;
    if !physical && defender.holds("Assault Vest") {
        modifier = chain_modifier(modifier, 1.5);
    }
    match field.weather {
        Some(Weather::Sand) if !physical && types.contains(&Type::Rock) => {
            modifier = chain_modifier(modifier, 1.5);
        }
        Some(Weather::Snow) if physical && types.contains(&Type::Ice) => {
            modifier = chain_modifier(modifier, 1.5);
        }
        _ => {}
    }
    modifier
}

fn power_modifier(attacker: &Battler, move_data: &MoveData) -> f32 {
    let mut modifier = 1.0;
    if attacker.has_ability("Technician") && move_data.base_power <= 60 {
        modifier = chain_modifier(modifier, 1.5);
    }
    if type_boost_item(&attacker.item) == Some(move_data.move_type) {
        modifier = chain_modifier(modifier, 4915.0 / 4096.0);
    }
    modifier
}

fn final_modifier(
    attacker: &Battler,
    defender: &Battler,
    move_data: &MoveData,
    field: &Field,
    type_effectiveness: f32,
) -> f32 {
    let physical = move_data.category == MoveCategory::Physical;
    let screens = field.defender_side;
    let super_effective = type_effectiveness > 1.0;
    let mut modifier = 1.0;
    if screens.aurora_veil || (physical && screens.reflect) || (!physical && screens.light_screen) {
        modifier = chain_modifier(modifier, 0.5);
    }
    // The defender is always at full HP here.
    if defender.has_ability("Multiscale") || defender.has_ability("Shadow Shield") {
        modifier = chain_modifier(modifier, 0.5);
    }
    if super_effective
        && (defender.has_ability("Filter")
            || defender.has_ability("Solid Rock")
            || defender.has_ability("Prism Armor"))
    {
        modifier = chain_modifier(modifier, 0.75);
    }
    if super_effective && attacker.holds("Expert Belt") {
        modifier = chain_modifier(modifier, 4915.0 / 4096.0);
    }
    if attacker.holds("Life Orb") {
        modifier = chain_modifier(modifier, 5324.0 / 4096.0);
    }
    modifier
}

fn type_boost_item(item: &str) -> Option<Type> {
    let boosted = match to_id(item).as_str() {
        "silkscarf" => Type::Normal,
        "charcoal" => Type::Fire,
        "mysticwater" => Type::Water,
        "magnet" => Type::Electric,
        "miracleseed" => Type::Grass,
        "nevermeltice" => Type::Ice,
        "blackbelt" => Type::Fighting,
        "poisonbarb" => Type::Poison,
        "softsand" => Type::Ground,
        "sharpbeak" => Type::Flying,
        "twistedspoon" => Type::Psychic,
        "silverpowder" => Type::Bug,
        "hardstone" => Type::Rock,
        "spelltag" => Type::Ghost,
        "dragonfang" => Type::Dragon,
        "blackglasses" => Type::Dark,
        "metalcoat" => Type::Steel,
        "fairyfeather" => Type::Fairy,
        _ => return None,
    };
    Some(boosted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_set;
    use crate::stats::BaseStats;

    fn garchomp() -> SpeciesData {
        SpeciesData {
            name: "Garchomp".to_string(),
            types: vec![Type::Dragon, Type::Ground],
            base_stats: BaseStats {
                hp: 108,
                atk: 130,
                def: 95,
                spa: 80,
                spd: 85,
                spe: 102,
            },
        }
    }

    fn heatran() -> SpeciesData {
        SpeciesData {
            name: "Heatran".to_string(),
            types: vec![Type::Fire, Type::Steel],
            base_stats: BaseStats {
                hp: 91,
                atk: 90,
                def: 106,
                spa: 130,
                spd: 106,
                spe: 77,
            },
        }
    }

    fn battler(species: &SpeciesData, text: &str) -> Battler {
        Battler::from_set(&parse_set(&species.name, text), species, 50)
    }

    fn earthquake(attacker: &str, defender: &str, field: &Field) -> DamageRange {
        StandardCalc::builtin()
            .calculate(
                &battler(&garchomp(), attacker),
                &battler(&heatran(), defender),
                "Earthquake",
                field,
            )
            .expect("Earthquake is in the built-in table")
    }

    fn plain_roll(stab: f32, type_effectiveness: f32, random_percent: u32) -> u32 {
        calculate_damage_with_modifiers(
            100,
            200,
            150,
            80,
            type_effectiveness,
            random_percent,
            DamageModifiers {
                stab,
                ..DamageModifiers::default()
            },
        )
    }

    #[test]
    fn plain_roll_without_modifiers() {
        assert_eq!(plain_roll(1.0, 1.0, 100), 91);
        assert_eq!(plain_roll(1.0, 1.0, 85), 77);
    }

    #[test]
    fn stab_rounds_half_down() {
        // 91 * 1.5 = 136.5
        assert_eq!(plain_roll(1.5, 1.0, 100), 136);
    }

    #[test]
    fn effectiveness_doubles_and_halves_in_steps() {
        assert_eq!(plain_roll(1.0, 2.0, 100), 182);
        assert_eq!(plain_roll(1.0, 0.5, 100), 45);
        assert_eq!(plain_roll(1.0, 0.0, 100), 0);
    }

    #[test]
    fn garchomp_earthquake_into_heatran() {
        let range = earthquake("", "", &Field::default());
        assert_eq!(range.rolls.len(), 16);
        assert_eq!(range.min(), 268);
        assert_eq!(range.max(), 324);
    }

    #[test]
    fn burn_halves_physical_damage() {
        let range = earthquake("Status: brn", "", &Field::default());
        assert_eq!(range.max(), 162);
        let guts = earthquake("Status: brn\nAbility: Guts", "", &Field::default());
        assert!(guts.max() > 324);
    }

    #[test]
    fn attack_boosts_apply() {
        let range = earthquake("Boosts: atk+2", "", &Field::default());
        assert_eq!(range.max(), 636);
        // Short stat names are not understood in boost lines.
        let short = earthquake("Boosts: at+2", "", &Field::default());
        assert_eq!(short.max(), 324);
    }

    #[test]
    fn matching_tera_doubles_stab() {
        let range = earthquake("Tera Type: Ground", "", &Field::default());
        assert_eq!(range.max(), 432);
    }

    #[test]
    fn reflect_halves_physical_damage() {
        let field = Field {
            defender_side: SideConditions {
                reflect: true,
                ..SideConditions::default()
            },
            ..Field::default()
        };
        assert_eq!(earthquake("", "", &field).max(), 162);
    }

    #[test]
    fn levitate_blocks_ground_moves() {
        let range = earthquake("", "Ability: Levitate", &Field::default());
        assert_eq!(range, DamageRange::zero());
    }

    #[test]
    fn invalid_ev_falls_back_to_default() {
        let range = earthquake("EVs: lots Atk", "", &Field::default());
        assert_eq!(range.max(), 324);
    }

    #[test]
    fn status_moves_deal_nothing() {
        let range = StandardCalc::builtin()
            .calculate(
                &battler(&garchomp(), ""),
                &battler(&heatran(), ""),
                "Swords Dance",
                &Field::default(),
            )
            .expect("Swords Dance is in the built-in table");
        assert_eq!(range.max(), 0);
    }

    #[test]
    fn unknown_move_is_an_error() {
        let err = StandardCalc::builtin()
            .calculate(
                &battler(&garchomp(), ""),
                &battler(&heatran(), ""),
                "Splash Dance",
                &Field::default(),
            )
            .unwrap_err();
        assert_eq!(err, DamageError::UnknownMove("Splash Dance".to_string()));
        assert_eq!(err.to_string(), "invalid move");
    }

    #[test]
    fn percent_of_hp() {
        let range = DamageRange {
            rolls: vec![50, 75, 100],
        };
        assert_eq!(range.percent_of(200), (25.0, 50.0));
        assert_eq!(range.percent_of(0), (0.0, 0.0));
    }

    #[test]
    fn status_names() {
        assert_eq!(Status::from_name("BRN"), Some(Status::Burn));
        assert_eq!(Status::from_name("badly poisoned"), Some(Status::Toxic));
        assert_eq!(Status::from_name("confused"), None);
    }
}
