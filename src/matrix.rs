use crate::duel::{simulate_duel, Duelist};
use crate::model::{BattlerSummary, MatchupReport, MoveOutcome, SetNames};
use pokemon_set_core::catalog::{resolve_sets, SelectedSet, SelectionPolicy, SetRequest, Side};
use pokemon_set_core::damage::{Battler, DamageEngine, Field, DEFAULT_LEVEL};
use pokemon_set_core::dex::{Dex, SpeciesData};
use pokemon_set_core::stats::Stat;
use rayon::prelude::*;
use tracing::{debug, info, warn};

/// One side of a request: the species and the sets selected for it.
#[derive(Debug, Clone)]
pub struct SideSets {
    pub side: Side,
    pub species: SpeciesData,
    pub sets: Vec<SelectedSet>,
}

impl SideSets {
    pub fn resolve(
        dex: &Dex,
        side: Side,
        request: &SetRequest,
        policy: &SelectionPolicy,
    ) -> anyhow::Result<Self> {
        let sets = resolve_sets(dex, side, request, policy)?;
        let (key, catalog) = dex.catalog(side, &request.species)?;
        let species = SpeciesData::from_catalog(key, catalog)?;
        debug!(%side, species = key, sets = sets.len(), "side resolved");
        Ok(Self {
            side,
            species,
            sets,
        })
    }

    fn battlers(&self, level: u32) -> Vec<Battler> {
        self.sets
            .iter()
            .map(|selected| Battler::from_set(&selected.set, &self.species, level))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchupSettings {
    pub level: u32,
    pub field: Field,
    /// Fan the pairs out over the rayon pool. Output order is unchanged.
    pub parallel: bool,
}

impl Default for MatchupSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL,
            field: Field::default(),
            parallel: false,
        }
    }
}

/// Every attacker set against every defender set, attacker-major, in
/// catalog order.
pub fn compute_matchups(
    attacker: &SideSets,
    defender: &SideSets,
    engine: &dyn DamageEngine,
    settings: &MatchupSettings,
) -> Vec<MatchupReport> {
    let battlers_a = attacker.battlers(settings.level);
    let battlers_b = defender.battlers(settings.level);
    let tasks: Vec<(usize, usize)> = (0..battlers_a.len())
        .flat_map(|a| (0..battlers_b.len()).map(move |b| (a, b)))
        .collect();
    info!(
        attacker = attacker.species.name.as_str(),
        defender = defender.species.name.as_str(),
        pairs = tasks.len(),
        "computing matchups"
    );

    let evaluate = |&(a_idx, b_idx): &(usize, usize)| {
        let pair = Pair {
            set_a: &attacker.sets[a_idx],
            set_b: &defender.sets[b_idx],
            battler_a: &battlers_a[a_idx],
            battler_b: &battlers_b[b_idx],
        };
        evaluate_pair(pair, engine, &settings.field)
    };
    if settings.parallel {
        tasks.par_iter().map(evaluate).collect()
    } else {
        tasks.iter().map(evaluate).collect()
    }
}

#[derive(Clone, Copy)]
struct Pair<'a> {
    set_a: &'a SelectedSet,
    set_b: &'a SelectedSet,
    battler_a: &'a Battler,
    battler_b: &'a Battler,
}

fn evaluate_pair(pair: Pair<'_>, engine: &dyn DamageEngine, field: &Field) -> MatchupReport {
    let moves = move_outcomes(engine, pair.battler_a, pair.battler_b, &pair.set_a.set.moves, field);
    let reverse_moves = move_outcomes(
        engine,
        pair.battler_b,
        pair.battler_a,
        &pair.set_b.set.moves,
        &field.swapped(),
    );
    let verdict = simulate_duel(
        duelist(pair.battler_a, &moves),
        duelist(pair.battler_b, &reverse_moves),
    );
    debug!(
        a = pair.set_a.label.as_str(),
        b = pair.set_b.label.as_str(),
        %verdict,
        "pair evaluated"
    );
    MatchupReport {
        set_names: SetNames {
            a: pair.set_a.label.clone(),
            b: pair.set_b.label.clone(),
        },
        attacker: BattlerSummary::new(&pair.set_a.set, pair.battler_a),
        defender: BattlerSummary::new(&pair.set_b.set, pair.battler_b),
        moves,
        reverse_moves,
        verdict,
    }
}

fn duelist<'a>(battler: &Battler, moves: &'a [MoveOutcome]) -> Duelist<'a> {
    Duelist {
        hp: battler.stats.hp,
        speed: battler.boosted_stat(Stat::Spe),
        moves,
    }
}

/// A move the engine rejects is recorded and the rest still run.
pub fn move_outcomes(
    engine: &dyn DamageEngine,
    attacker: &Battler,
    defender: &Battler,
    moves: &[String],
    field: &Field,
) -> Vec<MoveOutcome> {
    moves
        .iter()
        .map(|name| match engine.calculate(attacker, defender, name, field) {
            Ok(range) => MoveOutcome::hit(name, &range, defender.stats.hp),
            Err(err) => {
                warn!(
                    attacker = attacker.name.as_str(),
                    move_name = name.as_str(),
                    %err,
                    "damage calculation failed"
                );
                MoveOutcome::failed(name, err)
            }
        })
        .collect()
}
