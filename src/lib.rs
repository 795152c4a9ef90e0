pub mod duel;
pub mod matrix;
pub mod model;
pub mod report;

use crate::duel::MatchupSummary;
use crate::matrix::{compute_matchups, MatchupSettings, SideSets};
use crate::model::MatchupReport;
pub use crate::report::OutputFormat;
use anyhow::Context;
use pokemon_set_core::catalog::{SelectionPolicy, SetRequest, Side};
use pokemon_set_core::damage::{DamageEngine, Field, StandardCalc, DEFAULT_LEVEL};
use pokemon_set_core::dex::Dex;
use pokemon_set_core::moves::MoveDex;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone)]
pub struct MatchupOptions {
    pub dex_path: PathBuf,
    /// Move table to use instead of the embedded one.
    pub moves_path: Option<PathBuf>,
    pub attacker: String,
    pub defender: String,
    pub level: u32,
    pub policy: SelectionPolicy,
    pub field: Field,
    pub format: OutputFormat,
    pub output_path: Option<PathBuf>,
    pub parallel: bool,
}

impl Default for MatchupOptions {
    fn default() -> Self {
        Self {
            dex_path: PathBuf::from("data/pokedex.json"),
            moves_path: None,
            attacker: String::new(),
            defender: String::new(),
            level: DEFAULT_LEVEL,
            policy: SelectionPolicy::default(),
            field: Field::default(),
            format: OutputFormat::default(),
            output_path: None,
            parallel: false,
        }
    }
}

pub fn load_dex(path: &Path) -> anyhow::Result<Dex> {
    let dex = Dex::load(path)
        .with_context(|| format!("Failed to load dex from {}", path.display()))?;
    if dex.is_empty() {
        anyhow::bail!("Dex at {} has no species", path.display());
    }
    Ok(dex)
}

pub fn load_engine(moves_path: Option<&Path>) -> anyhow::Result<StandardCalc> {
    match moves_path {
        Some(path) => {
            let moves = MoveDex::load(path)
                .with_context(|| format!("Failed to load moves from {}", path.display()))?;
            info!(path = %path.display(), moves = moves.len(), "using move table");
            Ok(StandardCalc::new(moves))
        }
        None => Ok(StandardCalc::builtin()),
    }
}

/// Resolve both sides of a request and evaluate every pair.
pub fn matchups(
    dex: &Dex,
    engine: &dyn DamageEngine,
    attacker: &str,
    defender: &str,
    policy: &SelectionPolicy,
    settings: &MatchupSettings,
) -> anyhow::Result<Vec<MatchupReport>> {
    let attacker = SideSets::resolve(dex, Side::Attacker, &SetRequest::from_arg(attacker), policy)?;
    let defender = SideSets::resolve(dex, Side::Defender, &SetRequest::from_arg(defender), policy)?;
    Ok(compute_matchups(&attacker, &defender, engine, settings))
}

pub fn run(opts: MatchupOptions) -> anyhow::Result<()> {
    if !(1..=100).contains(&opts.level) {
        anyhow::bail!("--level must be between 1 and 100");
    }
    let dex = load_dex(&opts.dex_path)?;
    let engine = load_engine(opts.moves_path.as_deref())?;
    let settings = MatchupSettings {
        level: opts.level,
        field: opts.field,
        parallel: opts.parallel,
    };
    let reports = matchups(
        &dex,
        &engine,
        &opts.attacker,
        &opts.defender,
        &opts.policy,
        &settings,
    )?;
    let summary = MatchupSummary::from_verdicts(reports.iter().map(|report| report.verdict));
    report::write_report(&reports, &summary, opts.format, opts.output_path.as_deref())?;
    info!(
        pairs = reports.len(),
        wins = summary.wins,
        draws = summary.draws,
        losses = summary.losses,
        "matchups complete"
    );
    if let Some(path) = &opts.output_path {
        info!("Wrote report to {}", path.display());
    }
    Ok(())
}
