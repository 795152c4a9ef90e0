use clap::Parser;
use pokemon_set_core::catalog::{SelectionPolicy, STRATEGY_PREFIX};
use pokemon_set_core::damage::{Field, SideConditions, Weather, DEFAULT_LEVEL};
use pokemon_set_matchups::{run, MatchupOptions, OutputFormat};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Damage ranges and duel verdicts between the sets of two species.
#[derive(Debug, Parser)]
#[command(name = "pokemon-set-matchups", version)]
struct Cli {
    /// Attacking species, optionally `species:label` to pick one set
    attacker: String,

    /// Defending species, optionally `species:label`
    defender: String,

    /// Species dex (JSON)
    #[arg(long, env = "POKEDEX_PATH", default_value = "data/pokedex.json")]
    dex: PathBuf,

    /// Move table replacing the built-in one
    #[arg(long, env = "MOVES_PATH")]
    moves: Option<PathBuf>,

    #[arg(
        long,
        default_value_t = DEFAULT_LEVEL,
        value_parser = clap::value_parser!(u32).range(1..=100)
    )]
    level: u32,

    /// Treat every non-metadata string entry as a set, not just prefixed ones
    #[arg(long)]
    all_entries: bool,

    /// Label prefix marking a set
    #[arg(long, default_value = STRATEGY_PREFIX)]
    prefix: String,

    #[arg(long, value_parser = parse_weather)]
    weather: Option<Weather>,

    /// Reflect on the defender's side
    #[arg(long)]
    reflect: bool,

    /// Light Screen on the defender's side
    #[arg(long)]
    light_screen: bool,

    /// Aurora Veil on the defender's side
    #[arg(long)]
    aurora_veil: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write the report here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Evaluate pairs on all cores
    #[arg(long)]
    parallel: bool,

    /// Debug logging (overrides RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn parse_weather(raw: &str) -> Result<Weather, String> {
    Weather::from_name(raw)
        .ok_or_else(|| format!("unknown weather '{raw}' (use sun, rain, sand or snow)"))
}

impl Cli {
    fn into_options(self) -> MatchupOptions {
        let policy = if self.all_entries {
            SelectionPolicy::AnyString
        } else {
            SelectionPolicy::Prefix(self.prefix)
        };
        let field = Field {
            weather: self.weather,
            attacker_side: SideConditions::default(),
            defender_side: SideConditions {
                reflect: self.reflect,
                light_screen: self.light_screen,
                aurora_veil: self.aurora_veil,
            },
        };
        MatchupOptions {
            dex_path: self.dex,
            moves_path: self.moves,
            attacker: self.attacker,
            defender: self.defender,
            level: self.level,
            policy,
            field,
            format: self.format,
            output_path: self.output,
            parallel: self.parallel,
        }
    }
}

fn setup_logging(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    // stdout carries the report.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);
    run(cli.into_options())
}
