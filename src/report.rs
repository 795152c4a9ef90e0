use crate::duel::MatchupSummary;
use crate::model::{BattlerSummary, MatchupReport, MoveOutcome};
use anyhow::Context;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    matchups: &'a [MatchupReport],
    summary: &'a MatchupSummary,
}

pub fn render(
    reports: &[MatchupReport],
    summary: &MatchupSummary,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(reports, summary)),
        OutputFormat::Json => {
            let report = JsonReport {
                matchups: reports,
                summary,
            };
            serde_json::to_string_pretty(&report).context("Failed to serialize report")
        }
    }
}

/// Print to stdout, or write to `output` when given.
pub fn write_report(
    reports: &[MatchupReport],
    summary: &MatchupSummary,
    format: OutputFormat,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let rendered = render(reports, summary, format)?;
    match output {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("Failed to write report to {}", path.display())),
        None => {
            println!("{rendered}");
            Ok(())
        }
    }
}

pub fn render_text(reports: &[MatchupReport], summary: &MatchupSummary) -> String {
    let mut out = String::new();
    for report in reports {
        let _ = writeln!(out, "=== {} vs {} ===", report.set_names.a, report.set_names.b);
        push_battler(&mut out, &report.attacker);
        push_battler(&mut out, &report.defender);
        let _ = writeln!(out, "{} -> {}", report.attacker.name, report.defender.name);
        push_moves(&mut out, &report.moves);
        let _ = writeln!(out, "{} -> {}", report.defender.name, report.attacker.name);
        push_moves(&mut out, &report.reverse_moves);
        let _ = writeln!(out, "Verdict: {}", report.verdict);
        out.push('\n');
    }
    if let Some(first) = reports.first() {
        let _ = writeln!(out, "Summary: {} vs {}", first.attacker.name, first.defender.name);
    }
    let _ = writeln!(
        out,
        "Wins: {} ({}%)",
        summary.wins,
        summary.percent(summary.wins)
    );
    let _ = writeln!(
        out,
        "Draws: {} ({}%)",
        summary.draws,
        summary.percent(summary.draws)
    );
    let _ = write!(
        out,
        "Losses: {} ({}%)",
        summary.losses,
        summary.percent(summary.losses)
    );
    out
}

fn push_battler(out: &mut String, battler: &BattlerSummary) {
    let or_dash = |value: &str| {
        if value.is_empty() {
            "-".to_string()
        } else {
            value.to_string()
        }
    };
    let stats = &battler.stats;
    let _ = writeln!(
        out,
        "{} @ {} | {} | {} | {}/{}/{}/{}/{}/{}",
        battler.name,
        or_dash(&battler.item),
        or_dash(&battler.ability),
        battler.nature.as_deref().unwrap_or("-"),
        stats.hp,
        stats.atk,
        stats.def,
        stats.spa,
        stats.spd,
        stats.spe
    );
}

fn push_moves(out: &mut String, moves: &[MoveOutcome]) {
    for outcome in moves {
        match outcome {
            MoveOutcome::Hit {
                name,
                min,
                max,
                min_percent,
                max_percent,
            } => {
                let _ = writeln!(
                    out,
                    "  {name}: {min}-{max} ({min_percent:.1}% - {max_percent:.1}%)"
                );
            }
            MoveOutcome::Failed { name, error } => {
                let _ = writeln!(out, "  {name}: {error}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duel::Verdict;
    use crate::model::SetNames;
    use pokemon_set_core::stats::{StatTable, StatsSet};

    fn summary(name: &str) -> BattlerSummary {
        BattlerSummary {
            name: name.to_string(),
            item: String::new(),
            ability: "Levitate".to_string(),
            nature: Some("Timid".to_string()),
            tera_type: None,
            evs: StatTable::default_evs(),
            ivs: StatTable::default_ivs(),
            stats: StatsSet {
                hp: 100,
                atk: 50,
                def: 60,
                spa: 70,
                spd: 80,
                spe: 90,
            },
        }
    }

    fn report() -> MatchupReport {
        MatchupReport {
            set_names: SetNames {
                a: "strategy: A".to_string(),
                b: "strategy: B".to_string(),
            },
            attacker: summary("Latios"),
            defender: summary("Latias"),
            moves: vec![
                MoveOutcome::Hit {
                    name: "Draco Meteor".to_string(),
                    min: 85,
                    max: 100,
                    min_percent: 85.0,
                    max_percent: 100.0,
                },
                MoveOutcome::failed("Mist Ball?", "invalid move"),
            ],
            reverse_moves: vec![],
            verdict: Verdict::Win,
        }
    }

    #[test]
    fn text_report_lists_moves_and_summary() {
        let reports = vec![report()];
        let summary = MatchupSummary::from_verdicts([Verdict::Win]);
        let text = render_text(&reports, &summary);
        assert!(text.starts_with("=== strategy: A vs strategy: B ===\n"));
        assert!(text.contains("Latios @ - | Levitate | Timid | 100/50/60/70/80/90\n"));
        assert!(text.contains("  Draco Meteor: 85-100 (85.0% - 100.0%)\n"));
        assert!(text.contains("  Mist Ball?: invalid move\n"));
        assert!(text.contains("Verdict: win\n"));
        assert!(text.ends_with("Wins: 1 (100%)\nDraws: 0 (0%)\nLosses: 0 (0%)"));
    }

    #[test]
    fn json_report_keeps_record_shape() -> anyhow::Result<()> {
        let reports = vec![report()];
        let summary = MatchupSummary::from_verdicts([Verdict::Win]);
        let json = render(&reports, &summary, OutputFormat::Json)?;
        let value: serde_json::Value = serde_json::from_str(&json)?;
        let first = &value["matchups"][0];
        assert_eq!(first["setNames"]["a"], "strategy: A");
        assert_eq!(first["attacker"]["evs"]["hp"], 0);
        assert_eq!(first["moves"][1]["error"], "invalid move");
        assert_eq!(first["verdict"], "win");
        assert_eq!(value["summary"]["wins"], 1);
        Ok(())
    }

    #[test]
    fn report_can_be_written_to_a_file() -> anyhow::Result<()> {
        let path = std::env::temp_dir().join(format!("matchups-{}.txt", std::process::id()));
        let summary = MatchupSummary::default();
        write_report(&[], &summary, OutputFormat::Text, Some(&path))?;
        let written = std::fs::read_to_string(&path)?;
        std::fs::remove_file(&path)?;
        assert_eq!(written, "Wins: 0 (0%)\nDraws: 0 (0%)\nLosses: 0 (0%)");
        Ok(())
    }
}
