//! Parser for a single set block in the Showdown-style export format.
//!
//! Each non-empty, trimmed line is bound to at most one [`LineKind`]. The
//! detectors are tried in this fixed order and the first one that accepts a
//! line claims it:
//!
//! 1. item: starts with `@`
//! 2. move: starts with `- `
//! 3. ability: starts with `ability:` (any case)
//! 4. tera type: starts with `tera type:` (any case)
//! 5. status: starts with `status:` (any case)
//! 6. boosts: starts with `boosts:` (any case)
//! 7. EVs: starts with `EVs`
//! 8. IVs: starts with `IVs`
//! 9. nature: contains `Nature`
//!
//! So `- Nature Power` is a move and `EVs: 4 HP Nature` is an EV line. Every
//! single-valued field reads the first line of its kind; later duplicates and
//! unclaimed lines are ignored.

use crate::stats::{Stat, StatTable};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// A set after normalization. Built once per parse and never mutated.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedSet {
    pub name: String,
    pub item: String,
    pub ability: String,
    pub nature: Option<String>,
    pub moves: Vec<String>,
    pub evs: StatTable,
    pub ivs: StatTable,
    pub tera_type: Option<String>,
    /// Keyed by the lower-cased stat name exactly as written (`atk`, not
    /// canonicalized through the abbreviation table).
    pub boosts: BTreeMap<String, i32>,
    pub status: Option<String>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum LineKind {
    Item,
    Move,
    Ability,
    TeraType,
    Status,
    Boosts,
    Evs,
    Ivs,
    Nature,
}

fn classify(line: &str) -> Option<LineKind> {
    if line.starts_with('@') {
        Some(LineKind::Item)
    } else if line.starts_with("- ") {
        Some(LineKind::Move)
    } else if starts_with_ignore_case(line, "ability:") {
        Some(LineKind::Ability)
    } else if starts_with_ignore_case(line, "tera type:") {
        Some(LineKind::TeraType)
    } else if starts_with_ignore_case(line, "status:") {
        Some(LineKind::Status)
    } else if starts_with_ignore_case(line, "boosts:") {
        Some(LineKind::Boosts)
    } else if line.starts_with("EVs") {
        Some(LineKind::Evs)
    } else if line.starts_with("IVs") {
        Some(LineKind::Ivs)
    } else if line.contains("Nature") {
        Some(LineKind::Nature)
    } else {
        None
    }
}

fn starts_with_ignore_case(line: &str, prefix: &str) -> bool {
    line.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Cleaned lines of one set, each tagged with the detector that claimed it.
struct SetLines<'a> {
    lines: Vec<(LineKind, &'a str)>,
}

impl<'a> SetLines<'a> {
    fn new(raw: &'a str) -> Self {
        let lines = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(|line| classify(line).map(|kind| (kind, line)))
            .collect();
        Self { lines }
    }

    fn first(&self, kind: LineKind) -> Option<&'a str> {
        self.all(kind).next()
    }

    fn all(&self, kind: LineKind) -> impl Iterator<Item = &'a str> + '_ {
        self.lines
            .iter()
            .filter(move |(line_kind, _)| *line_kind == kind)
            .map(|(_, line)| *line)
    }
}

/// Parse one set block. Never fails: absent fields take their defaults and
/// anything unrecognized is skipped.
pub fn parse_set(species: &str, raw: &str) -> ParsedSet {
    let lines = SetLines::new(raw);
    ParsedSet {
        name: species.to_string(),
        item: item(&lines),
        ability: ability(&lines),
        nature: nature(&lines),
        moves: moves(&lines),
        evs: stat_spread(lines.first(LineKind::Evs), "EVs: ", StatTable::default_evs()),
        ivs: stat_spread(lines.first(LineKind::Ivs), "IVs: ", StatTable::default_ivs()),
        tera_type: lines
            .first(LineKind::TeraType)
            .and_then(after_separator)
            .map(str::to_string),
        boosts: boosts(lines.first(LineKind::Boosts)),
        status: lines
            .first(LineKind::Status)
            .and_then(after_separator)
            .map(str::to_string),
    }
}

fn item(lines: &SetLines<'_>) -> String {
    // The marker plus one separator character.
    lines
        .first(LineKind::Item)
        .map(|line| line.chars().skip(2).collect())
        .unwrap_or_default()
}

fn ability(lines: &SetLines<'_>) -> String {
    lines
        .first(LineKind::Ability)
        .and_then(after_separator)
        .unwrap_or_default()
        .to_string()
}

fn nature(lines: &SetLines<'_>) -> Option<String> {
    lines
        .first(LineKind::Nature)
        .and_then(|line| line.split_whitespace().next())
        .map(str::to_string)
}

fn moves(lines: &SetLines<'_>) -> Vec<String> {
    lines
        .all(LineKind::Move)
        .map(|line| line["- ".len()..].to_string())
        .collect()
}

fn after_separator(line: &str) -> Option<&str> {
    line.split_once(": ").map(|(_, rest)| rest)
}

/// Overlay an `EVs:`/`IVs:` line on `defaults`. Segments look like `252 SpA`.
fn stat_spread(line: Option<&str>, prefix: &str, defaults: StatTable) -> StatTable {
    let Some(line) = line else {
        return defaults;
    };
    let body = line.strip_prefix(prefix).unwrap_or(line);
    body.split('/').fold(defaults, |table, segment| {
        let segment = segment.trim();
        let Some((value, alias)) = segment.split_once(char::is_whitespace) else {
            if !segment.is_empty() {
                debug!(segment, "skipping stat segment without a stat name");
            }
            return table;
        };
        match Stat::from_alias(alias) {
            Some(stat) => {
                let parsed = parse_int_prefix(value);
                if parsed.is_none() {
                    debug!(segment, "stat value is not a number");
                }
                table.with(stat, parsed)
            }
            None => {
                debug!(alias, "ignoring unknown stat abbreviation");
                table
            }
        }
    })
}

fn boosts(line: Option<&str>) -> BTreeMap<String, i32> {
    let mut boosts = BTreeMap::new();
    let Some(line) = line else {
        return boosts;
    };
    let body = line.strip_prefix("Boosts: ").unwrap_or(line);
    for segment in body.split(',') {
        let segment = segment.trim();
        let Some((stat, value)) = segment.split_once('+') else {
            debug!(segment, "skipping boost without '+'");
            continue;
        };
        match parse_int_prefix(value) {
            Some(stages) if !stat.is_empty() => {
                boosts.insert(stat.to_lowercase(), stages);
            }
            _ => debug!(segment, "skipping malformed boost"),
        }
    }
    boosts
}

/// Leading-integer parse: optional sign, then ASCII digits, rest ignored.
/// `"12abc"` is 12, `"abc"` is `None`. Saturates at the `i32` bounds.
pub(crate) fn parse_int_prefix(text: &str) -> Option<i32> {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let len = digits.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 {
        return None;
    }
    let limit = i64::from(i32::MAX) + 1;
    let magnitude = digits[..len]
        .bytes()
        .fold(0i64, |acc, b| (acc * 10 + i64::from(b - b'0')).min(limit));
    let value = if negative { -magnitude } else { magnitude };
    Some(value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GARCHOMP: &str = "\
@ Leftovers
Ability: Intimidate
Bold Nature
EVs: 252 HP / 252 Def / 4 SpD
IVs: 0 Atk
- Earthquake
- Protect
";

    #[test]
    fn parse_full_set() {
        let set = parse_set("garchomp", GARCHOMP);
        assert_eq!(set.name, "garchomp");
        assert_eq!(set.item, "Leftovers");
        assert_eq!(set.ability, "Intimidate");
        assert_eq!(set.nature.as_deref(), Some("Bold"));
        assert_eq!(set.moves, vec!["Earthquake", "Protect"]);
        assert_eq!(
            set.evs,
            StatTable {
                hp: Some(252),
                atk: Some(0),
                def: Some(252),
                spa: Some(0),
                spd: Some(4),
                spe: Some(0),
            }
        );
        assert_eq!(set.ivs, StatTable::default_ivs().with(Stat::Atk, Some(0)));
        assert_eq!(set.tera_type, None);
        assert!(set.boosts.is_empty());
        assert_eq!(set.status, None);
    }

    #[test]
    fn parse_minimal_defaults() {
        let set = parse_set("pikachu", "- Thunderbolt");
        assert_eq!(set.item, "");
        assert_eq!(set.ability, "");
        assert_eq!(set.nature, None);
        assert_eq!(set.moves, vec!["Thunderbolt"]);
        assert_eq!(set.evs, StatTable::default_evs());
        assert_eq!(set.ivs, StatTable::default_ivs());
    }

    #[test]
    fn empty_input_is_all_defaults() {
        let set = parse_set("ditto", "\n   \n");
        assert_eq!(set.moves, Vec::<String>::new());
        assert_eq!(set.evs, StatTable::default_evs());
        assert_eq!(set.ivs, StatTable::default_ivs());
    }

    #[test]
    fn first_line_of_a_kind_wins() {
        let text = "\
@ Choice Scarf
@ Life Orb
Ability: Levitate
Ability: Pressure
Timid Nature
Modest Nature
EVs: 252 SpA
EVs: 252 Atk
";
        let set = parse_set("latios", text);
        assert_eq!(set.item, "Choice Scarf");
        assert_eq!(set.ability, "Levitate");
        assert_eq!(set.nature.as_deref(), Some("Timid"));
        assert_eq!(set.evs.spa, Some(252));
        assert_eq!(set.evs.atk, Some(0));
    }

    #[test]
    fn item_drops_marker_and_one_separator() {
        assert_eq!(parse_set("x", "@ Heavy-Duty Boots").item, "Heavy-Duty Boots");
        assert_eq!(parse_set("x", "@Leftovers").item, "eftovers");
        assert_eq!(parse_set("x", "@").item, "");
    }

    #[test]
    fn ability_and_tera_type_match_any_case() {
        let text = "ABILITY: Protosynthesis\ntera TYPE: Fairy\nstatus: brn";
        let set = parse_set("x", text);
        assert_eq!(set.ability, "Protosynthesis");
        assert_eq!(set.tera_type.as_deref(), Some("Fairy"));
        assert_eq!(set.status.as_deref(), Some("brn"));
    }

    #[test]
    fn ability_without_separator_is_empty() {
        let set = parse_set("x", "Ability:Levitate\nTera Type:Steel");
        assert_eq!(set.ability, "");
        assert_eq!(set.tera_type, None);
    }

    #[test]
    fn nature_match_is_case_sensitive() {
        assert_eq!(parse_set("x", "jolly nature").nature, None);
        assert_eq!(parse_set("x", "Jolly Nature").nature.as_deref(), Some("Jolly"));
    }

    #[test]
    fn move_line_is_not_a_nature_line() {
        let text = "- Nature Power\nCalm Nature";
        let set = parse_set("x", text);
        assert_eq!(set.moves, vec!["Nature Power"]);
        assert_eq!(set.nature.as_deref(), Some("Calm"));
    }

    #[test]
    fn ev_line_mentioning_nature_stays_an_ev_line() {
        let set = parse_set("x", "EVs: 4 HP / Nature");
        assert_eq!(set.evs.hp, Some(4));
        assert_eq!(set.nature, None);
    }

    #[test]
    fn moves_keep_order_and_duplicates() {
        let set = parse_set("x", "- A\n-B\n- B\n- C\n- A");
        assert_eq!(set.moves, vec!["A", "B", "C", "A"]);
    }

    #[test]
    fn short_and_long_abbreviations_share_slots() {
        let set = parse_set("x", "EVs: 1 hp / 2 AT / 3 df / 4 SA / 5 sd / 6 Sp");
        assert_eq!(
            Stat::ALL.map(|stat| set.evs.get(stat)),
            [Some(1), Some(2), Some(3), Some(4), Some(5), Some(6)]
        );
        let long = parse_set("x", "EVs: 1 HP / 2 Atk / 3 Def / 4 SpA / 5 SpD / 6 Spe");
        assert_eq!(set.evs, long.evs);
    }

    #[test]
    fn unknown_and_malformed_segments_are_skipped() {
        let set = parse_set("x", "EVs: 252 Speed / 100 / / 4 SpD / 8");
        assert_eq!(set.evs, StatTable::default_evs().with(Stat::Spd, Some(4)));
    }

    #[test]
    fn abbreviation_after_extra_whitespace_is_unknown() {
        let set = parse_set("x", "EVs: 252  HP / 4 Def");
        assert_eq!(set.evs.hp, Some(0));
        assert_eq!(set.evs.def, Some(4));
    }

    #[test]
    fn non_numeric_value_marks_the_slot() {
        let set = parse_set("x", "EVs: lots HP / 252 Atk\nIVs: x Spe");
        assert_eq!(set.evs.hp, None);
        assert_eq!(set.evs.atk, Some(252));
        assert_eq!(set.ivs.spe, None);
        assert_eq!(set.ivs.invalid_stats(), vec![Stat::Spe]);
    }

    #[test]
    fn ev_prefix_must_match_exactly_to_be_stripped() {
        // Without "EVs: " the first segment keeps the marker and is not a number.
        let set = parse_set("x", "EVs:252 HP / 4 Def");
        assert_eq!(set.evs.hp, None);
        assert_eq!(set.evs.def, Some(4));
    }

    #[test]
    fn lowercase_evs_line_is_not_detected() {
        let set = parse_set("x", "evs: 252 HP");
        assert_eq!(set.evs, StatTable::default_evs());
    }

    #[test]
    fn boosts_keep_lowercased_names() {
        let set = parse_set("x", "Boosts: atk+2, spe+1");
        let expected: BTreeMap<String, i32> =
            [("atk".to_string(), 2), ("spe".to_string(), 1)].into_iter().collect();
        assert_eq!(set.boosts, expected);
    }

    #[test]
    fn boosts_are_not_canonicalized() {
        let set = parse_set("x", "Boosts: At+2, SpA+1");
        assert_eq!(set.boosts.get("at"), Some(&2));
        assert_eq!(set.boosts.get("spa"), Some(&1));
        assert_eq!(set.boosts.get("atk"), None);
    }

    #[test]
    fn malformed_boosts_are_skipped() {
        let set = parse_set("x", "boosts: atk-1, def+x, +3, spd+1");
        let keys: Vec<&str> = set.boosts.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["spd"]);
    }

    #[test]
    fn parse_int_prefix_follows_leading_digits() {
        assert_eq!(parse_int_prefix("252"), Some(252));
        assert_eq!(parse_int_prefix("  +4"), Some(4));
        assert_eq!(parse_int_prefix("-1"), Some(-1));
        assert_eq!(parse_int_prefix("12abc"), Some(12));
        assert_eq!(parse_int_prefix("abc"), None);
        assert_eq!(parse_int_prefix("-"), None);
        assert_eq!(parse_int_prefix("99999999999"), Some(i32::MAX));
    }

    #[test]
    fn parse_is_repeatable() {
        assert_eq!(parse_set("garchomp", GARCHOMP), parse_set("garchomp", GARCHOMP));
    }
}
