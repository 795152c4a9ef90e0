use crate::model::MoveOutcome;
use serde::Serialize;
use std::fmt;

pub const MAX_TURNS: usize = 8;

/// Outcome of a duel from the attacker's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Win,
    Loss,
    Draw,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Win => f.write_str("win"),
            Verdict::Loss => f.write_str("loss"),
            Verdict::Draw => f.write_str("draw"),
        }
    }
}

/// One side of a duel: HP, speed and its move outcomes into the other side.
#[derive(Debug, Clone, Copy)]
pub struct Duelist<'a> {
    pub hp: u32,
    pub speed: u32,
    pub moves: &'a [MoveOutcome],
}

impl Duelist<'_> {
    fn best_damage(&self) -> i64 {
        self.moves
            .iter()
            .map(MoveOutcome::max_damage)
            .max()
            .map(i64::from)
            .unwrap_or(0)
    }
}

/// Both sides use their highest max-damage move every turn. The faster side
/// hits first and a knock-out ends the duel before the reply; on a speed tie
/// both hits land. Nobody down after [`MAX_TURNS`] is a draw.
pub fn simulate_duel(a: Duelist<'_>, b: Duelist<'_>) -> Verdict {
    let damage_a = a.best_damage();
    let damage_b = b.best_damage();
    let mut hp_a = i64::from(a.hp);
    let mut hp_b = i64::from(b.hp);

    for _ in 0..MAX_TURNS {
        if a.speed > b.speed {
            hp_b -= damage_a;
            if hp_b <= 0 {
                return Verdict::Win;
            }
            hp_a -= damage_b;
            if hp_a <= 0 {
                return Verdict::Loss;
            }
        } else if b.speed > a.speed {
            hp_a -= damage_b;
            if hp_a <= 0 {
                return Verdict::Loss;
            }
            hp_b -= damage_a;
            if hp_b <= 0 {
                return Verdict::Win;
            }
        } else {
            hp_b -= damage_a;
            hp_a -= damage_b;
            match (hp_a <= 0, hp_b <= 0) {
                (true, true) => return Verdict::Draw,
                (false, true) => return Verdict::Win,
                (true, false) => return Verdict::Loss,
                (false, false) => {}
            }
        }
    }
    Verdict::Draw
}

/// Verdict counts over every pair of a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchupSummary {
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
}

impl MatchupSummary {
    pub fn from_verdicts(verdicts: impl IntoIterator<Item = Verdict>) -> Self {
        verdicts
            .into_iter()
            .fold(Self::default(), |mut summary, verdict| {
                match verdict {
                    Verdict::Win => summary.wins += 1,
                    Verdict::Draw => summary.draws += 1,
                    Verdict::Loss => summary.losses += 1,
                }
                summary
            })
    }

    pub fn total(&self) -> usize {
        self.wins + self.draws + self.losses
    }

    /// Whole-number share of `count`, rounded down. 0 when there were no pairs.
    pub fn percent(&self, count: usize) -> usize {
        match self.total() {
            0 => 0,
            total => 100 * count / total,
        }
    }
}
