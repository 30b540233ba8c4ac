// Pick slots: positions, team identifiers, and the snake-order decomposition
// of the linear pick index.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Football positions a player can be drafted at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    Quarterback,
    RunningBack,
    WideReceiver,
    TightEnd,
    Kicker,
    Defense,
}

impl Position {
    /// Every position in display order.
    pub const ALL: [Position; 6] = [
        Position::Quarterback,
        Position::RunningBack,
        Position::WideReceiver,
        Position::TightEnd,
        Position::Kicker,
        Position::Defense,
    ];

    /// Parse a position string into a Position enum.
    ///
    /// Case-insensitive. Accepts the common aliases used by ranking sites:
    /// - "PK" -> Kicker
    /// - "DEF", "D/ST", "D" -> Defense
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "QB" => Some(Position::Quarterback),
            "RB" => Some(Position::RunningBack),
            "WR" => Some(Position::WideReceiver),
            "TE" => Some(Position::TightEnd),
            "K" | "PK" => Some(Position::Kicker),
            "DST" | "DEF" | "D/ST" | "D" => Some(Position::Defense),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
            Position::Kicker => "K",
            Position::Defense => "DST",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// A fantasy team's draft slot, 1-based (`TeamId(1)` picks first in odd rounds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub u32);

impl TeamId {
    /// Zero-based index into per-team collections.
    pub fn index(self) -> usize {
        self.0.saturating_sub(1) as usize
    }

    /// Iterate over every team in a draft with `team_count` teams.
    pub fn all(team_count: u32) -> impl Iterator<Item = TeamId> {
        (1..=team_count).map(TeamId)
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Team {}", self.0)
    }
}

/// One slot of the draft board: a pick index and where it falls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickSlot {
    /// Linear pick index (1-based).
    pub pick: u32,
    /// Round number (1-based).
    pub round: u32,
    /// Position of the pick within its round (1-based, in pick order).
    pub pick_in_round: u32,
    /// The team on the clock for this pick.
    pub team: TeamId,
}

/// Decompose a 1-based pick index into its round, position in round, and team.
///
/// Odd rounds run Team 1 -> Team N, even rounds run Team N -> Team 1.
pub fn decompose_pick(pick: u32, team_count: u32) -> PickSlot {
    debug_assert!(pick >= 1, "pick indices are 1-based");
    debug_assert!(team_count >= 1, "a draft needs at least one team");

    let team_count = team_count.max(1);
    let offset = pick.saturating_sub(1);
    let round = offset / team_count + 1;
    let pick_in_round = offset % team_count + 1;
    let team = if round % 2 == 1 {
        pick_in_round
    } else {
        team_count - pick_in_round + 1
    };

    PickSlot {
        pick,
        round,
        pick_in_round,
        team: TeamId(team),
    }
}
