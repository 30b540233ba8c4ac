// Message types exchanged between the front end and the app loop.
//
// The front end turns operator input into `UserCommand`s; the app loop
// answers each one with one or more `UiUpdate`s.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::draft::keeper::KeeperReservation;
use crate::draft::pick::{PickSlot, Position, TeamId};
use crate::draft::pool::Player;
use crate::draft::roster::RosterEntry;
use crate::draft::session::{DraftPick, DraftSnapshot, UndonePick};

/// Commands sent from the front end to the app loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UserCommand {
    /// Draft a player with the pick on the clock.
    Draft { player: String },
    /// Undo the most recent live pick.
    Undo,
    AddKeeper {
        team: TeamId,
        player: String,
        round: u32,
    },
    ResetDraft { teams: u32, rounds: u32 },
    /// Publish a fresh snapshot.
    Status,
    Upcoming { count: usize },
    Available {
        position: Option<Position>,
        limit: usize,
    },
    /// Find undrafted players by name fragment or NFL team.
    Search { query: String, limit: usize },
    Roster { team: TeamId },
    /// Export every roster; `None` uses the configured directory.
    Export { dir: Option<PathBuf> },
    Quit,
}

/// Updates pushed from the app loop to the front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UiUpdate {
    Snapshot(Box<DraftSnapshot>),
    Picked(DraftPick),
    Undone(UndonePick),
    KeeperAdded(KeeperReservation),
    Reset { teams: u32, rounds: u32 },
    Upcoming(Vec<PickSlot>),
    Available(Vec<Player>),
    SearchResults {
        query: String,
        players: Vec<Player>,
    },
    Roster {
        team: TeamId,
        entries: Vec<RosterEntry>,
    },
    Exported(Vec<PathBuf>),
    /// A command was refused; the session is unchanged.
    Rejected { message: String },
}
