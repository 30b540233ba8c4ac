// Draft state machine: player pool, keepers, pick sequencing, rosters, and
// the session facade that keeps them consistent.

pub mod keeper;
pub mod pick;
pub mod pool;
pub mod roster;
pub mod sequencer;
pub mod session;

use thiserror::Error;

use pick::TeamId;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Reasons a draft operation is rejected.
///
/// Every variant is recoverable: a rejected operation leaves the session
/// exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("player not found in the available pool: {name}")]
    PlayerNotFound { name: String },

    #[error("the draft is complete; no picks remain")]
    DraftComplete,

    #[error("{team} already has a keeper ({player})")]
    DuplicateKeeper { team: TeamId, player: String },

    #[error("round {round} is outside 1..={round_count}")]
    InvalidRound { round: u32, round_count: u32 },

    #[error("the draft has already started")]
    DraftAlreadyStarted,

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("{team} is not in this draft ({team_count} teams)")]
    UnknownTeam { team: TeamId, team_count: u32 },

    #[error("{team} has no roster entries")]
    EmptyRoster { team: TeamId },

    #[error("invalid draft settings: {message}")]
    InvalidSettings { message: String },
}
