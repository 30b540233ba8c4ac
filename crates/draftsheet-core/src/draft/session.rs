// Draft session: composes the pool, keepers, sequencer, and rosters into the
// operations a draft operator issues (draft, undo, keeper, reset).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::keeper::{KeeperRegistry, KeeperReservation};
use super::pick::{PickSlot, Position, TeamId};
use super::pool::{Player, PlayerId, PlayerPool};
use super::roster::{RosterBook, RosterEntry};
use super::sequencer::{DraftSettings, PickSequencer};
use super::DraftError;

/// How many recent picks a snapshot carries.
const RECENT_PICKS: usize = 10;

/// A live pick, as recorded in the draft log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftPick {
    /// Overall pick index (1-based).
    pub pick_number: u32,
    pub round: u32,
    pub pick_in_round: u32,
    pub team: TeamId,
    pub player_id: PlayerId,
    pub player_name: String,
    pub position: Position,
    pub picked_at: DateTime<Utc>,
}

impl DraftPick {
    fn new(slot: &PickSlot, player: &Player) -> Self {
        DraftPick {
            pick_number: slot.pick,
            round: slot.round,
            pick_in_round: slot.pick_in_round,
            team: slot.team,
            player_id: player.id,
            player_name: player.name.clone(),
            position: player.position,
            picked_at: Utc::now(),
        }
    }
}

/// The result of a successful undo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UndonePick {
    pub team: TeamId,
    pub entry: RosterEntry,
}

/// Per-team summary carried in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSummary {
    pub team: TeamId,
    pub roster_size: usize,
    pub keeper: Option<String>,
}

/// Read-only view of the session for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftSnapshot {
    pub settings: DraftSettings,
    /// The pick on the clock, or `None` once the draft is complete.
    pub on_the_clock: Option<PickSlot>,
    pub total_picks: u32,
    pub picks_remaining: u32,
    pub is_complete: bool,
    pub available_count: usize,
    pub upcoming: Vec<PickSlot>,
    pub teams: Vec<TeamSummary>,
    /// Most recent live picks, oldest first.
    pub recent_picks: Vec<DraftPick>,
}

impl DraftSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// One draft session: everything needed to run a snake draft.
///
/// Every mutating operation validates before it changes anything, so a
/// rejected call leaves the session untouched.
#[derive(Debug, Clone)]
pub struct DraftSession {
    sequencer: PickSequencer,
    pool: PlayerPool,
    keepers: KeeperRegistry,
    rosters: RosterBook,
    log: Vec<DraftPick>,
}

impl DraftSession {
    pub fn new(team_count: u32, round_count: u32, players: Vec<Player>) -> Result<Self, DraftError> {
        let settings = DraftSettings::new(team_count, round_count)?;
        info!(
            "New draft session: {} teams, {} rounds, {} players",
            team_count,
            round_count,
            players.len()
        );
        Ok(DraftSession {
            sequencer: PickSequencer::new(settings),
            pool: PlayerPool::new(players),
            keepers: KeeperRegistry::new(),
            rosters: RosterBook::new(team_count),
            log: Vec::new(),
        })
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Draft `name` with the pick on the clock, then advance to the next
    /// open pick.
    pub fn draft_player(&mut self, name: &str) -> Result<DraftPick, DraftError> {
        let player = self.lookup(name)?;
        if self.sequencer.is_complete() {
            return Err(DraftError::DraftComplete);
        }

        let slot = self.sequencer.current_slot();
        let pick = DraftPick::new(&slot, &player);
        let player_id = player.id;
        self.rosters
            .append(slot.team, RosterEntry::drafted(&slot, player))?;
        self.pool.remove(player_id);
        self.log.push(pick.clone());

        if slot.pick >= self.sequencer.settings().total_picks() {
            self.sequencer.finish();
        } else {
            let skipped = self.sequencer.advance(&self.keepers);
            self.backfill_keeper_picks(&skipped);
        }

        info!(
            "Pick {} (round {}.{}): {} selects {} ({})",
            pick.pick_number,
            pick.round,
            pick.pick_in_round,
            pick.team,
            pick.player_name,
            pick.position
        );
        if self.sequencer.is_complete() {
            info!("Draft complete after {} live picks", self.log.len());
        }
        Ok(pick)
    }

    /// Undo the most recent live pick.
    ///
    /// Walks the cursor back past keeper slots to the nearest drafted pick,
    /// returns that player to the pool, and leaves the cursor on the freed
    /// slot. Keepers are never undone.
    pub fn undo_last_pick(&mut self) -> Result<UndonePick, DraftError> {
        let target = self.find_undo_target().ok_or(DraftError::NothingToUndo)?;

        let entry = self.rosters.pop_last(target.team)?;
        while self.sequencer.settings().current_pick > target.pick {
            self.sequencer.reverse();
        }
        self.pool.insert(entry.player.clone());
        self.log.retain(|p| p.pick_number != target.pick);

        info!(
            "Undo pick {} (round {}, {}): {} returned to pool",
            target.pick, target.round, target.team, entry.player.name
        );
        Ok(UndonePick {
            team: target.team,
            entry,
        })
    }

    /// Reserve `team`'s pick in `round` for the pool player `name`.
    ///
    /// Only allowed before any live pick has been made.
    pub fn add_keeper(
        &mut self,
        team: TeamId,
        name: &str,
        round: u32,
    ) -> Result<KeeperReservation, DraftError> {
        if self.has_started() {
            return Err(DraftError::DraftAlreadyStarted);
        }
        let settings = *self.sequencer.settings();
        if team.0 < 1 || team.0 > settings.team_count {
            return Err(DraftError::UnknownTeam {
                team,
                team_count: settings.team_count,
            });
        }
        if let Some(existing) = self.keepers.get(team) {
            return Err(DraftError::DuplicateKeeper {
                team,
                player: existing.player.name.clone(),
            });
        }
        let player = self.lookup(name)?;
        self.keepers.check(team, round, settings.round_count)?;

        let reservation = KeeperReservation {
            team,
            round,
            player: player.clone(),
        };
        self.rosters.append(team, RosterEntry::keeper(round, player))?;
        self.pool.remove(reservation.player.id);
        self.keepers.record(reservation.clone());

        let skipped = self.sequencer.align_to_next_available(&self.keepers);
        self.backfill_keeper_picks(&skipped);

        info!(
            "Keeper: {} keeps {} in round {}",
            team, reservation.player.name, round
        );
        Ok(reservation)
    }

    /// Change the draft dimensions. Only allowed before anything (picks or
    /// keepers) has been recorded.
    pub fn reset_draft(&mut self, team_count: u32, round_count: u32) -> Result<(), DraftError> {
        if self.sequencer.settings().current_pick != 1 || !self.rosters.is_empty() {
            return Err(DraftError::DraftAlreadyStarted);
        }
        let settings = DraftSettings::new(team_count, round_count)?;
        self.sequencer = PickSequencer::new(settings);
        self.rosters = RosterBook::new(team_count);
        self.log.clear();
        info!("Draft reset: {} teams, {} rounds", team_count, round_count);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn settings(&self) -> &DraftSettings {
        self.sequencer.settings()
    }

    /// The pick on the clock, or `None` once the draft is complete.
    pub fn on_the_clock(&self) -> Option<PickSlot> {
        (!self.sequencer.is_complete()).then(|| self.sequencer.current_slot())
    }

    pub fn is_complete(&self) -> bool {
        self.sequencer.is_complete()
    }

    /// Whether a live pick has been made.
    pub fn has_started(&self) -> bool {
        !self.log.is_empty() || self.rosters.has_live_picks()
    }

    pub fn pool(&self) -> &PlayerPool {
        &self.pool
    }

    pub fn keepers(&self) -> &KeeperRegistry {
        &self.keepers
    }

    pub fn rosters(&self) -> &RosterBook {
        &self.rosters
    }

    pub fn roster(&self, team: TeamId) -> Result<&[RosterEntry], DraftError> {
        self.rosters.roster(team)
    }

    /// Live picks in the order they were made.
    pub fn log(&self) -> &[DraftPick] {
        &self.log
    }

    /// The next `count` open picks after the one on the clock.
    pub fn upcoming(&self, count: usize) -> Vec<PickSlot> {
        self.sequencer.upcoming(&self.keepers, count)
    }

    pub fn snapshot(&self, lookahead: usize) -> DraftSnapshot {
        let settings = *self.settings();
        let teams = self
            .rosters
            .iter()
            .map(|(team, entries)| TeamSummary {
                team,
                roster_size: entries.len(),
                keeper: self.keepers.get(team).map(|k| k.player.name.clone()),
            })
            .collect();
        let recent_start = self.log.len().saturating_sub(RECENT_PICKS);

        DraftSnapshot {
            settings,
            on_the_clock: self.on_the_clock(),
            total_picks: settings.total_picks(),
            picks_remaining: settings.picks_remaining(),
            is_complete: settings.is_complete(),
            available_count: self.pool.len(),
            upcoming: self.upcoming(lookahead),
            teams,
            recent_picks: self.log[recent_start..].to_vec(),
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn lookup(&self, name: &str) -> Result<Player, DraftError> {
        self.pool
            .find_by_name(name)
            .cloned()
            .ok_or_else(|| DraftError::PlayerNotFound {
                name: name.trim().to_string(),
            })
    }

    /// Search backwards from the cursor for the most recent drafted slot.
    fn find_undo_target(&self) -> Option<PickSlot> {
        let mut probe = self.sequencer.clone();
        while probe.reverse() {
            let slot = probe.current_slot();
            if self.keepers.is_slot_reserved(&slot) {
                continue;
            }
            match self.rosters.last(slot.team) {
                Some(entry) if !entry.is_keeper && entry.pick_number == Some(slot.pick) => {
                    return Some(slot);
                }
                _ => continue,
            }
        }
        None
    }

    fn backfill_keeper_picks(&mut self, skipped: &[PickSlot]) {
        for slot in skipped {
            if self
                .rosters
                .resolve_keeper_pick(slot.team, slot.round, slot.pick_in_round)
            {
                debug!(
                    "Keeper slot reached: {} round {} pick {}",
                    slot.team, slot.round, slot.pick_in_round
                );
            }
        }
    }
}
