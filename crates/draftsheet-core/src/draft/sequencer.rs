// Pick sequencing: the draft cursor, snake-order advance/reverse, and
// keeper-aware skipping.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::keeper::KeeperRegistry;
use super::pick::{decompose_pick, PickSlot, TeamId};
use super::DraftError;

/// Largest league the board accepts.
pub const MAX_TEAMS: u32 = 20;
/// Longest draft the board accepts.
pub const MAX_ROUNDS: u32 = 30;

/// Draft dimensions plus the live pick cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftSettings {
    pub team_count: u32,
    pub round_count: u32,
    /// 1-based index of the pick on the clock. `total_picks() + 1` means the
    /// draft is complete.
    pub current_pick: u32,
}

impl DraftSettings {
    pub fn new(team_count: u32, round_count: u32) -> Result<Self, DraftError> {
        if team_count == 0 {
            return Err(DraftError::InvalidSettings {
                message: "team count must be greater than 0".into(),
            });
        }
        if round_count == 0 {
            return Err(DraftError::InvalidSettings {
                message: "round count must be greater than 0".into(),
            });
        }
        if team_count > MAX_TEAMS {
            return Err(DraftError::InvalidSettings {
                message: format!("team count {team_count} exceeds the maximum of {MAX_TEAMS}"),
            });
        }
        if round_count > MAX_ROUNDS {
            return Err(DraftError::InvalidSettings {
                message: format!("round count {round_count} exceeds the maximum of {MAX_ROUNDS}"),
            });
        }
        Ok(DraftSettings {
            team_count,
            round_count,
            current_pick: 1,
        })
    }

    pub fn total_picks(&self) -> u32 {
        self.team_count * self.round_count
    }

    pub fn is_complete(&self) -> bool {
        self.current_pick > self.total_picks()
    }

    /// Picks still to be made, counting the one on the clock.
    pub fn picks_remaining(&self) -> u32 {
        (self.total_picks() + 1).saturating_sub(self.current_pick)
    }

    /// Round/team decomposition of the current pick. Past the end of the draft
    /// this describes the virtual slot `total_picks() + 1`.
    pub fn current_slot(&self) -> PickSlot {
        decompose_pick(self.current_pick, self.team_count)
    }

    pub fn current_round(&self) -> u32 {
        self.current_slot().round
    }

    pub fn current_team(&self) -> TeamId {
        self.current_slot().team
    }
}

/// Moves the pick cursor through the snake order.
///
/// The sequencer never touches rosters. Methods that skip keeper slots
/// return the slots they passed so the caller can backfill the keepers'
/// pick numbers.
#[derive(Debug, Clone)]
pub struct PickSequencer {
    settings: DraftSettings,
}

impl PickSequencer {
    pub fn new(settings: DraftSettings) -> Self {
        PickSequencer { settings }
    }

    pub fn settings(&self) -> &DraftSettings {
        &self.settings
    }

    pub fn current_slot(&self) -> PickSlot {
        self.settings.current_slot()
    }

    pub fn is_complete(&self) -> bool {
        self.settings.is_complete()
    }

    /// Move to the next pick that is not held by a keeper.
    ///
    /// No-op once the cursor is on (or past) the final pick.
    pub fn advance(&mut self, keepers: &KeeperRegistry) -> Vec<PickSlot> {
        let mut skipped = Vec::new();
        if self.settings.current_pick >= self.settings.total_picks() {
            return skipped;
        }
        self.settings.current_pick += 1;
        self.skip_reserved(keepers, &mut skipped);
        skipped
    }

    /// Step back one pick. Does not skip keeper slots.
    ///
    /// Returns `false` (and does nothing) when already on the first pick.
    pub fn reverse(&mut self) -> bool {
        if self.settings.current_pick <= 1 {
            return false;
        }
        self.settings.current_pick -= 1;
        true
    }

    /// If the current pick is held by a keeper, move forward to the next open
    /// pick. Idempotent.
    pub fn align_to_next_available(&mut self, keepers: &KeeperRegistry) -> Vec<PickSlot> {
        let mut skipped = Vec::new();
        self.skip_reserved(keepers, &mut skipped);
        skipped
    }

    /// Move the cursor one past the final pick.
    pub(crate) fn finish(&mut self) {
        self.settings.current_pick = self.settings.total_picks() + 1;
    }

    /// The next `count` open picks after the current one, without moving the
    /// cursor.
    pub fn upcoming(&self, keepers: &KeeperRegistry, count: usize) -> Vec<PickSlot> {
        let mut probe = self.clone();
        let mut slots = Vec::with_capacity(count);
        while slots.len() < count {
            let before = probe.settings.current_pick;
            probe.advance(keepers);
            if probe.settings.current_pick == before || probe.is_complete() {
                break;
            }
            slots.push(probe.current_slot());
        }
        slots
    }

    fn skip_reserved(&mut self, keepers: &KeeperRegistry, skipped: &mut Vec<PickSlot>) {
        let total = self.settings.total_picks();
        while !self.is_complete() {
            let slot = self.current_slot();
            if !keepers.is_slot_reserved(&slot) {
                break;
            }
            debug!(
                "Skipping pick {} (round {}, {}): held by keeper",
                slot.pick, slot.round, slot.team
            );
            skipped.push(slot);
            if self.settings.current_pick >= total {
                // The final slot belongs to a keeper: nothing left to draft.
                self.finish();
                break;
            }
            self.settings.current_pick += 1;
        }
    }
}
