// Pre-draft keeper reservations: at most one per team, pinned to a round.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::pick::{PickSlot, TeamId};
use super::pool::Player;
use super::DraftError;

/// A player kept by a team, occupying that team's pick in `round`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeeperReservation {
    pub team: TeamId,
    pub round: u32,
    pub player: Player,
}

/// All keeper reservations for a draft.
#[derive(Debug, Clone, Default)]
pub struct KeeperRegistry {
    reservations: BTreeMap<TeamId, KeeperReservation>,
}

impl KeeperRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether `team` may reserve `round`.
    ///
    /// Fails with `DuplicateKeeper` if the team already holds a reservation
    /// and `InvalidRound` if the round is outside `1..=round_count`.
    pub fn check(&self, team: TeamId, round: u32, round_count: u32) -> Result<(), DraftError> {
        if let Some(existing) = self.reservations.get(&team) {
            return Err(DraftError::DuplicateKeeper {
                team,
                player: existing.player.name.clone(),
            });
        }
        if round < 1 || round > round_count {
            return Err(DraftError::InvalidRound { round, round_count });
        }
        Ok(())
    }

    /// Record a reservation that has already passed [`KeeperRegistry::check`].
    pub(crate) fn record(&mut self, reservation: KeeperReservation) {
        self.reservations.insert(reservation.team, reservation);
    }

    pub fn get(&self, team: TeamId) -> Option<&KeeperReservation> {
        self.reservations.get(&team)
    }

    /// Whether `team`'s pick in `round` is taken by a keeper.
    pub fn is_reserved(&self, team: TeamId, round: u32) -> bool {
        self.reservations
            .get(&team)
            .is_some_and(|r| r.round == round)
    }

    pub fn is_slot_reserved(&self, slot: &PickSlot) -> bool {
        self.is_reserved(slot.team, slot.round)
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeeperReservation> {
        self.reservations.values()
    }

    pub fn len(&self) -> usize {
        self.reservations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reservations.is_empty()
    }
}
