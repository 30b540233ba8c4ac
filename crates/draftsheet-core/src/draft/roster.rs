// Per-team rosters: an ordered ledger of drafted players and keepers.

use serde::{Deserialize, Serialize};

use super::pick::{PickSlot, TeamId};
use super::pool::Player;
use super::DraftError;

/// A player acquired by a team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub round: u32,
    /// Pick number within the round. Absent for a keeper until the draft
    /// reaches the keeper's slot.
    pub pick_in_round: Option<u32>,
    /// Overall pick index. Absent for keepers.
    pub pick_number: Option<u32>,
    /// Snapshot of the player at acquisition time.
    pub player: Player,
    pub is_keeper: bool,
}

impl RosterEntry {
    /// Entry for a player taken with a live pick.
    pub fn drafted(slot: &PickSlot, player: Player) -> Self {
        RosterEntry {
            round: slot.round,
            pick_in_round: Some(slot.pick_in_round),
            pick_number: Some(slot.pick),
            player,
            is_keeper: false,
        }
    }

    /// Entry for a pre-draft keeper.
    pub fn keeper(round: u32, player: Player) -> Self {
        RosterEntry {
            round,
            pick_in_round: None,
            pick_number: None,
            player,
            is_keeper: true,
        }
    }
}

/// Rosters for every team in the draft.
#[derive(Debug, Clone, Default)]
pub struct RosterBook {
    rosters: Vec<Vec<RosterEntry>>,
}

impl RosterBook {
    pub fn new(team_count: u32) -> Self {
        RosterBook {
            rosters: vec![Vec::new(); team_count as usize],
        }
    }

    pub fn team_count(&self) -> u32 {
        self.rosters.len() as u32
    }

    /// The entries for `team` in acquisition order.
    pub fn roster(&self, team: TeamId) -> Result<&[RosterEntry], DraftError> {
        self.slot(team).map(|idx| self.rosters[idx].as_slice())
    }

    pub fn append(&mut self, team: TeamId, entry: RosterEntry) -> Result<(), DraftError> {
        let idx = self.slot(team)?;
        self.rosters[idx].push(entry);
        Ok(())
    }

    /// Most recent entry for `team`, if any.
    pub fn last(&self, team: TeamId) -> Option<&RosterEntry> {
        self.roster(team).ok().and_then(|entries| entries.last())
    }

    /// Remove and return the most recent entry for `team`.
    pub fn pop_last(&mut self, team: TeamId) -> Result<RosterEntry, DraftError> {
        let idx = self.slot(team)?;
        self.rosters[idx]
            .pop()
            .ok_or(DraftError::EmptyRoster { team })
    }

    /// Fill in a keeper's pick number once the draft reaches its slot.
    ///
    /// Returns `true` if an unresolved keeper entry was updated.
    pub fn resolve_keeper_pick(&mut self, team: TeamId, round: u32, pick_in_round: u32) -> bool {
        let Ok(idx) = self.slot(team) else {
            return false;
        };
        match self.rosters[idx]
            .iter_mut()
            .find(|e| e.is_keeper && e.round == round && e.pick_in_round.is_none())
        {
            Some(entry) => {
                entry.pick_in_round = Some(pick_in_round);
                true
            }
            None => false,
        }
    }

    /// Whether any team holds a live (non-keeper) pick.
    pub fn has_live_picks(&self) -> bool {
        self.rosters.iter().flatten().any(|e| !e.is_keeper)
    }

    /// Whether every roster is empty (keepers included).
    pub fn is_empty(&self) -> bool {
        self.rosters.iter().all(Vec::is_empty)
    }

    /// Total entries across all teams.
    pub fn total_entries(&self) -> usize {
        self.rosters.iter().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TeamId, &[RosterEntry])> {
        self.rosters
            .iter()
            .enumerate()
            .map(|(idx, entries)| (TeamId(idx as u32 + 1), entries.as_slice()))
    }

    fn slot(&self, team: TeamId) -> Result<usize, DraftError> {
        if team.0 >= 1 && team.0 <= self.team_count() {
            Ok(team.index())
        } else {
            Err(DraftError::UnknownTeam {
                team,
                team_count: self.team_count(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::pick::{decompose_pick, Position};
    use crate::draft::pool::tests::player;

    #[test]
    fn new_book_has_empty_roster_per_team() {
        let book = RosterBook::new(4);
        assert_eq!(book.team_count(), 4);
        assert!(book.is_empty());
        assert!(!book.has_live_picks());
        for (_, entries) in book.iter() {
            assert!(entries.is_empty());
        }
    }

    #[test]
    fn append_and_pop_last() {
        let mut book = RosterBook::new(2);
        let slot = decompose_pick(3, 2);
        book.append(slot.team, RosterEntry::drafted(&slot, player(1, "A", Position::Quarterback)))
            .unwrap();
        assert_eq!(book.roster(TeamId(2)).unwrap().len(), 1);
        assert!(book.has_live_picks());

        let entry = book.pop_last(TeamId(2)).unwrap();
        assert_eq!(entry.round, 2);
        assert_eq!(entry.pick_in_round, Some(1));
        assert_eq!(entry.pick_number, Some(3));
        assert!(book.is_empty());
    }

    #[test]
    fn pop_last_on_empty_roster_fails() {
        let mut book = RosterBook::new(2);
        assert_eq!(
            book.pop_last(TeamId(1)),
            Err(DraftError::EmptyRoster { team: TeamId(1) })
        );
    }

    #[test]
    fn unknown_team_rejected() {
        let mut book = RosterBook::new(2);
        let entry = RosterEntry::keeper(1, player(1, "A", Position::RunningBack));
        assert_eq!(
            book.append(TeamId(3), entry),
            Err(DraftError::UnknownTeam { team: TeamId(3), team_count: 2 })
        );
        assert!(book.roster(TeamId(0)).is_err());
        assert!(book.last(TeamId(9)).is_none());
    }

    #[test]
    fn keeper_pick_resolves_once() {
        let mut book = RosterBook::new(4);
        book.append(TeamId(2), RosterEntry::keeper(2, player(5, "K", Position::RunningBack)))
            .unwrap();
        assert!(!book.has_live_picks());
        assert!(!book.is_empty());

        assert!(!book.resolve_keeper_pick(TeamId(2), 3, 3));
        assert!(book.resolve_keeper_pick(TeamId(2), 2, 3));
        assert!(!book.resolve_keeper_pick(TeamId(2), 2, 4));
        assert_eq!(book.last(TeamId(2)).unwrap().pick_in_round, Some(3));
    }

    #[test]
    fn total_entries_counts_every_team() {
        let mut book = RosterBook::new(3);
        book.append(TeamId(1), RosterEntry::keeper(1, player(1, "A", Position::Kicker)))
            .unwrap();
        book.append(TeamId(3), RosterEntry::keeper(4, player(2, "B", Position::Defense)))
            .unwrap();
        assert_eq!(book.total_entries(), 2);
    }
}
