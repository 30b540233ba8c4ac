// Available-player pool, keyed by a stable surrogate id with a name index.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::pick::Position;

/// Stable identity of a player within one draft session, assigned at import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

/// A draftable player record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    /// Overall ranking from the imported cheat sheet (lower is better).
    pub rank: u32,
    pub name: String,
    /// NFL team abbreviation (e.g. "MIN").
    pub team: String,
    pub position: Position,
    pub bye_week: Option<u8>,
    /// Projected fantasy points, when the sheet carries them.
    #[serde(default)]
    pub proj_pts: Option<f64>,
    #[serde(default)]
    pub tier: Option<u32>,
}

/// The undrafted players.
///
/// Shrinks as players are drafted or kept and grows only when an undo
/// returns a player.
#[derive(Debug, Clone, Default)]
pub struct PlayerPool {
    players: HashMap<PlayerId, Player>,
    /// Lowercased display name -> ids sharing that name.
    by_name: HashMap<String, BTreeSet<PlayerId>>,
}

impl PlayerPool {
    pub fn new(players: impl IntoIterator<Item = Player>) -> Self {
        let mut pool = PlayerPool::default();
        for player in players {
            pool.insert(player);
        }
        pool
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.players.contains_key(&id)
    }

    /// Look up a player by display name.
    ///
    /// An exact (trimmed) match wins; otherwise falls back to a
    /// case-insensitive match. Among duplicates the lowest id is returned.
    pub fn find_by_name(&self, name: &str) -> Option<&Player> {
        let name = name.trim();
        let ids = self.by_name.get(&name_key(name))?;
        ids.iter()
            .filter_map(|id| self.players.get(id))
            .find(|p| p.name == name)
            .or_else(|| ids.iter().find_map(|id| self.players.get(id)))
    }

    /// Remove a player from the pool, returning the record.
    pub fn remove(&mut self, id: PlayerId) -> Option<Player> {
        let player = self.players.remove(&id)?;
        let key = name_key(&player.name);
        if let Some(ids) = self.by_name.get_mut(&key) {
            ids.remove(&id);
            if ids.is_empty() {
                self.by_name.remove(&key);
            }
        }
        Some(player)
    }

    /// Insert (or reinsert) a player. Replaces any record with the same id.
    pub fn insert(&mut self, player: Player) {
        if let Some(previous) = self.remove(player.id) {
            warn!("replacing pool record for player id {}", previous.id.0);
        }
        self.by_name
            .entry(name_key(&player.name))
            .or_default()
            .insert(player.id);
        self.players.insert(player.id, player);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    /// Best available players, ordered by rank, optionally restricted to one
    /// position.
    pub fn available(&self, position: Option<Position>, limit: usize) -> Vec<&Player> {
        let mut players: Vec<&Player> = self
            .players
            .values()
            .filter(|p| position.map_or(true, |pos| p.position == pos))
            .collect();
        players.sort_by_key(|p| (p.rank, p.id));
        players.truncate(limit);
        players
    }

    /// Players whose name or NFL team contains `query`, case-insensitively,
    /// ordered by rank. A blank query matches nothing.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Player> {
        let needle = name_key(query);
        if needle.is_empty() {
            return Vec::new();
        }
        let mut players: Vec<&Player> = self
            .players
            .values()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle) || p.team.to_lowercase().contains(&needle)
            })
            .collect();
        players.sort_by_key(|p| (p.rank, p.id));
        players.truncate(limit);
        players
    }
}

fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}
