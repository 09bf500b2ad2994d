// Player catalog and availability tracking.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::position::Position;
use crate::error::DraftError;

/// Stable identifier of a player in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A draftable player. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub position: Position,
    /// NFL team abbreviation (e.g. "BUF").
    pub nfl_team: String,
    /// Week 1-18, or `None` when unknown.
    pub bye_week: Option<u8>,
    /// Overall rank; lower is better.
    pub rank: u32,
    pub projected_points: f64,
}

/// Optional constraints applied to `PlayerPool::available`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerFilter {
    pub position: Option<Position>,
    pub nfl_team: Option<String>,
    /// Case-insensitive substring of the player's name.
    pub name_contains: Option<String>,
}

impl PlayerFilter {
    pub fn position(mut self, pos: Position) -> Self {
        self.position = Some(pos);
        self
    }

    pub fn nfl_team(mut self, team: &str) -> Self {
        self.nfl_team = Some(team.to_string());
        self
    }

    pub fn name_contains(mut self, needle: &str) -> Self {
        self.name_contains = Some(needle.to_lowercase());
        self
    }

    pub fn matches(&self, player: &Player) -> bool {
        if self.position.is_some_and(|pos| pos != player.position) {
            return false;
        }
        if let Some(team) = &self.nfl_team {
            if !player.nfl_team.eq_ignore_ascii_case(team) {
                return false;
            }
        }
        if let Some(needle) = &self.name_contains {
            if !player.name.to_lowercase().contains(&needle.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

/// Valid NFL bye weeks.
pub const BYE_WEEKS: std::ops::RangeInclusive<u8> = 1..=18;

/// Catalog of draftable players plus the set already drafted.
///
/// The catalog is shared behind an `Arc`, so cloning a pool (e.g. for a
/// published snapshot) only copies the drafted set.
#[derive(Debug, Clone)]
pub struct PlayerPool {
    /// All players, sorted by (rank, id).
    catalog: Arc<Vec<Player>>,
    /// Player id -> index into `catalog`.
    index: Arc<HashMap<PlayerId, usize>>,
    drafted: HashSet<PlayerId>,
}

impl PlayerPool {
    /// Build a pool from a static dataset. Every player starts available.
    ///
    /// Rejects duplicate ids and bye weeks outside 1..=18.
    pub fn new(mut players: Vec<Player>) -> Result<Self, DraftError> {
        players.sort_by(|a, b| a.rank.cmp(&b.rank).then(a.id.cmp(&b.id)));

        let mut index = HashMap::with_capacity(players.len());
        for (i, player) in players.iter().enumerate() {
            if let Some(week) = player.bye_week {
                if !BYE_WEEKS.contains(&week) {
                    return Err(DraftError::InvalidPlayer {
                        id: player.id,
                        reason: format!("bye week must be between 1 and 18, got {week}"),
                    });
                }
            }
            if index.insert(player.id, i).is_some() {
                return Err(DraftError::InvalidPlayer {
                    id: player.id,
                    reason: "duplicate player id".into(),
                });
            }
        }

        Ok(PlayerPool {
            catalog: Arc::new(players),
            index: Arc::new(index),
            drafted: HashSet::new(),
        })
    }

    /// Undrafted players matching `filter`, best rank first (ties broken by
    /// lower id). Calling again restarts from the top.
    pub fn available<'a>(
        &'a self,
        filter: &'a PlayerFilter,
    ) -> impl Iterator<Item = &'a Player> + 'a {
        self.catalog
            .iter()
            .filter(move |p| !self.drafted.contains(&p.id) && filter.matches(p))
    }

    /// Look up a player by id, drafted or not.
    pub fn lookup(&self, id: PlayerId) -> Result<&Player, DraftError> {
        self.index
            .get(&id)
            .map(|&i| &self.catalog[i])
            .ok_or(DraftError::UnknownPlayer(id))
    }

    /// Move a player from available to drafted.
    pub fn mark_drafted(&mut self, id: PlayerId) -> Result<(), DraftError> {
        if !self.index.contains_key(&id) {
            return Err(DraftError::UnknownPlayer(id));
        }
        if !self.drafted.insert(id) {
            return Err(DraftError::AlreadyDrafted(id));
        }
        Ok(())
    }

    /// Return a drafted player to availability. Only the engine's undo path
    /// calls this.
    pub(crate) fn restore(&mut self, id: PlayerId) -> bool {
        self.drafted.remove(&id)
    }

    /// A copy of this pool with every player available again.
    pub fn reset(&self) -> Self {
        PlayerPool {
            catalog: Arc::clone(&self.catalog),
            index: Arc::clone(&self.index),
            drafted: HashSet::new(),
        }
    }

    pub fn is_drafted(&self, id: PlayerId) -> bool {
        self.drafted.contains(&id)
    }

    pub fn drafted_ids(&self) -> &HashSet<PlayerId> {
        &self.drafted
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    pub fn available_count(&self) -> usize {
        self.catalog.len() - self.drafted.len()
    }
}
