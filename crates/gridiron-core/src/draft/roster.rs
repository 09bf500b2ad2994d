// Roster construction and slot-category assignment.

use std::collections::BTreeMap;

use tracing::debug;

use super::player::PlayerId;
use super::position::{Position, SlotCategory};
use crate::config::SlotLimits;

/// A team's roster: drafted player ids grouped by category, each category
/// capped at its configured maximum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    limits: BTreeMap<SlotCategory, SlotLimits>,
    /// Players per category in the order they were drafted.
    slots: BTreeMap<SlotCategory, Vec<PlayerId>>,
}

impl Roster {
    /// Create an empty roster from the league's roster config.
    pub fn new(roster_config: &BTreeMap<SlotCategory, SlotLimits>) -> Self {
        Roster {
            limits: roster_config.clone(),
            slots: roster_config.keys().map(|&cat| (cat, Vec::new())).collect(),
        }
    }

    /// Remaining capacity in `category`.
    pub fn open_slots(&self, category: SlotCategory) -> u32 {
        let max = self.limits.get(&category).map_or(0, |l| l.max);
        max.saturating_sub(self.filled(category))
    }

    pub fn has_room(&self, category: SlotCategory) -> bool {
        self.open_slots(category) > 0
    }

    /// Category a player at `pos` would land in.
    ///
    /// Priority:
    /// 1. Dedicated position category
    /// 2. FLEX (RB/WR/TE only)
    /// 3. BENCH
    ///
    /// Returns `None` if every candidate is full.
    pub fn placement_for(&self, pos: Position) -> Option<SlotCategory> {
        [pos.category(), SlotCategory::Flex, SlotCategory::Bench]
            .into_iter()
            .find(|&cat| cat.accepts(pos) && self.has_room(cat))
    }

    /// Append a player to `category`. Callers pick the category with
    /// `placement_for`; returns `false` if the category is full.
    pub fn add(&mut self, category: SlotCategory, id: PlayerId) -> bool {
        if !self.has_room(category) {
            return false;
        }
        debug!("Placing player {} in {}", id, category);
        self.slots.entry(category).or_default().push(id);
        true
    }

    /// Remove a player from `category`. Returns `false` if it was not there.
    pub fn remove(&mut self, category: SlotCategory, id: PlayerId) -> bool {
        let Some(players) = self.slots.get_mut(&category) else {
            return false;
        };
        match players.iter().rposition(|&p| p == id) {
            Some(idx) => {
                players.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Players in `category`, in draft order.
    pub fn players_in(&self, category: SlotCategory) -> &[PlayerId] {
        self.slots.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn filled(&self, category: SlotCategory) -> u32 {
        self.players_in(category).len() as u32
    }

    /// Every category with its players, in lineup order.
    pub fn categories(&self) -> &BTreeMap<SlotCategory, Vec<PlayerId>> {
        &self.slots
    }

    /// All rostered players, grouped by category in lineup order.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.slots.values().flatten().copied()
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.player_ids().any(|p| p == id)
    }

    /// Number of rostered players.
    pub fn filled_count(&self) -> usize {
        self.slots.values().map(Vec::len).sum()
    }

    /// Per category, how many more players are needed to reach its minimum.
    pub fn needs(&self) -> BTreeMap<SlotCategory, u32> {
        self.limits
            .iter()
            .map(|(&cat, limits)| (cat, limits.min.saturating_sub(self.filled(cat))))
            .collect()
    }
}
