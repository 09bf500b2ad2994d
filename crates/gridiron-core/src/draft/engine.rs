// Draft engine: pick history, per-team rosters, and turn order.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::order;
use super::player::{Player, PlayerFilter, PlayerId, PlayerPool};
use super::position::SlotCategory;
use super::roster::Roster;
use crate::config::LeagueConfig;
use crate::error::DraftError;

/// A completed pick. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pick {
    /// Overall pick number (1-indexed).
    pub overall: u32,
    pub round: u32,
    /// Position within the round, 1..=T.
    pub slot: u8,
    /// Draft slot of the team that made the pick.
    pub team: u8,
    pub player_id: PlayerId,
    /// Roster category the player was placed in.
    pub category: SlotCategory,
    /// Logical clock value at the time of the pick.
    pub timestamp: u64,
}

/// The state of a single team during the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamState {
    /// Draft slot, 1..=T.
    pub slot: u8,
    pub roster: Roster,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DraftStatus {
    InProgress,
    Complete,
}

/// Who picks after a successful `make_pick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextUp {
    OnTheClock(u8),
    DraftComplete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickOutcome {
    pub pick: Pick,
    pub next: NextUp,
}

/// Overall progress of the draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftProgress {
    /// Next outstanding pick; `None` once complete.
    pub current_pick: Option<u32>,
    pub current_round: Option<u32>,
    pub on_the_clock: Option<u8>,
    pub picks_made: u32,
    pub picks_remaining: u32,
    pub total_picks: u32,
    pub total_rounds: u32,
    pub status: DraftStatus,
}

/// One cell of the draft board: a pick slot and who filled it, if anyone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickInfo {
    pub overall: u32,
    pub round: u32,
    pub slot: u8,
    pub team: u8,
    /// `round.slot` label, e.g. "3.07".
    pub label: String,
    /// Whether the pick belongs to the user's draft position.
    pub is_mine: bool,
    pub player_id: Option<PlayerId>,
}

/// The complete state of one draft.
///
/// The pick list is the source of truth: rosters, availability and the
/// current turn can all be rebuilt by replaying it (see `from_snapshot`).
#[derive(Debug, Clone)]
pub struct DraftEngine {
    config: LeagueConfig,
    pool: PlayerPool,
    /// Indexed by draft slot - 1.
    teams: Vec<TeamState>,
    picks: Vec<Pick>,
    /// Advances on every accepted pick or undo.
    clock: u64,
}

impl DraftEngine {
    /// Start a draft with a validated league config and a player pool.
    pub fn new(config: LeagueConfig, pool: PlayerPool) -> Result<Self, DraftError> {
        config.validate()?;
        let teams = build_teams(&config);
        info!(
            "Draft configured: {} ({} teams, {:?}, {} rounds, {} players)",
            config.name,
            config.num_teams,
            config.draft_type,
            config.rounds(),
            pool.len()
        );
        Ok(DraftEngine {
            config,
            pool,
            teams,
            picks: Vec::new(),
            clock: 0,
        })
    }

    /// Replace the league config. Only allowed before the first pick.
    pub fn reconfigure(&mut self, config: LeagueConfig) -> Result<(), DraftError> {
        if !self.picks.is_empty() {
            warn!("Rejected reconfiguration after {} picks", self.picks.len());
            return Err(DraftError::ConfigLocked);
        }
        config.validate()?;
        self.teams = build_teams(&config);
        info!(
            "Draft reconfigured: {} teams, {:?}",
            config.num_teams, config.draft_type
        );
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &LeagueConfig {
        &self.config
    }

    pub fn pool(&self) -> &PlayerPool {
        &self.pool
    }

    /// All picks in order.
    pub fn picks(&self) -> &[Pick] {
        &self.picks
    }

    pub fn teams(&self) -> &[TeamState] {
        &self.teams
    }

    pub fn team(&self, slot: u8) -> Result<&TeamState, DraftError> {
        slot.checked_sub(1)
            .and_then(|i| self.teams.get(usize::from(i)))
            .ok_or(DraftError::UnknownTeam(slot))
    }

    pub fn total_picks(&self) -> u32 {
        self.config.total_picks()
    }

    pub fn status(&self) -> DraftStatus {
        if self.picks.len() as u32 >= self.total_picks() {
            DraftStatus::Complete
        } else {
            DraftStatus::InProgress
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status() == DraftStatus::Complete
    }

    /// The next outstanding pick number, or `None` once complete.
    pub fn current_pick(&self) -> Option<u32> {
        let next = self.picks.len() as u32 + 1;
        (next <= self.total_picks()).then_some(next)
    }

    /// Team on the clock for overall pick `pick`.
    pub fn team_on_clock(&self, pick: u32) -> Result<u8, DraftError> {
        if pick == 0 || pick > self.total_picks() {
            return Err(DraftError::DraftComplete);
        }
        Ok(order::team_on_clock(
            pick,
            self.config.num_teams,
            self.config.draft_type,
        ))
    }

    /// Team whose turn it currently is.
    pub fn on_the_clock(&self) -> Option<u8> {
        self.current_pick()
            .map(|p| order::team_on_clock(p, self.config.num_teams, self.config.draft_type))
    }

    /// Whether the user's draft position is on the clock.
    pub fn is_my_turn(&self) -> bool {
        self.on_the_clock() == Some(self.config.my_position)
    }

    /// Smallest pick number after `from_pick` at which `team` is on the clock.
    ///
    /// Fails with `DraftComplete` when the team has no such pick left.
    pub fn next_pick_for_team(&self, team: u8, from_pick: u32) -> Result<u32, DraftError> {
        self.team(team)?;
        if from_pick >= self.total_picks() {
            return Err(DraftError::DraftComplete);
        }
        let next = order::next_pick_for_team(
            team,
            from_pick,
            self.config.num_teams,
            self.config.draft_type,
            self.total_picks(),
        );
        debug!("Next pick for team {} after {}: {:?}", team, from_pick, next);
        next.ok_or(DraftError::DraftComplete)
    }

    /// Up to `count` upcoming pick numbers for `team`, starting at the
    /// current pick.
    pub fn upcoming_picks(&self, team: u8, count: usize) -> Result<Vec<u32>, DraftError> {
        self.team(team)?;
        let mut from = self.picks.len() as u32;
        let mut upcoming = Vec::with_capacity(count);
        while upcoming.len() < count {
            match self.next_pick_for_team(team, from) {
                Ok(pick) => {
                    upcoming.push(pick);
                    from = pick;
                }
                Err(_) => break,
            }
        }
        Ok(upcoming)
    }

    /// The user's next pick at or after the current pick.
    pub fn my_next_pick(&self) -> Option<u32> {
        self.next_pick_for_team(self.config.my_position, self.picks.len() as u32)
            .ok()
    }

    /// Round, slot, team and (if made) player for overall pick `pick`.
    pub fn pick_info(&self, pick: u32) -> Result<PickInfo, DraftError> {
        let team = self.team_on_clock(pick)?;
        let teams = self.config.num_teams;
        Ok(PickInfo {
            overall: pick,
            round: order::round_of(pick, teams),
            slot: order::slot_in_round(pick, teams),
            team,
            label: order::pick_label(pick, teams),
            is_mine: team == self.config.my_position,
            player_id: self
                .picks
                .get(pick as usize - 1)
                .map(|p| p.player_id),
        })
    }

    /// The cells of `round` in draft order.
    pub fn board_round(&self, round: u32) -> Result<Vec<PickInfo>, DraftError> {
        if round == 0 || round > self.config.rounds() {
            return Err(DraftError::DraftComplete);
        }
        let teams = self.config.num_teams;
        (1..=teams)
            .map(|slot| self.pick_info(order::overall_pick(round, slot, teams)))
            .collect()
    }

    pub fn progress(&self) -> DraftProgress {
        let current_pick = self.current_pick();
        let picks_made = self.picks.len() as u32;
        DraftProgress {
            current_pick,
            current_round: current_pick.map(|p| order::round_of(p, self.config.num_teams)),
            on_the_clock: self.on_the_clock(),
            picks_made,
            picks_remaining: self.total_picks() - picks_made,
            total_picks: self.total_picks(),
            total_rounds: self.config.rounds(),
            status: self.status(),
        }
    }

    /// Draft `player_id` for `team`.
    ///
    /// Either the pick is recorded (player marked drafted, roster grown, pick
    /// appended) or nothing changes.
    pub fn make_pick(&mut self, team: u8, player_id: PlayerId) -> Result<PickOutcome, DraftError> {
        let result = self.try_make_pick(team, player_id);
        if let Err(e) = &result {
            warn!("Rejected pick of player {} by team {}: {}", player_id, team, e);
        }
        result
    }

    fn try_make_pick(&mut self, team: u8, player_id: PlayerId) -> Result<PickOutcome, DraftError> {
        let overall = self.current_pick().ok_or(DraftError::DraftComplete)?;
        let teams = self.config.num_teams;
        let on_clock = order::team_on_clock(overall, teams, self.config.draft_type);
        if team != on_clock {
            return Err(DraftError::NotOnClock { team, on_clock });
        }

        let player = self.pool.lookup(player_id)?;
        let position = player.position;
        let idx = usize::from(team) - 1;
        let category = self.teams[idx]
            .roster
            .placement_for(position)
            .ok_or(DraftError::RosterFull {
                team,
                player: player_id,
            })?;

        // First mutation; everything after it cannot fail.
        self.pool.mark_drafted(player_id)?;
        let placed = self.teams[idx].roster.add(category, player_id);
        debug_assert!(placed, "placement_for returned a full category");

        self.clock += 1;
        let pick = Pick {
            overall,
            round: order::round_of(overall, teams),
            slot: order::slot_in_round(overall, teams),
            team,
            player_id,
            category,
            timestamp: self.clock,
        };
        self.picks.push(pick.clone());

        let next = match self.on_the_clock() {
            Some(team) => NextUp::OnTheClock(team),
            None => NextUp::DraftComplete,
        };
        info!(
            "Pick {} ({}): team {} took player {} at {}; next: {:?}",
            overall,
            order::pick_label(overall, teams),
            team,
            player_id,
            category,
            next
        );
        if next == NextUp::DraftComplete {
            info!("Draft complete after {} picks", overall);
        }

        Ok(PickOutcome { pick, next })
    }

    /// Reverse the most recent pick: the player becomes available again and
    /// leaves the roster category it was placed in.
    pub fn undo_last_pick(&mut self) -> Result<Pick, DraftError> {
        let pick = self.picks.pop().ok_or(DraftError::NoPicksToUndo)?;
        self.pool.restore(pick.player_id);
        let removed = self.teams[usize::from(pick.team) - 1]
            .roster
            .remove(pick.category, pick.player_id);
        debug_assert!(removed, "undone pick missing from roster");
        self.clock += 1;
        info!(
            "Undid pick {}: team {} released player {}",
            pick.overall, pick.team, pick.player_id
        );
        Ok(pick)
    }

    pub fn roster(&self, team: u8) -> Result<&Roster, DraftError> {
        self.team(team).map(|t| &t.roster)
    }

    /// Players on `team`'s roster, in lineup order.
    pub fn team_players(&self, team: u8) -> Result<Vec<&Player>, DraftError> {
        let roster = self.roster(team)?;
        roster.player_ids().map(|id| self.pool.lookup(id)).collect()
    }

    /// Remaining count per category to reach each configured minimum.
    pub fn team_needs(&self, team: u8) -> Result<BTreeMap<SlotCategory, u32>, DraftError> {
        Ok(self.roster(team)?.needs())
    }

    /// Bye weeks shared by two or more players on `team`, with those players.
    pub fn bye_week_breakdown(
        &self,
        team: u8,
    ) -> Result<BTreeMap<u8, Vec<PlayerId>>, DraftError> {
        let mut by_week: BTreeMap<u8, Vec<PlayerId>> = BTreeMap::new();
        for player in self.team_players(team)? {
            if let Some(week) = player.bye_week {
                by_week.entry(week).or_default().push(player.id);
            }
        }
        by_week.retain(|_, players| players.len() > 1);
        Ok(by_week)
    }

    /// Bye weeks shared by two or more players on `team`.
    pub fn bye_week_conflicts(&self, team: u8) -> Result<BTreeSet<u8>, DraftError> {
        Ok(self.bye_week_breakdown(team)?.into_keys().collect())
    }

    /// Undrafted players matching `filter`, best rank first.
    pub fn available<'a>(
        &'a self,
        filter: &'a PlayerFilter,
    ) -> impl Iterator<Item = &'a Player> + 'a {
        self.pool.available(filter)
    }

    pub fn clock(&self) -> u64 {
        self.clock
    }
}

fn build_teams(config: &LeagueConfig) -> Vec<TeamState> {
    (1..=config.num_teams)
        .map(|slot| TeamState {
            slot,
            roster: Roster::new(&config.roster),
        })
        .collect()
}
