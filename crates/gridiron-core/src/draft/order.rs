// Pick-order arithmetic for snake and linear drafts.
//
// Pick numbers are 1-based and overall; team slots are 1-based draft
// positions. All functions are closed-form and assume `pick >= 1` and
// `1 <= team <= teams`; the engine validates ranges before calling in.

use crate::config::DraftType;

/// Round containing `pick` (ceil(pick / teams)).
pub fn round_of(pick: u32, teams: u8) -> u32 {
    debug_assert!(pick >= 1 && teams >= 1);
    (pick - 1) / u32::from(teams) + 1
}

/// Position of `pick` within its round, in 1..=teams.
pub fn slot_in_round(pick: u32, teams: u8) -> u8 {
    let round = round_of(pick, teams);
    (pick - (round - 1) * u32::from(teams)) as u8
}

/// The team slot that picks at slot-within-round `slot` of `round`.
///
/// The mapping is its own inverse: it also gives the slot-within-round at
/// which `team` picks in `round`.
pub fn team_at(round: u32, slot: u8, teams: u8, draft_type: DraftType) -> u8 {
    match draft_type {
        DraftType::Snake if round % 2 == 0 => teams - slot + 1,
        _ => slot,
    }
}

/// The team on the clock for overall pick `pick`.
pub fn team_on_clock(pick: u32, teams: u8, draft_type: DraftType) -> u8 {
    team_at(round_of(pick, teams), slot_in_round(pick, teams), teams, draft_type)
}

/// Overall pick number of `slot` within `round`.
pub fn overall_pick(round: u32, slot: u8, teams: u8) -> u32 {
    (round - 1) * u32::from(teams) + u32::from(slot)
}

/// Smallest pick number greater than `from_pick` at which `team` is on the
/// clock, or `None` if that pick would fall beyond `total_picks`.
///
/// `from_pick` may be 0 to ask for a team's first pick.
pub fn next_pick_for_team(
    team: u8,
    from_pick: u32,
    teams: u8,
    draft_type: DraftType,
    total_picks: u32,
) -> Option<u32> {
    if from_pick >= total_picks {
        return None;
    }
    // Picks past u32::MAX cannot be within `total_picks`.
    let checked_pick = |round: u32| {
        let slot = team_at(round, team, teams, draft_type);
        (round - 1)
            .checked_mul(u32::from(teams))?
            .checked_add(u32::from(slot))
    };
    // Round holding pick `from_pick + 1`.
    let round = from_pick / u32::from(teams) + 1;
    let mut candidate = checked_pick(round)?;
    if candidate <= from_pick {
        candidate = checked_pick(round.checked_add(1)?)?;
    }
    (candidate <= total_picks).then_some(candidate)
}

/// Every overall pick `team` holds across `rounds` rounds.
pub fn picks_for_slot(team: u8, teams: u8, draft_type: DraftType, rounds: u32) -> Vec<u32> {
    (1..=rounds)
        .map(|round| overall_pick(round, team_at(round, team, teams, draft_type), teams))
        .collect()
}

/// Format a pick as `round.slot`, e.g. pick 14 of a 12-team draft is "2.02".
pub fn pick_label(pick: u32, teams: u8) -> String {
    format!("{}.{:02}", round_of(pick, teams), slot_in_round(pick, teams))
}
