// Positional supply and scarcity.
//
// For each position, compares the undrafted players left against how many
// starters the league still has to fill there, and rates how urgently a
// drafter should address the position.

use serde::Serialize;

use super::engine::DraftEngine;
use super::player::{PlayerFilter, PlayerId};
use super::position::Position;

// ---------------------------------------------------------------------------
// Scarcity urgency levels
// ---------------------------------------------------------------------------

/// How urgently a position needs to be addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ScarcityUrgency {
    /// 0-2 spare players: act now or miss out.
    Critical,
    /// 3-4 spare players: should address soon.
    High,
    /// 5-7 spare players: comfortable window.
    Medium,
    /// 8+ spare players: no rush.
    Low,
}

impl ScarcityUrgency {
    /// Determine urgency from the number of available players beyond what the
    /// league still needs at a position.
    pub fn from_surplus(surplus: i64) -> Self {
        match surplus {
            i64::MIN..=2 => ScarcityUrgency::Critical,
            3..=4 => ScarcityUrgency::High,
            5..=7 => ScarcityUrgency::Medium,
            _ => ScarcityUrgency::Low,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScarcityUrgency::Critical => "CRITICAL",
            ScarcityUrgency::High => "HIGH",
            ScarcityUrgency::Medium => "MEDIUM",
            ScarcityUrgency::Low => "LOW",
        }
    }
}

// ---------------------------------------------------------------------------
// Supply entry
// ---------------------------------------------------------------------------

/// Supply analysis for a single position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionSupply {
    pub position: Position,
    /// Undrafted players at this position.
    pub available: usize,
    /// Unfilled minimum slots for this position's category, summed over all teams.
    pub demand: u32,
    /// `available - demand`; negative when the pool cannot cover the league.
    pub surplus: i64,
    /// Best-ranked undrafted player, if any.
    pub top_available: Option<PlayerId>,
    /// Projected points of the best available minus the 3rd-best (or the
    /// worst, if fewer than 3 remain).
    pub dropoff: f64,
    pub urgency: ScarcityUrgency,
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Compute supply for every position, most urgent first, then by steepest
/// dropoff.
pub fn positional_supply(engine: &DraftEngine) -> Vec<PositionSupply> {
    let mut entries: Vec<PositionSupply> = Position::ALL
        .iter()
        .map(|&pos| supply_for(engine, pos))
        .collect();

    entries.sort_by(|a, b| {
        a.urgency.cmp(&b.urgency).then_with(|| {
            b.dropoff
                .partial_cmp(&a.dropoff)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    });
    entries
}

fn supply_for(engine: &DraftEngine, position: Position) -> PositionSupply {
    let filter = PlayerFilter::default().position(position);
    let mut available = 0usize;
    let mut top_available = None;
    let mut top_points = 0.0;
    let mut third_points = None;
    let mut last_points = 0.0;
    for player in engine.available(&filter) {
        available += 1;
        if available == 1 {
            top_available = Some(player.id);
            top_points = player.projected_points;
        }
        if available == 3 {
            third_points = Some(player.projected_points);
        }
        last_points = player.projected_points;
    }
    let dropoff = if available == 0 {
        0.0
    } else {
        top_points - third_points.unwrap_or(last_points)
    };

    let category = position.category();
    let demand: u32 = engine
        .teams()
        .iter()
        .map(|t| t.roster.needs().get(&category).copied().unwrap_or(0))
        .sum();
    let surplus = available as i64 - i64::from(demand);

    PositionSupply {
        position,
        available,
        demand,
        surplus,
        top_available,
        dropoff,
        urgency: ScarcityUrgency::from_surplus(surplus),
    }
}

/// Look up the supply entry for a given position.
pub fn supply_for_position(
    supply: &[PositionSupply],
    position: Position,
) -> Option<&PositionSupply> {
    supply.iter().find(|e| e.position == position)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::scenario_config;
    use crate::config::DraftType;
    use crate::draft::engine::tests::test_pool;

    #[test]
    fn urgency_thresholds() {
        assert_eq!(ScarcityUrgency::from_surplus(-4), ScarcityUrgency::Critical);
        assert_eq!(ScarcityUrgency::from_surplus(2), ScarcityUrgency::Critical);
        assert_eq!(ScarcityUrgency::from_surplus(3), ScarcityUrgency::High);
        assert_eq!(ScarcityUrgency::from_surplus(7), ScarcityUrgency::Medium);
        assert_eq!(ScarcityUrgency::from_surplus(8), ScarcityUrgency::Low);
        assert_eq!(ScarcityUrgency::Critical.label(), "CRITICAL");
    }

    #[test]
    fn supply_counts_demand_across_teams() {
        let engine = DraftEngine::new(scenario_config(DraftType::Snake), test_pool()).unwrap();
        let supply = positional_supply(&engine);
        assert_eq!(supply.len(), Position::ALL.len());

        // 10 QBs for 12 teams needing one each
        let qb = supply_for_position(&supply, Position::Quarterback).unwrap();
        assert_eq!(qb.available, 10);
        assert_eq!(qb.demand, 12);
        assert_eq!(qb.surplus, -2);
        assert_eq!(qb.urgency, ScarcityUrgency::Critical);
        assert_eq!(qb.top_available, Some(PlayerId(1)));
        // projected = 300 - rank; 1st vs 3rd
        assert!((qb.dropoff - 2.0).abs() < f64::EPSILON);

        // No kickers in the pool and none required
        let k = supply_for_position(&supply, Position::Kicker).unwrap();
        assert_eq!(k.available, 0);
        assert_eq!(k.demand, 0);
        assert_eq!(k.top_available, None);
        assert_eq!(k.dropoff, 0.0);
    }

    #[test]
    fn picks_reduce_supply_and_demand() {
        let mut engine =
            DraftEngine::new(scenario_config(DraftType::Snake), test_pool()).unwrap();
        engine.make_pick(1, PlayerId(1)).unwrap();
        let supply = positional_supply(&engine);
        let qb = supply_for_position(&supply, Position::Quarterback).unwrap();
        assert_eq!(qb.available, 9);
        assert_eq!(qb.demand, 11);
        assert_eq!(qb.top_available, Some(PlayerId(2)));
    }

    #[test]
    fn most_urgent_first() {
        let engine = DraftEngine::new(scenario_config(DraftType::Snake), test_pool()).unwrap();
        let supply = positional_supply(&engine);
        for pair in supply.windows(2) {
            assert!(pair[0].urgency <= pair[1].urgency);
        }
    }
}
