// Integration tests for the draft engine.
//
// These exercise the public API end to end: full drafts under both draft
// types, snapshot replay, undo, and concurrent access through DraftSession.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use gridiron_core::config::parse_config;
use gridiron_core::draft::order;
use gridiron_core::draft::snapshot::DraftSnapshot;
use gridiron_core::{
    DraftEngine, DraftError, DraftSession, DraftStatus, DraftType, LeagueConfig, NextUp, Player,
    PlayerFilter, PlayerId, PlayerPool, Position, ScoringFormat, SlotCategory, SlotLimits,
};

// ===========================================================================
// Test helpers
// ===========================================================================

/// Shipped defaults: QB1 RB2 WR2 TE1 FLEX1 K1 DEF1 BENCH 0-6 (15 rounds).
fn default_league(num_teams: u8, draft_type: DraftType) -> LeagueConfig {
    let text = include_str!("../../../defaults/league.toml");
    let mut league = parse_config(text, Path::new("defaults/league.toml"))
        .expect("shipped defaults should load")
        .league;
    league.num_teams = num_teams;
    league.draft_type = draft_type;
    league
}

/// QB1 RB2 WR2 TE1 FLEX1 BENCH5, matching the roster scenario.
fn scenario_league(draft_type: DraftType) -> LeagueConfig {
    let mut roster = BTreeMap::new();
    roster.insert(SlotCategory::Quarterback, SlotLimits::exact(1));
    roster.insert(SlotCategory::RunningBack, SlotLimits::exact(2));
    roster.insert(SlotCategory::WideReceiver, SlotLimits::exact(2));
    roster.insert(SlotCategory::TightEnd, SlotLimits::exact(1));
    roster.insert(SlotCategory::Flex, SlotLimits::exact(1));
    roster.insert(SlotCategory::Bench, SlotLimits::exact(5));
    LeagueConfig {
        name: "Scenario".into(),
        num_teams: 12,
        draft_type,
        scoring: ScoringFormat::Standard,
        my_position: 1,
        total_rounds: None,
        roster,
    }
}

/// `count` players with positions cycling QB, RB, WR, TE, K, DEF.
/// Rank equals id.
fn pool(count: u32) -> PlayerPool {
    let players = (1..=count)
        .map(|id| {
            let position = Position::ALL[(id as usize - 1) % Position::ALL.len()];
            Player {
                id: PlayerId(id),
                name: format!("Player {id}"),
                position,
                nfl_team: "NYJ".into(),
                bye_week: Some((id % 14 + 5) as u8),
                rank: id,
                projected_points: 400.0 - f64::from(id),
            }
        })
        .collect();
    PlayerPool::new(players).expect("generated pool is valid")
}

/// Best-ranked available player the team on the clock can roster.
fn best_fit(engine: &DraftEngine, team: u8) -> PlayerId {
    let roster = engine.roster(team).unwrap();
    engine
        .available(&PlayerFilter::default())
        .find(|p| roster.placement_for(p.position).is_some())
        .map(|p| p.id)
        .expect("pool has a player that fits")
}

/// Draft every remaining pick with `best_fit`.
fn run_full_draft(engine: &mut DraftEngine) {
    while let Some(team) = engine.on_the_clock() {
        let player = best_fit(engine, team);
        engine.make_pick(team, player).unwrap();
    }
}

/// Naive schedule built round by round, independent of `order`.
fn naive_schedule(teams: u8, rounds: u32, draft_type: DraftType) -> Vec<u8> {
    let mut schedule = Vec::new();
    for round in 1..=rounds {
        let mut slots: Vec<u8> = (1..=teams).collect();
        if draft_type == DraftType::Snake && round % 2 == 0 {
            slots.reverse();
        }
        schedule.extend(slots);
    }
    schedule
}

// ===========================================================================
// Pick order
// ===========================================================================

#[test]
fn full_drafts_follow_naive_schedule() {
    for draft_type in [DraftType::Snake, DraftType::Linear] {
        for teams in 8..=16u8 {
            let mut engine =
                DraftEngine::new(default_league(teams, draft_type), pool(400)).unwrap();
            let expected = naive_schedule(teams, 15, draft_type);

            run_full_draft(&mut engine);

            let actual: Vec<u8> = engine.picks().iter().map(|p| p.team).collect();
            assert_eq!(actual, expected, "{draft_type:?} with {teams} teams");
            assert_eq!(engine.status(), DraftStatus::Complete);
        }
    }
}

#[test]
fn every_pick_is_unique_and_numbered() {
    let mut engine = DraftEngine::new(default_league(12, DraftType::Snake), pool(300)).unwrap();
    run_full_draft(&mut engine);

    let mut seen = HashSet::new();
    for (i, pick) in engine.picks().iter().enumerate() {
        assert_eq!(pick.overall, i as u32 + 1);
        assert!(seen.insert(pick.player_id), "player {} drafted twice", pick.player_id);
        assert_eq!(pick.round, order::round_of(pick.overall, 12));
    }
    assert_eq!(seen.len(), 180);

    // Every roster respects its limits and meets its minimums.
    for team in 1..=12u8 {
        let roster = engine.roster(team).unwrap();
        assert_eq!(roster.filled_count(), 15);
        assert!(engine.team_needs(team).unwrap().values().all(|&n| n == 0));
    }
}

#[test]
fn ten_team_snake_boundaries() {
    let mut engine = DraftEngine::new(default_league(10, DraftType::Snake), pool(200)).unwrap();
    assert_eq!(engine.team_on_clock(10), Ok(10));
    assert_eq!(engine.team_on_clock(11), Ok(10));
    assert_eq!(engine.team_on_clock(20), Ok(1));
    assert_eq!(engine.team_on_clock(21), Ok(1));
    assert_eq!(engine.next_pick_for_team(10, 10), Ok(11));
    assert_eq!(engine.next_pick_for_team(1, 1), Ok(20));

    for _ in 0..10 {
        let team = engine.on_the_clock().unwrap();
        let player = best_fit(&engine, team);
        let outcome = engine.make_pick(team, player).unwrap();
        if outcome.pick.overall == 10 {
            assert_eq!(outcome.next, NextUp::OnTheClock(10));
        }
    }
    assert_eq!(engine.on_the_clock(), Some(10));
}

#[test]
fn next_pick_is_draft_complete_after_last_pick() {
    let engine = DraftEngine::new(default_league(8, DraftType::Linear), pool(200)).unwrap();
    assert_eq!(engine.total_picks(), 120);
    assert_eq!(engine.next_pick_for_team(8, 120), Err(DraftError::DraftComplete));
    assert_eq!(engine.next_pick_for_team(8, 112), Ok(120));
}

// ===========================================================================
// Pick rules
// ===========================================================================

#[test]
fn linear_scenario_qb_to_bench_until_full() {
    let mut engine = DraftEngine::new(scenario_league(DraftType::Linear), pool(300)).unwrap();

    // Team 1 takes the best QB every round; everyone else avoids QBs.
    let mut team1_categories = Vec::new();
    for round in 1..=6u32 {
        for team in 1..=12u8 {
            let filter = PlayerFilter::default();
            let roster = engine.roster(team).unwrap();
            let player = engine
                .available(&filter)
                .find(|p| {
                    (p.position == Position::Quarterback) == (team == 1)
                        && roster.placement_for(p.position).is_some()
                })
                .map(|p| p.id)
                .unwrap();
            let outcome = engine.make_pick(team, player).unwrap();
            if team == 1 {
                team1_categories.push(outcome.pick.category);
            }
        }
        assert_eq!(engine.progress().current_round, Some(round + 1));
    }

    assert_eq!(team1_categories[0], SlotCategory::Quarterback);
    assert!(team1_categories[1..].iter().all(|&c| c == SlotCategory::Bench));
    assert_eq!(team1_categories.len(), 6);

    // QB and bench are full now: the next QB is rejected and nothing changes.
    assert_eq!(engine.on_the_clock(), Some(1));
    let picks_before = engine.picks().len();
    let qb = engine
        .available(&PlayerFilter::default().position(Position::Quarterback))
        .next()
        .unwrap()
        .id;
    assert_eq!(
        engine.make_pick(1, qb),
        Err(DraftError::RosterFull { team: 1, player: qb })
    );
    assert_eq!(engine.picks().len(), picks_before);
    assert!(!engine.pool().is_drafted(qb));

    // A running back still fits.
    let rb = engine
        .available(&PlayerFilter::default().position(Position::RunningBack))
        .next()
        .unwrap()
        .id;
    assert_eq!(
        engine.make_pick(1, rb).unwrap().pick.category,
        SlotCategory::RunningBack
    );
}

#[test]
fn drafted_player_cannot_be_taken_by_another_team() {
    let mut engine = DraftEngine::new(scenario_league(DraftType::Snake), pool(300)).unwrap();
    engine.make_pick(1, PlayerId(2)).unwrap();
    assert_eq!(
        engine.make_pick(2, PlayerId(2)),
        Err(DraftError::AlreadyDrafted(PlayerId(2)))
    );
    assert!(!engine.roster(2).unwrap().contains(PlayerId(2)));
    assert!(engine.roster(1).unwrap().contains(PlayerId(2)));
}

#[test]
fn repeating_a_pick_is_rejected() {
    let mut engine = DraftEngine::new(scenario_league(DraftType::Snake), pool(300)).unwrap();
    engine.make_pick(1, PlayerId(3)).unwrap();
    let picks = engine.picks().to_vec();
    let second = engine.make_pick(1, PlayerId(3));
    assert!(matches!(
        second,
        Err(DraftError::NotOnClock { team: 1, on_clock: 2 })
    ));
    assert_eq!(engine.picks(), picks.as_slice());
}

#[test]
fn undo_then_redo_matches_prior_state() {
    let mut engine = DraftEngine::new(default_league(12, DraftType::Snake), pool(300)).unwrap();
    for _ in 0..30 {
        let team = engine.on_the_clock().unwrap();
        let player = best_fit(&engine, team);
        engine.make_pick(team, player).unwrap();
    }
    let before = engine.clone();
    let last = engine.picks().last().cloned().unwrap();

    let undone = engine.undo_last_pick().unwrap();
    assert_eq!(undone, last);
    assert!(!engine.pool().is_drafted(last.player_id));
    assert_eq!(engine.on_the_clock(), Some(last.team));

    engine.make_pick(last.team, last.player_id).unwrap();
    assert_eq!(engine.teams(), before.teams());
    assert_eq!(engine.pool().drafted_ids(), before.pool().drafted_ids());
    let picks: Vec<_> = engine.picks().iter().map(|p| (p.overall, p.team, p.player_id)).collect();
    let expected: Vec<_> = before.picks().iter().map(|p| (p.overall, p.team, p.player_id)).collect();
    assert_eq!(picks, expected);
}

// ===========================================================================
// Snapshots
// ===========================================================================

#[test]
fn snapshot_replay_reproduces_full_draft() {
    let players = pool(300);
    let mut engine = DraftEngine::new(default_league(14, DraftType::Linear), players.clone()).unwrap();
    run_full_draft(&mut engine);

    let json = engine.snapshot().to_json().unwrap();
    let restored =
        DraftEngine::from_snapshot(&DraftSnapshot::from_json(&json).unwrap(), &players).unwrap();

    assert_eq!(restored.picks().len(), engine.picks().len());
    assert_eq!(restored.teams(), engine.teams());
    assert_eq!(restored.pool().drafted_ids(), engine.pool().drafted_ids());
    assert_eq!(restored.status(), DraftStatus::Complete);
    for team in 1..=14u8 {
        assert_eq!(
            restored.bye_week_conflicts(team).unwrap(),
            engine.bye_week_conflicts(team).unwrap()
        );
    }
}

#[test]
fn snapshot_with_tampered_pick_reports_index() {
    let players = pool(300);
    let mut engine = DraftEngine::new(default_league(8, DraftType::Snake), players.clone()).unwrap();
    for _ in 0..20 {
        let team = engine.on_the_clock().unwrap();
        let player = best_fit(&engine, team);
        engine.make_pick(team, player).unwrap();
    }
    let mut snapshot = engine.snapshot();
    snapshot.picks[17].player_id = PlayerId(999);

    match DraftEngine::from_snapshot(&snapshot, &players) {
        Err(DraftError::CorruptReplay { index, source }) => {
            assert_eq!(index, 17);
            assert_eq!(*source, DraftError::UnknownPlayer(PlayerId(999)));
        }
        other => panic!("expected CorruptReplay, got {other:?}"),
    }
}

// ===========================================================================
// Concurrency
// ===========================================================================

#[test]
fn racing_writers_draft_a_player_once() {
    let session = DraftSession::new(
        DraftEngine::new(default_league(12, DraftType::Snake), pool(300)).unwrap(),
    );

    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let session = session.clone();
                scope.spawn(move || session.make_pick(1, PlayerId(1)))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let accepted = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(accepted, 1);
    for rejected in results.iter().filter_map(|r| r.as_ref().err()) {
        assert_eq!(
            rejected,
            &DraftError::NotOnClock { team: 1, on_clock: 2 }
        );
    }
    assert_eq!(session.view().picks().len(), 1);
}

#[test]
fn readers_see_consistent_states_during_writes() {
    let session = DraftSession::new(
        DraftEngine::new(default_league(10, DraftType::Snake), pool(300)).unwrap(),
    );

    std::thread::scope(|scope| {
        let writer = session.clone();
        scope.spawn(move || {
            for _ in 0..60 {
                let view = writer.view();
                let team = view.on_the_clock().unwrap();
                let player = best_fit(&view, team);
                writer.make_pick(team, player).unwrap();
            }
        });

        for _ in 0..4 {
            let reader = session.clone();
            scope.spawn(move || {
                for _ in 0..200 {
                    let view = reader.view();
                    let rostered: usize = view.teams().iter().map(|t| t.roster.filled_count()).sum();
                    assert_eq!(rostered, view.picks().len());
                    assert_eq!(view.pool().drafted_ids().len(), view.picks().len());
                }
            });
        }
    });

    assert_eq!(session.view().picks().len(), 60);
}

#[tokio::test]
async fn subscribers_are_notified_of_each_pick() {
    let session = DraftSession::new(
        DraftEngine::new(default_league(8, DraftType::Linear), pool(200)).unwrap(),
    );
    let mut rx = session.subscribe();

    let watcher = tokio::spawn(async move {
        let mut seen = Vec::new();
        loop {
            rx.changed().await.unwrap();
            let state: Arc<DraftEngine> = rx.borrow_and_update().clone();
            seen.push(state.picks().len());
            if state.picks().len() == 3 {
                break seen;
            }
        }
    });

    for team in 1..=3u8 {
        let player = best_fit(&session.view(), team);
        session.make_pick(team, player).unwrap();
        tokio::task::yield_now().await;
    }

    let seen = watcher.await.unwrap();
    assert_eq!(seen.last(), Some(&3));
    assert!(seen.windows(2).all(|w| w[0] < w[1]));
}
