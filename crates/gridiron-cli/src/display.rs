// Plain-text rendering of draft state for the terminal.

use std::fmt::Write;

use gridiron_core::draft::engine::{DraftEngine, PickOutcome};
use gridiron_core::draft::order;
use gridiron_core::draft::scarcity::PositionSupply;
use gridiron_core::{NextUp, Player, PlayerId};

fn player_name(engine: &DraftEngine, id: PlayerId) -> String {
    engine
        .pool()
        .lookup(id)
        .map(|p| format!("{} ({} {})", p.name, p.position, p.nfl_team))
        .unwrap_or_else(|_| format!("#{id}"))
}

fn team_label(engine: &DraftEngine, team: u8) -> String {
    if team == engine.config().my_position {
        format!("Team {team} (you)")
    } else {
        format!("Team {team}")
    }
}

pub fn pick_outcome(engine: &DraftEngine, outcome: &PickOutcome) -> String {
    let pick = &outcome.pick;
    let mut out = format!(
        "{} {}: {} -> {}",
        order::pick_label(pick.overall, engine.config().num_teams),
        team_label(engine, pick.team),
        player_name(engine, pick.player_id),
        pick.category
    );
    match outcome.next {
        NextUp::OnTheClock(team) => {
            let _ = write!(out, "\nOn the clock: {}", team_label(engine, team));
        }
        NextUp::DraftComplete => out.push_str("\nDraft complete."),
    }
    out
}

pub fn status(engine: &DraftEngine) -> String {
    let progress = engine.progress();
    let config = engine.config();
    let mut out = format!(
        "{}: {} teams, {:?} draft, {:?} scoring\n",
        config.name, config.num_teams, config.draft_type, config.scoring
    );
    if engine.is_complete() {
        let _ = writeln!(out, "Draft complete: {} picks made", progress.picks_made);
    } else if let (Some(pick), Some(team)) = (progress.current_pick, progress.on_the_clock) {
        let _ = writeln!(
            out,
            "Pick {} of {} ({}), {} on the clock",
            pick,
            progress.total_picks,
            order::pick_label(pick, config.num_teams),
            team_label(engine, team)
        );
    }
    if let Some(last) = engine.picks().last() {
        let _ = writeln!(
            out,
            "Last pick: {} by Team {}",
            player_name(engine, last.player_id),
            last.team
        );
    }
    if let Some(mine) = engine.my_next_pick() {
        let _ = write!(
            out,
            "Your next pick: {} ({})",
            mine,
            order::pick_label(mine, config.num_teams)
        );
    }
    out.trim_end().to_string()
}

pub fn upcoming(engine: &DraftEngine, team: u8, picks: &[u32]) -> String {
    if picks.is_empty() {
        return format!("{} has no picks left", team_label(engine, team));
    }
    let teams = engine.config().num_teams;
    let labels: Vec<String> = picks
        .iter()
        .map(|&p| format!("{} ({})", p, order::pick_label(p, teams)))
        .collect();
    format!("{} picks at: {}", team_label(engine, team), labels.join(", "))
}

pub fn needs(engine: &DraftEngine, team: u8) -> String {
    let Ok(needs) = engine.team_needs(team) else {
        return format!("unknown team {team}");
    };
    let open: Vec<String> = needs
        .iter()
        .filter(|(_, &n)| n > 0)
        .map(|(cat, n)| format!("{cat} x{n}"))
        .collect();
    if open.is_empty() {
        format!("{}: all roster minimums met", team_label(engine, team))
    } else {
        format!("{} needs: {}", team_label(engine, team), open.join(", "))
    }
}

pub fn byes(engine: &DraftEngine, team: u8) -> String {
    let Ok(breakdown) = engine.bye_week_breakdown(team) else {
        return format!("unknown team {team}");
    };
    if breakdown.is_empty() {
        return format!("{}: no bye week conflicts", team_label(engine, team));
    }
    let mut out = format!("{} bye week conflicts:", team_label(engine, team));
    for (week, players) in &breakdown {
        let names: Vec<String> = players.iter().map(|&id| player_name(engine, id)).collect();
        let _ = write!(out, "\n  week {week}: {}", names.join(", "));
    }
    out
}

pub fn player_table<'a>(players: impl Iterator<Item = &'a Player>) -> String {
    let mut out = format!(
        "{:>5}  {:<26} {:<4} {:<4} {:>3} {:>5} {:>7}",
        "id", "name", "pos", "team", "bye", "rank", "proj"
    );
    let mut any = false;
    for p in players {
        any = true;
        let bye = p.bye_week.map_or_else(|| "-".to_string(), |w| w.to_string());
        let _ = write!(
            out,
            "\n{:>5}  {:<26} {:<4} {:<4} {:>3} {:>5} {:>7.1}",
            p.id, p.name, p.position, p.nfl_team, bye, p.rank, p.projected_points
        );
    }
    if !any {
        out.push_str("\n  (no players)");
    }
    out
}

pub fn board(engine: &DraftEngine, round: u32) -> String {
    let Ok(cells) = engine.board_round(round) else {
        return format!("round {round} is outside the draft");
    };
    let mut out = format!("Round {round}");
    for cell in cells {
        let who = cell
            .player_id
            .map_or_else(|| "-".to_string(), |id| player_name(engine, id));
        let marker = if cell.is_mine { "*" } else { " " };
        let _ = write!(out, "\n{marker}{:>6}  Team {:<3} {}", cell.label, cell.team, who);
    }
    out
}

pub fn supply(entries: &[PositionSupply]) -> String {
    let mut out = format!(
        "{:<4} {:>5} {:>6} {:>7} {:>8}  urgency",
        "pos", "avail", "demand", "surplus", "dropoff"
    );
    for e in entries {
        let _ = write!(
            out,
            "\n{:<4} {:>5} {:>6} {:>7} {:>8.1}  {}",
            e.position,
            e.available,
            e.demand,
            e.surplus,
            e.dropoff,
            e.urgency.label()
        );
    }
    out
}
