// Player catalog loading from CSV.
//
// Expected columns: id,name,position,team,bye_week,rank,projected_points.
// An empty bye_week means the bye is unknown. Rows that fail to parse or
// carry an impossible bye week are skipped with a warning.

use std::io::Read;
use std::path::Path;

use gridiron_core::draft::player::BYE_WEEKS;
use gridiron_core::{Player, PlayerId, Position};
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum PlayerLoadError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

#[derive(Debug, Deserialize)]
struct RawPlayer {
    id: u32,
    name: String,
    position: String,
    #[serde(default)]
    team: String,
    #[serde(default)]
    bye_week: Option<u8>,
    rank: u32,
    #[serde(default)]
    projected_points: Option<f64>,
}

fn load_players_from_reader<R: Read>(rdr: R) -> Result<Vec<Player>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);
    let mut players = Vec::new();
    for result in reader.deserialize::<RawPlayer>() {
        match result {
            Ok(raw) => {
                let Some(position) = Position::from_str_pos(&raw.position) else {
                    warn!("skipping player '{}': unknown position '{}'", raw.name, raw.position);
                    continue;
                };
                if let Some(week) = raw.bye_week.filter(|w| !BYE_WEEKS.contains(w)) {
                    warn!("skipping player '{}': bye week {} out of range", raw.name, week);
                    continue;
                }
                let projected_points = raw.projected_points.unwrap_or(0.0);
                if !projected_points.is_finite() {
                    warn!("skipping player '{}': non-finite projected points", raw.name);
                    continue;
                }
                players.push(Player {
                    id: PlayerId(raw.id),
                    name: raw.name,
                    position,
                    nfl_team: raw.team.to_uppercase(),
                    bye_week: raw.bye_week,
                    rank: raw.rank,
                    projected_points,
                });
            }
            Err(e) => {
                warn!("skipping malformed player row: {}", e);
            }
        }
    }
    Ok(players)
}

/// Load the player catalog from a CSV file.
pub fn load_players(path: &Path) -> Result<Vec<Player>, PlayerLoadError> {
    let display = path.display().to_string();
    let file = std::fs::File::open(path).map_err(|e| PlayerLoadError::Io {
        path: display.clone(),
        source: e,
    })?;
    load_players_from_reader(file).map_err(|e| PlayerLoadError::Csv {
        path: display,
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_well_formed_rows() {
        let csv = "\
id,name,position,team,bye_week,rank,projected_points
1,Christian McCaffrey,RB,sf,9,1,378.4
2,Josh Allen,QB,BUF,12,5,402.1
3,Justin Tucker,K,BAL,,140,
";
        let players = load_players_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(players.len(), 3);
        assert_eq!(players[0].id, PlayerId(1));
        assert_eq!(players[0].position, Position::RunningBack);
        assert_eq!(players[0].nfl_team, "SF");
        assert_eq!(players[0].bye_week, Some(9));
        assert_eq!(players[2].bye_week, None);
        assert_eq!(players[2].projected_points, 0.0);
    }

    #[test]
    fn skips_malformed_rows() {
        let csv = "\
id,name,position,team,bye_week,rank,projected_points
1,Good Player,WR,MIA,6,10,250.0
x,Bad Id,WR,MIA,6,11,240.0
3,Bad Position,LB,MIA,6,12,230.0
4,Bad Rank,TE,KC,10,abc,200.0
5,Also Good,DST,SF,9,150,110.0
6,Bye Zero,RB,NYG,0,160,90.0
7,Bye Nineteen,WR,NYG,19,161,80.0
";
        let players = load_players_from_reader(csv.as_bytes()).unwrap();
        let ids: Vec<u32> = players.iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![1, 5]);
        assert_eq!(players[1].position, Position::Defense);
        assert!(gridiron_core::PlayerPool::new(players).is_ok());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_players(Path::new("/nonexistent/players.csv")).unwrap_err();
        assert!(matches!(err, PlayerLoadError::Io { .. }));
    }

    #[test]
    fn shipped_players_load() {
        let csv = include_str!("../../../data/players.csv");
        let players = load_players_from_reader(csv.as_bytes()).unwrap();
        assert!(players.len() > 50);
        assert!(gridiron_core::PlayerPool::new(players).is_ok());
    }
}
