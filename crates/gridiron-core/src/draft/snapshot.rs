// Snapshot export and replay-based import.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::engine::{DraftEngine, Pick};
use super::player::PlayerPool;
use crate::config::LeagueConfig;
use crate::error::DraftError;

pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported snapshot format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error(transparent)]
    Replay(#[from] DraftError),
}

/// Serializable form of a draft: the league config plus the pick list.
///
/// Rosters and availability are not stored; importing rebuilds them by
/// replaying every pick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftSnapshot {
    pub format_version: u32,
    pub exported_at: DateTime<Utc>,
    pub config: LeagueConfig,
    pub picks: Vec<Pick>,
}

impl DraftSnapshot {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        let snapshot: DraftSnapshot = serde_json::from_str(text)?;
        if snapshot.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: snapshot.format_version,
                expected: SNAPSHOT_FORMAT_VERSION,
            });
        }
        Ok(snapshot)
    }
}

impl DraftEngine {
    /// Capture the config and pick list.
    pub fn snapshot(&self) -> DraftSnapshot {
        DraftSnapshot {
            format_version: SNAPSHOT_FORMAT_VERSION,
            exported_at: Utc::now(),
            config: self.config().clone(),
            picks: self.picks().to_vec(),
        }
    }

    /// Rebuild a draft by replaying `snapshot`'s picks through `make_pick`
    /// against `pool` with every player made available again.
    ///
    /// A pick that is rejected, or that lands on a different pick number,
    /// team or roster category than recorded, fails the import with
    /// `CorruptReplay` naming its index.
    pub fn from_snapshot(snapshot: &DraftSnapshot, pool: &PlayerPool) -> Result<Self, DraftError> {
        let mut engine = DraftEngine::new(snapshot.config.clone(), pool.reset())?;
        for (index, recorded) in snapshot.picks.iter().enumerate() {
            let corrupt = |source: DraftError| DraftError::CorruptReplay {
                index,
                source: Box::new(source),
            };
            let expected = engine.current_pick().ok_or_else(|| corrupt(DraftError::DraftComplete))?;
            if recorded.overall != expected {
                return Err(corrupt(DraftError::NotOnClock {
                    team: recorded.team,
                    on_clock: engine.on_the_clock().unwrap_or(0),
                }));
            }
            let outcome = engine
                .make_pick(recorded.team, recorded.player_id)
                .map_err(corrupt)?;
            if outcome.pick.round != recorded.round
                || outcome.pick.slot != recorded.slot
                || outcome.pick.category != recorded.category
            {
                return Err(corrupt(DraftError::InvalidPlayer {
                    id: recorded.player_id,
                    reason: format!(
                        "recorded at {} round {} slot {}, replayed at {} round {} slot {}",
                        recorded.category,
                        recorded.round,
                        recorded.slot,
                        outcome.pick.category,
                        outcome.pick.round,
                        outcome.pick.slot
                    ),
                }));
            }
        }
        info!("Restored draft from snapshot: {} picks replayed", snapshot.picks.len());
        Ok(engine)
    }
}
