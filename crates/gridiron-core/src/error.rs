// Error taxonomy for draft configuration, picks, and replay.

use thiserror::Error;

use crate::draft::player::PlayerId;

/// Every way a draft operation can be rejected.
///
/// All variants are recoverable: a rejected call leaves the engine exactly as
/// it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("invalid config for field `{field}`: {message}")]
    InvalidConfig { field: String, message: String },

    #[error("league config cannot change once the draft has started")]
    ConfigLocked,

    #[error("draft is complete; no picks are outstanding")]
    DraftComplete,

    #[error("team {team} is not on the clock (team {on_clock} is)")]
    NotOnClock { team: u8, on_clock: u8 },

    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),

    #[error("player {0} has already been drafted")]
    AlreadyDrafted(PlayerId),

    #[error("no roster category on team {team} can take player {player}")]
    RosterFull { team: u8, player: PlayerId },

    #[error("no picks to undo")]
    NoPicksToUndo,

    #[error("snapshot replay failed at pick index {index}: {source}")]
    CorruptReplay {
        index: usize,
        #[source]
        source: Box<DraftError>,
    },

    #[error("unknown team slot {0}")]
    UnknownTeam(u8),

    #[error("invalid player {id}: {reason}")]
    InvalidPlayer { id: PlayerId, reason: String },
}

impl DraftError {
    pub(crate) fn invalid_config(field: &str, message: impl Into<String>) -> Self {
        DraftError::InvalidConfig {
            field: field.to_string(),
            message: message.into(),
        }
    }
}
