// Library root: draft engine, league config, and the shared session handle
// used by the CLI and integration tests.

pub mod config;
pub mod draft;
pub mod error;
pub mod session;

pub use config::{Config, DraftType, LeagueConfig, ScoringFormat, SlotLimits};
pub use draft::engine::{DraftEngine, DraftStatus, NextUp, Pick, PickOutcome};
pub use draft::player::{Player, PlayerFilter, PlayerId, PlayerPool};
pub use draft::position::{Position, SlotCategory};
pub use error::DraftError;
pub use session::DraftSession;
