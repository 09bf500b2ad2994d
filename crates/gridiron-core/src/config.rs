// League configuration: types, validation, and loading from config/league.toml.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::draft::position::SlotCategory;
use crate::error::DraftError;

pub const MIN_TEAMS: u8 = 8;
pub const MAX_TEAMS: u8 = 16;
/// Upper bound on the sum of roster maxima.
pub const MAX_ROSTER_SIZE: u32 = 100;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error(transparent)]
    Invalid(#[from] DraftError),

    #[error("failed to seed config/league.toml: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// League settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftType {
    /// Order reverses every round.
    Snake,
    /// Same order every round.
    Linear,
}

/// Scoring format. Carried for the presentation layer; it never affects
/// pick order or roster rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringFormat {
    #[serde(alias = "STANDARD")]
    Standard,
    #[serde(alias = "half-ppr", alias = "half", alias = "HALF_PPR", alias = "Half-PPR")]
    HalfPpr,
    #[default]
    #[serde(alias = "PPR")]
    Ppr,
}

/// Minimum and maximum number of players a team rosters in one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "SlotSpec", into = "SlotSpec")]
pub struct SlotLimits {
    pub min: u32,
    pub max: u32,
}

impl SlotLimits {
    pub fn exact(n: u32) -> Self {
        SlotLimits { min: n, max: n }
    }

    pub fn range(min: u32, max: u32) -> Self {
        SlotLimits { min, max }
    }
}

/// On-disk form of a roster entry: `QB = 1` or `BENCH = { min = 0, max = 6 }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum SlotSpec {
    Exact(u32),
    Range {
        #[serde(default)]
        min: u32,
        max: u32,
    },
}

impl From<SlotSpec> for SlotLimits {
    fn from(spec: SlotSpec) -> Self {
        match spec {
            SlotSpec::Exact(n) => SlotLimits::exact(n),
            SlotSpec::Range { min, max } => SlotLimits::range(min, max),
        }
    }
}

impl From<SlotLimits> for SlotSpec {
    fn from(limits: SlotLimits) -> Self {
        SlotSpec::Range {
            min: limits.min,
            max: limits.max,
        }
    }
}

fn default_league_name() -> String {
    "Fantasy League".to_string()
}

fn default_my_position() -> u8 {
    1
}

/// Settings fixed for the lifetime of a draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueConfig {
    #[serde(default = "default_league_name")]
    pub name: String,
    /// Team count T.
    pub num_teams: u8,
    pub draft_type: DraftType,
    #[serde(default)]
    pub scoring: ScoringFormat,
    /// The user's draft slot, 1..=num_teams.
    #[serde(default = "default_my_position")]
    pub my_position: u8,
    /// Rounds to draft. Defaults to the sum of roster maxima.
    #[serde(default)]
    pub total_rounds: Option<u32>,
    pub roster: BTreeMap<SlotCategory, SlotLimits>,
}

impl LeagueConfig {
    /// Check every league invariant. Errors name the offending field.
    pub fn validate(&self) -> Result<(), DraftError> {
        if !(MIN_TEAMS..=MAX_TEAMS).contains(&self.num_teams) {
            return Err(DraftError::invalid_config(
                "league.num_teams",
                format!(
                    "must be between {MIN_TEAMS} and {MAX_TEAMS}, got {}",
                    self.num_teams
                ),
            ));
        }

        if !(1..=self.num_teams).contains(&self.my_position) {
            return Err(DraftError::invalid_config(
                "league.my_position",
                format!(
                    "must be between 1 and {}, got {}",
                    self.num_teams, self.my_position
                ),
            ));
        }

        for (category, limits) in &self.roster {
            if limits.min > limits.max {
                return Err(DraftError::invalid_config(
                    &format!("league.roster.{category}"),
                    format!("min {} exceeds max {}", limits.min, limits.max),
                ));
            }
        }

        let roster_size = self
            .roster
            .values()
            .try_fold(0u32, |sum, l| sum.checked_add(l.max))
            .filter(|&size| size <= MAX_ROSTER_SIZE)
            .ok_or_else(|| {
                DraftError::invalid_config(
                    "league.roster",
                    format!("slot maxima must sum to at most {MAX_ROSTER_SIZE}"),
                )
            })?;
        if roster_size == 0 {
            return Err(DraftError::invalid_config(
                "league.roster",
                "slot maxima sum to zero",
            ));
        }

        if let Some(rounds) = self.total_rounds {
            if rounds == 0 || rounds > roster_size {
                return Err(DraftError::invalid_config(
                    "league.total_rounds",
                    format!("must be between 1 and the roster size {roster_size}, got {rounds}"),
                ));
            }
        }

        Ok(())
    }

    /// Limits for `category`; categories absent from the roster hold nobody.
    pub fn limits(&self, category: SlotCategory) -> SlotLimits {
        self.roster.get(&category).copied().unwrap_or_default()
    }

    /// Sum of all category maxima. Bounded by `MAX_ROSTER_SIZE` once validated.
    pub fn roster_size(&self) -> u32 {
        self.roster.values().map(|l| l.max).sum()
    }

    /// Rounds in the draft: `total_rounds` when set, else the roster size.
    pub fn rounds(&self) -> u32 {
        self.total_rounds.unwrap_or_else(|| self.roster_size())
    }

    /// Total picks across all teams.
    pub fn total_picks(&self) -> u32 {
        u32::from(self.num_teams) * self.rounds()
    }
}

// ---------------------------------------------------------------------------
// league.toml
// ---------------------------------------------------------------------------

/// Wrapper for the top-level tables in league.toml.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueConfig,
    #[serde(default)]
    data: DataPaths,
}

/// Where the front end finds its player dataset and saved snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DataPaths {
    #[serde(default = "default_players_path")]
    pub players: String,
    #[serde(default = "default_snapshot_path")]
    pub snapshot: String,
}

fn default_players_path() -> String {
    "data/players.csv".to_string()
}

fn default_snapshot_path() -> String {
    "data/draft.json".to_string()
}

impl Default for DataPaths {
    fn default() -> Self {
        DataPaths {
            players: default_players_path(),
            snapshot: default_snapshot_path(),
        }
    }
}

/// Assembled configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub data: DataPaths,
}

/// Parse and validate the contents of a league.toml file. `path` is only
/// used for error messages.
pub fn parse_config(text: &str, path: &Path) -> Result<Config, ConfigError> {
    let file: LeagueFile = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    file.league.validate()?;
    Ok(Config {
        league: file.league,
        data: file.data,
    })
}

/// Load and validate `config/league.toml` relative to `base_dir`.
///
/// Does not seed defaults; call `seed_league_config` first.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join("league.toml");
    let text = std::fs::read_to_string(&path).map_err(|_| ConfigError::FileNotFound {
        path: path.clone(),
    })?;
    parse_config(&text, &path)
}

/// League config shipped with the binary, used when `defaults/` is absent.
const BUILTIN_LEAGUE_TOML: &str = include_str!("../../../defaults/league.toml");

/// Create `config/league.toml` under `base_dir` if it does not exist yet.
///
/// The seed comes from `defaults/league.toml` when present, else the built-in
/// copy. Returns the path written, or `None` when a config was already there.
pub fn seed_league_config(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join("league.toml");
    if target.exists() {
        return Ok(None);
    }

    let seed_path = base_dir.join("defaults").join("league.toml");
    let seed = if seed_path.is_file() {
        std::fs::read_to_string(&seed_path).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("cannot read {}: {e}", seed_path.display()),
        })?
    } else {
        BUILTIN_LEAGUE_TOML.to_string()
    };

    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("cannot create {}: {e}", dir.display()),
        })?;
    }

    // create_new so a file appearing between the check and the write is kept.
    let written = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
        .and_then(|mut file| std::io::Write::write_all(&mut file, seed.as_bytes()));
    match written {
        Ok(()) => Ok(Some(target)),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(None),
        Err(e) => Err(ConfigError::DefaultsCopyError {
            message: format!("cannot write {}: {e}", target.display()),
        }),
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
