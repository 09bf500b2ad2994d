// Player positions and roster slot categories.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Football positions a player can be drafted at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Position {
    Quarterback,
    RunningBack,
    WideReceiver,
    TightEnd,
    Kicker,
    Defense,
}

impl Position {
    pub const ALL: [Position; 6] = [
        Position::Quarterback,
        Position::RunningBack,
        Position::WideReceiver,
        Position::TightEnd,
        Position::Kicker,
        Position::Defense,
    ];

    /// Parse a position string into a Position enum.
    ///
    /// Accepts the usual abbreviations case-insensitively; team defenses may be
    /// written "DEF", "DST" or "D/ST".
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "QB" => Some(Position::Quarterback),
            "RB" => Some(Position::RunningBack),
            "WR" => Some(Position::WideReceiver),
            "TE" => Some(Position::TightEnd),
            "K" | "PK" => Some(Position::Kicker),
            "DEF" | "DST" | "D/ST" => Some(Position::Defense),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
            Position::Kicker => "K",
            Position::Defense => "DEF",
        }
    }

    /// RB, WR and TE may fill a FLEX slot.
    pub fn is_flex_eligible(&self) -> bool {
        matches!(
            self,
            Position::RunningBack | Position::WideReceiver | Position::TightEnd
        )
    }

    /// The dedicated roster category for this position.
    pub fn category(&self) -> SlotCategory {
        match self {
            Position::Quarterback => SlotCategory::Quarterback,
            Position::RunningBack => SlotCategory::RunningBack,
            Position::WideReceiver => SlotCategory::WideReceiver,
            Position::TightEnd => SlotCategory::TightEnd,
            Position::Kicker => SlotCategory::Kicker,
            Position::Defense => SlotCategory::Defense,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.display_str())
    }
}

impl TryFrom<String> for Position {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Position::from_str_pos(&s).ok_or_else(|| format!("unknown position `{s}`"))
    }
}

impl From<Position> for String {
    fn from(pos: Position) -> Self {
        pos.display_str().to_string()
    }
}

/// A roster category: one per playing position plus FLEX and BENCH.
///
/// Ordering follows the usual lineup display order, which is also the
/// iteration order of every category-keyed `BTreeMap` in the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SlotCategory {
    Quarterback,
    RunningBack,
    WideReceiver,
    TightEnd,
    Flex,
    Kicker,
    Defense,
    Bench,
}

impl SlotCategory {
    /// Parse a roster category. Bench may be written "BENCH", "BN", "BE" or "BEN".
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "FLEX" | "W/R/T" => Some(SlotCategory::Flex),
            "BENCH" | "BN" | "BE" | "BEN" => Some(SlotCategory::Bench),
            other => Position::from_str_pos(other).map(|p| p.category()),
        }
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            SlotCategory::Quarterback => "QB",
            SlotCategory::RunningBack => "RB",
            SlotCategory::WideReceiver => "WR",
            SlotCategory::TightEnd => "TE",
            SlotCategory::Flex => "FLEX",
            SlotCategory::Kicker => "K",
            SlotCategory::Defense => "DEF",
            SlotCategory::Bench => "BENCH",
        }
    }

    /// Whether a player at `pos` may occupy this category.
    pub fn accepts(&self, pos: Position) -> bool {
        match self {
            SlotCategory::Flex => pos.is_flex_eligible(),
            SlotCategory::Bench => true,
            other => pos.category() == *other,
        }
    }
}

impl fmt::Display for SlotCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.display_str())
    }
}

impl TryFrom<String> for SlotCategory {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        SlotCategory::from_str_pos(&s).ok_or_else(|| format!("unknown roster category `{s}`"))
    }
}

impl From<SlotCategory> for String {
    fn from(cat: SlotCategory) -> Self {
        cat.display_str().to_string()
    }
}
