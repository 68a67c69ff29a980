// Player, pick, and position representation.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Football positions used for scoring and roster slot matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Qb,
    Rb,
    Wr,
    Te,
    Kicker,
    Defense,
    /// Position string the catalog didn't recognize. Scores as a zero
    /// contribution everywhere rather than aborting the ranking.
    Unknown,
}

impl Position {
    /// Parse a position string into a Position enum.
    ///
    /// Handles Sleeper-style abbreviations:
    /// - "QB", "RB", "WR", "TE", "K"
    /// - "DEF" or "DST" -> Defense
    /// - anything else -> Unknown (never an error)
    pub fn from_str_pos(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "QB" => Position::Qb,
            "RB" => Position::Rb,
            "WR" => Position::Wr,
            "TE" => Position::Te,
            "K" => Position::Kicker,
            "DEF" | "DST" => Position::Defense,
            _ => Position::Unknown,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Qb => "QB",
            Position::Rb => "RB",
            Position::Wr => "WR",
            Position::Te => "TE",
            Position::Kicker => "K",
            Position::Defense => "DEF",
            Position::Unknown => "UNK",
        }
    }

    /// All concrete positions (excluding Unknown), for table iteration.
    pub const ALL: &'static [Position] = &[
        Position::Qb,
        Position::Rb,
        Position::Wr,
        Position::Te,
        Position::Kicker,
        Position::Defense,
    ];
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

// Serialized as the platform's abbreviation ("RB", "DEF"), parsed leniently
// on the way back in.
impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.display_str())
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Position::from_str_pos(&s))
    }
}

// ---------------------------------------------------------------------------
// Roster slot labels
// ---------------------------------------------------------------------------

/// A single slot label from the league's roster template.
///
/// `Starter` slots carry a concrete position requirement. `Flex` can hold
/// several positions and therefore contributes no single-position need.
/// `Bench` and `InjuredReserve` are placeholders excluded from need math.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotLabel {
    Starter(Position),
    Flex,
    Bench,
    InjuredReserve,
}

impl SlotLabel {
    /// Parse a roster template entry (e.g. "RB", "FLEX", "BN", "IR").
    pub fn parse(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "FLEX" | "WRT" | "SUPER_FLEX" | "REC_FLEX" => SlotLabel::Flex,
            "BN" | "BE" => SlotLabel::Bench,
            "IR" | "IL" => SlotLabel::InjuredReserve,
            other => match Position::from_str_pos(other) {
                Position::Unknown => SlotLabel::Flex,
                pos => SlotLabel::Starter(pos),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Injury status
// ---------------------------------------------------------------------------

/// Injury designation as reported by the draft platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InjuryStatus {
    #[default]
    Healthy,
    Questionable,
    Doubtful,
    Out,
}

impl InjuryStatus {
    /// Parse a status string. Missing or unrecognized statuses are treated
    /// as healthy, matching the platform's sparse reporting.
    pub fn from_str_status(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "questionable" => InjuryStatus::Questionable,
            "doubtful" => InjuryStatus::Doubtful,
            "out" => InjuryStatus::Out,
            _ => InjuryStatus::Healthy,
        }
    }

    /// Fixed scoring penalty for this status.
    pub fn penalty(&self) -> f64 {
        match self {
            InjuryStatus::Healthy => 0.0,
            InjuryStatus::Questionable => 15.0,
            InjuryStatus::Doubtful => 30.0,
            InjuryStatus::Out => 50.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Player and pick records
// ---------------------------------------------------------------------------

/// A player from the catalog. Immutable for the duration of a ranking pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Platform player ID.
    pub player_id: String,
    /// Display name.
    pub full_name: String,
    /// Primary position.
    pub pos: Position,
    /// NFL team abbreviation, if rostered.
    #[serde(default)]
    pub team: Option<String>,
    /// Consensus average draft position.
    #[serde(default)]
    pub adp: Option<f64>,
    /// Quality tier, lower = better. 1 is elite.
    #[serde(default)]
    pub tier: Option<u32>,
    /// Projected season fantasy points (PPR), used for VORP.
    #[serde(default)]
    pub projection_baseline: f64,
    /// Bye week number, if scheduled.
    #[serde(default)]
    pub bye_week: Option<u32>,
    /// Injury designation.
    #[serde(default)]
    pub injury_status: InjuryStatus,
}

/// A single entry from the draft's append-only pick log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pick {
    /// Draft this pick belongs to.
    pub draft_id: String,
    /// Round number (1-indexed).
    pub round: u32,
    /// Pick within the round (1-indexed).
    pub pick: u32,
    /// Global pick number across the draft (1-indexed).
    pub pick_no: u32,
    /// The roster that made the pick.
    pub roster_id: String,
    /// The player taken. None for skipped/forfeited slots.
    #[serde(default)]
    pub player_id: Option<String>,
    /// Unix timestamp of the pick, when reported.
    #[serde(default)]
    pub timestamp: Option<i64>,
}
