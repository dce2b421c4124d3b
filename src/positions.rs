use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Position {
    UTG,
    UTG1,
    UTG2,
    #[default]
    MP,
    HJ,
    CO,
    BTN,
    SB,
    BB,
}

pub const ALL_POSITIONS: [Position; 9] = [
    Position::UTG,
    Position::UTG1,
    Position::UTG2,
    Position::MP,
    Position::HJ,
    Position::CO,
    Position::BTN,
    Position::SB,
    Position::BB,
];

impl Position {
    /// Reads the labels poker clients use ("UTG+1", "Button", "D", "LJ", ...).
    pub fn from_label(label: &str) -> Option<Position> {
        let normalized: String = label
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_uppercase();
        match normalized.as_str() {
            "UTG" | "EP" => Some(Position::UTG),
            "UTG+1" | "UTG1" => Some(Position::UTG1),
            "UTG+2" | "UTG2" => Some(Position::UTG2),
            "MP" | "MP1" | "MP+1" | "LJ" | "LOJACK" | "MIDDLE" => Some(Position::MP),
            "HJ" | "HIJACK" | "MP2" | "MP+2" => Some(Position::HJ),
            "CO" | "CUTOFF" => Some(Position::CO),
            "BTN" | "BU" | "BUTTON" | "D" | "DEALER" => Some(Position::BTN),
            "SB" | "SMALLBLIND" => Some(Position::SB),
            "BB" | "BIGBLIND" => Some(Position::BB),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Position::UTG => "UTG",
            Position::UTG1 => "UTG+1",
            Position::UTG2 => "UTG+2",
            Position::MP => "MP",
            Position::HJ => "HJ",
            Position::CO => "CO",
            Position::BTN => "BTN",
            Position::SB => "SB",
            Position::BB => "BB",
        }
    }

    /// Seat quality for decisions: blinds lowest, the button highest.
    pub fn value(self) -> u8 {
        match self {
            Position::SB => 1,
            Position::BB => 2,
            Position::UTG => 3,
            Position::UTG1 => 4,
            Position::UTG2 => 5,
            Position::MP => 5,
            Position::HJ => 7,
            Position::CO => 8,
            Position::BTN => 9,
        }
    }

    pub fn is_early(self) -> bool {
        matches!(self, Position::UTG | Position::UTG1 | Position::UTG2)
    }

    pub fn is_late(self) -> bool {
        matches!(self, Position::CO | Position::BTN)
    }

    pub fn is_blind(self) -> bool {
        matches!(self, Position::SB | Position::BB)
    }

    /// Opening chart used for this seat.
    pub fn chart_key(self) -> &'static str {
        match self {
            Position::UTG | Position::UTG1 => "UTG",
            Position::UTG2 | Position::MP => "MP",
            Position::HJ => "HJ",
            Position::CO => "CO",
            Position::BTN => "BTN",
            Position::SB => "SB",
            Position::BB => "BB",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Unknown labels fall back to a middle seat rather than rejecting the state.
impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Position::from_label(&label).unwrap_or_default())
    }
}

pub fn explain_position(pos: Position) -> &'static str {
    match pos {
        Position::UTG => "Under the Gun, first to act, play tight",
        Position::UTG1 => "UTG+1, early position, play tight",
        Position::UTG2 => "UTG+2, early position, play tight",
        Position::MP => "Middle Position, slightly wider than early positions",
        Position::HJ => "Hijack, one before the Cutoff, starting to open wider",
        Position::CO => "Cutoff, strong position, wide opening range",
        Position::BTN => "Button, best seat, you act last after the flop",
        Position::SB => "Small Blind, worst postflop position, act first",
        Position::BB => "Big Blind, last to act preflop, defend wide",
    }
}
