use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::cards::CardInput;
use crate::equity::OutsResult;
use crate::hand_type::{BettingPurpose, HandType};
use crate::positions::Position;
use crate::range_estimator::OpponentRange;
use crate::strategy::{Action, Strategy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Street {
    #[default]
    Preflop,
    Flop,
    Turn,
    River,
}

impl Street {
    /// Street implied by the number of visible board cards.
    pub fn from_board_len(len: usize) -> Street {
        match len {
            0..=2 => Street::Preflop,
            3 => Street::Flop,
            4 => Street::Turn,
            _ => Street::River,
        }
    }

    pub fn is_postflop(self) -> bool {
        self != Street::Preflop
    }

    pub fn cards_to_come(self) -> u32 {
        match self {
            Street::Preflop => 5,
            Street::Flop => 2,
            Street::Turn => 1,
            Street::River => 0,
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Street::Preflop => write!(f, "preflop"),
            Street::Flop => write!(f, "flop"),
            Street::Turn => write!(f, "turn"),
            Street::River => write!(f, "river"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlindLevels {
    pub small_blind: f64,
    pub big_blind: f64,
}

impl Default for BlindLevels {
    fn default() -> Self {
        BlindLevels {
            small_blind: 1.0,
            big_blind: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpponentBet {
    pub name: String,
    pub bet: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Fold,
    Check,
    Call,
    Limp,
    Bet,
    Raise,
    AllIn,
    Post,
    Other,
}

impl EventKind {
    pub fn from_label(label: &str) -> EventKind {
        match label.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "fold" | "folds" => EventKind::Fold,
            "check" | "checks" => EventKind::Check,
            "call" | "calls" => EventKind::Call,
            "limp" | "limps" => EventKind::Limp,
            "bet" | "bets" => EventKind::Bet,
            "raise" | "raises" | "3bet" | "4bet" | "5bet" => EventKind::Raise,
            "allin" | "shove" | "jam" => EventKind::AllIn,
            "post" | "posts" | "blind" | "sb" | "bb" => EventKind::Post,
            _ => EventKind::Other,
        }
    }

    pub fn is_aggressive(self) -> bool {
        matches!(self, EventKind::Bet | EventKind::Raise | EventKind::AllIn)
    }
}

impl<'de> Deserialize<'de> for EventKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(EventKind::from_label(&label))
    }
}

/// One observed action in the current betting round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BettingEvent {
    #[serde(default)]
    pub player: String,
    pub action: EventKind,
    #[serde(default)]
    pub amount: f64,
}

/// Snapshot of the table at the moment a decision is requested.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameState {
    pub street: Street,
    pub position: Position,
    pub pot_size: f64,
    pub to_call: f64,
    pub stack_size: f64,
    pub active_players: u32,
    pub hole_cards: Vec<CardInput>,
    pub board_cards: Vec<CardInput>,
    pub opponent_bets: Vec<OpponentBet>,
    pub betting_action: Vec<BettingEvent>,
    pub is_my_turn: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StackDepth {
    VeryShort,
    Short,
    Medium,
    Deep,
    VeryDeep,
}

impl StackDepth {
    pub fn from_big_blinds(bb: f64) -> StackDepth {
        if bb < 20.0 {
            StackDepth::VeryShort
        } else if bb < 40.0 {
            StackDepth::Short
        } else if bb < 100.0 {
            StackDepth::Medium
        } else if bb < 200.0 {
            StackDepth::Deep
        } else {
            StackDepth::VeryDeep
        }
    }

    pub fn is_shallow(self) -> bool {
        matches!(self, StackDepth::VeryShort | StackDepth::Short)
    }

    pub fn description(self) -> &'static str {
        match self {
            StackDepth::VeryShort => "Very short stack, push/fold territory",
            StackDepth::Short => "Short stack, favour high-card strength and commitment",
            StackDepth::Medium => "Medium stack, standard play",
            StackDepth::Deep => "Deep stack, implied odds favour suited and connected hands",
            StackDepth::VeryDeep => "Very deep stack, speculative hands gain value",
        }
    }
}

impl fmt::Display for StackDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackDepth::VeryShort => write!(f, "very short"),
            StackDepth::Short => write!(f, "short"),
            StackDepth::Medium => write!(f, "medium"),
            StackDepth::Deep => write!(f, "deep"),
            StackDepth::VeryDeep => write!(f, "very deep"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StackDepthInfo {
    pub big_blinds: f64,
    pub depth: StackDepth,
    pub description: String,
}

impl StackDepthInfo {
    pub fn new(stack: f64, blinds: &BlindLevels) -> Self {
        let big_blinds = if blinds.big_blind > 0.0 {
            stack / blinds.big_blind
        } else {
            0.0
        };
        let depth = StackDepth::from_big_blinds(big_blinds);
        StackDepthInfo {
            big_blinds,
            depth,
            description: depth.description().to_string(),
        }
    }
}

/// Recommendation returned for a single game state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Advice {
    pub primary_action: Action,
    pub strategy: Strategy,
    pub bet_size: f64,
    /// Primary frequency with cosmetic jitter; never changes the action.
    pub confidence: f64,
    pub reasoning: String,
    pub hand_strength: f64,
    pub hand_type: Option<HandType>,
    pub betting_purpose: Option<BettingPurpose>,
    pub equity: Option<f64>,
    pub pot_odds: Option<f64>,
    pub hand_notation: Option<String>,
    pub stack_depth_info: Option<StackDepthInfo>,
    pub outs: Option<OutsResult>,
    pub board_texture: Option<String>,
    pub opponent_range: Option<OpponentRange>,
    pub implied_odds: Option<String>,
}

impl Advice {
    /// Conservative answer when the hole cards cannot be read.
    pub fn fold_safe(reasoning: impl Into<String>) -> Self {
        Advice {
            primary_action: Action::Fold,
            strategy: Strategy::pure(Action::Fold),
            bet_size: 0.0,
            confidence: 0.0,
            reasoning: reasoning.into(),
            hand_strength: 0.0,
            hand_type: None,
            betting_purpose: None,
            equity: None,
            pot_odds: None,
            hand_notation: None,
            stack_depth_info: None,
            outs: None,
            board_texture: None,
            opponent_range: None,
            implied_odds: None,
        }
    }
}
