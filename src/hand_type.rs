use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::equity::OutsResult;
use crate::hand_evaluator::{made_category, Hand, HandCategory};
use crate::postflop::BoardTexture;
use crate::preflop::OpeningClass;

/// Value-purpose hands below this equity are demoted.
pub const VALUE_EQUITY_MIN: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandType {
    Premium,
    Strong,
    Medium,
    BluffCandidate,
    Air,
    NutsStrong,
    StrongMade,
    MediumMade,
    StrongDraw,
    MediumDraw,
    WeakDraw,
    AirBluff,
    BluffCatcher,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BettingPurpose {
    Value,
    Bluff,
    SemiBluff,
    Mixed,
    BluffCatcher,
    Fold,
}

impl HandType {
    /// Fixed type-to-purpose lookup.
    pub fn purpose(self) -> BettingPurpose {
        match self {
            HandType::Premium | HandType::Strong => BettingPurpose::Value,
            HandType::NutsStrong | HandType::StrongMade => BettingPurpose::Value,
            HandType::Medium | HandType::MediumMade => BettingPurpose::Mixed,
            HandType::StrongDraw | HandType::MediumDraw | HandType::WeakDraw => {
                BettingPurpose::SemiBluff
            }
            HandType::BluffCandidate | HandType::AirBluff => BettingPurpose::Bluff,
            HandType::BluffCatcher => BettingPurpose::BluffCatcher,
            HandType::Air => BettingPurpose::Fold,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HandType::Premium => "premium",
            HandType::Strong => "strong",
            HandType::Medium => "medium",
            HandType::BluffCandidate => "bluff_candidate",
            HandType::Air => "air",
            HandType::NutsStrong => "nuts_strong",
            HandType::StrongMade => "strong_made",
            HandType::MediumMade => "medium_made",
            HandType::StrongDraw => "strong_draw",
            HandType::MediumDraw => "medium_draw",
            HandType::WeakDraw => "weak_draw",
            HandType::AirBluff => "air_bluff",
            HandType::BluffCatcher => "bluff_catcher",
        }
    }
}

impl fmt::Display for HandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandType::Premium => write!(f, "Premium"),
            HandType::Strong => write!(f, "Strong"),
            HandType::Medium => write!(f, "Medium"),
            HandType::BluffCandidate => write!(f, "Bluff Candidate"),
            HandType::Air => write!(f, "Air"),
            HandType::NutsStrong => write!(f, "Nuts/Strong"),
            HandType::StrongMade => write!(f, "Strong Made"),
            HandType::MediumMade => write!(f, "Medium Made"),
            HandType::StrongDraw => write!(f, "Strong Draw"),
            HandType::MediumDraw => write!(f, "Medium Draw"),
            HandType::WeakDraw => write!(f, "Weak Draw"),
            HandType::AirBluff => write!(f, "Air (bluff)"),
            HandType::BluffCatcher => write!(f, "Bluff Catcher"),
        }
    }
}

impl fmt::Display for BettingPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BettingPurpose::Value => write!(f, "VALUE"),
            BettingPurpose::Bluff => write!(f, "BLUFF"),
            BettingPurpose::SemiBluff => write!(f, "SEMI-BLUFF"),
            BettingPurpose::Mixed => write!(f, "MIXED"),
            BettingPurpose::BluffCatcher => write!(f, "BLUFF CATCH"),
            BettingPurpose::Fold => write!(f, "FOLD"),
        }
    }
}

/// Applies the value threshold: a value type without the equity to back it
/// plays as a bluff catcher.
fn enforce_value_threshold(hand_type: HandType, equity: Option<f64>) -> HandType {
    match equity {
        Some(eq) if hand_type.purpose() == BettingPurpose::Value && eq < VALUE_EQUITY_MIN => {
            HandType::BluffCatcher
        }
        _ => hand_type,
    }
}

/// Preflop type from the heuristic strength and the opening chart.
pub fn classify_preflop(
    strength: f64,
    is_suited: bool,
    chart: OpeningClass,
    equity: Option<f64>,
) -> HandType {
    let hand_type = if strength >= 80.0 {
        HandType::Premium
    } else if strength >= 65.0 || (chart == OpeningClass::InRangeRaise && strength >= 55.0) {
        HandType::Strong
    } else if strength >= 45.0 || chart != OpeningClass::OutsideRange {
        HandType::Medium
    } else if is_suited && strength >= 28.0 {
        HandType::BluffCandidate
    } else {
        HandType::Air
    };
    enforce_value_threshold(hand_type, equity)
}

/// Postflop type from the made hand, draws, equity and board texture.
///
/// Only the part of the hand the hole cards contribute counts: a pair that
/// sits entirely on the board is not a made hand for the hero.
pub fn classify_postflop(
    hand: &Hand,
    hole_cards: &[Card],
    board: &[Card],
    outs: &OutsResult,
    equity: f64,
    texture: &BoardTexture,
) -> HandType {
    let board_category = made_category(board);
    let hero_made = hand.category > board_category;
    let draw_outs = outs.draw_outs();
    let top_board = board.iter().map(|c| c.value()).max().unwrap_or(0);

    let pairing_outs = outs
        .improving_cards
        .iter()
        .filter(|card| hole_cards.iter().any(|h| h.value() == card.value()))
        .count() as u32;

    let draw_type = if draw_outs >= 12 || (draw_outs >= 8 && draw_outs + pairing_outs >= 14) {
        Some(HandType::StrongDraw)
    } else if draw_outs >= 8 {
        Some(HandType::MediumDraw)
    } else if draw_outs >= 4 {
        Some(HandType::WeakDraw)
    } else {
        None
    };

    let hand_type = if !hero_made {
        match draw_type {
            Some(draw) => draw,
            None if equity >= 30.0 && hand.category >= HandCategory::Pair => HandType::BluffCatcher,
            None if equity >= 25.0 || !texture.is_draw_heavy() => HandType::AirBluff,
            None => HandType::Air,
        }
    } else {
        match hand.category {
            HandCategory::FullHouse
            | HandCategory::FourOfAKind
            | HandCategory::StraightFlush
            | HandCategory::RoyalFlush => HandType::NutsStrong,
            HandCategory::Straight | HandCategory::Flush if !texture.is_paired => {
                HandType::NutsStrong
            }
            HandCategory::Straight | HandCategory::Flush => HandType::StrongMade,
            HandCategory::ThreeOfAKind | HandCategory::TwoPair => HandType::StrongMade,
            HandCategory::Pair => {
                let pair_rank = hand.kickers.first().copied().unwrap_or(0);
                let uses_hole = hole_cards.iter().any(|c| c.value() == pair_rank);
                if !uses_hole {
                    draw_type.unwrap_or(HandType::AirBluff)
                } else if pair_rank >= top_board {
                    if equity >= 60.0 {
                        HandType::StrongMade
                    } else {
                        HandType::MediumMade
                    }
                } else if let Some(draw @ HandType::StrongDraw) = draw_type {
                    draw
                } else if equity >= 30.0 {
                    HandType::BluffCatcher
                } else {
                    draw_type.unwrap_or(HandType::Air)
                }
            }
            HandCategory::HighCard => draw_type.unwrap_or(HandType::Air),
        }
    };

    enforce_value_threshold(hand_type, Some(equity))
}

pub fn explain_approach(hand_type: HandType) -> &'static str {
    match hand_type {
        HandType::Premium => "Premium hand: build the pot and get called by worse",
        HandType::Strong => "Strong hand: extract value from medium holdings and draws",
        HandType::Medium => "Medium hand: thin value at times, pot control otherwise",
        HandType::BluffCandidate => "Bluff candidate: represent strength and fold out better hands",
        HandType::Air => "Too weak to continue: no equity and no profitable bluff",
        HandType::NutsStrong => "Monster hand: charge the draws and get paid",
        HandType::StrongMade => "Strong made hand: bet for value and protection",
        HandType::MediumMade => "Medium made hand: mix thin value with pot control",
        HandType::StrongDraw => "Strong draw: equity when called plus fold equity",
        HandType::MediumDraw => "Drawing hand: backup equity plus a chance to win now",
        HandType::WeakDraw => "Weak draw: relies on fold equity more than card equity",
        HandType::AirBluff => "Air: bluff only with fold equity on our side",
        HandType::BluffCatcher => "Bluff catcher: beats bluffs, loses to value, avoid heavy pressure",
    }
}
