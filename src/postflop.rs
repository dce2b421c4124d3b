use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::cards::{Card, Rank, ALL_SUITS};
use crate::error::{AdvisorError, AdvisorResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectedness {
    Disconnected,
    SemiConnected,
    Connected,
}

impl Connectedness {
    /// From the gaps between neighbouring distinct ranks (ascending).
    fn from_gaps(gaps: &[u8]) -> Connectedness {
        let adjacent = gaps.contains(&1);
        let close = gaps.iter().filter(|&&g| g <= 2).count();
        if adjacent && close >= 2 {
            Connectedness::Connected
        } else if adjacent || gaps.contains(&2) {
            Connectedness::SemiConnected
        } else {
            Connectedness::Disconnected
        }
    }

    fn wet_points(self) -> i32 {
        match self {
            Connectedness::Connected => 2,
            Connectedness::SemiConnected => 1,
            Connectedness::Disconnected => 0,
        }
    }
}

impl fmt::Display for Connectedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Connectedness::Disconnected => "disconnected",
            Connectedness::SemiConnected => "semi-connected",
            Connectedness::Connected => "connected",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Wetness {
    Dry,
    Medium,
    Wet,
}

impl Wetness {
    fn from_score(score: i32) -> Wetness {
        match score {
            s if s >= 3 => Wetness::Wet,
            s if s >= 1 => Wetness::Medium,
            _ => Wetness::Dry,
        }
    }
}

impl fmt::Display for Wetness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Wetness::Dry => "dry",
            Wetness::Medium => "medium",
            Wetness::Wet => "wet",
        };
        f.write_str(label)
    }
}

/// Dominant feature of a board for sizing decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureClass {
    FlushHeavy,
    StraightHeavy,
    Paired,
    Dry,
}

/// Suit distribution of the board: most cards sharing one suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SuitSpread {
    Rainbow,
    TwoTone,
    Monotone,
}

impl SuitSpread {
    fn of(cards: &[Card]) -> (SuitSpread, usize) {
        let most = ALL_SUITS
            .iter()
            .map(|&s| cards.iter().filter(|c| c.suit == s).count())
            .max()
            .unwrap_or(0);
        let spread = match most {
            0 | 1 => SuitSpread::Rainbow,
            2 => SuitSpread::TwoTone,
            _ => SuitSpread::Monotone,
        };
        (spread, most)
    }

    fn label(self) -> &'static str {
        match self {
            SuitSpread::Rainbow => "rainbow",
            SuitSpread::TwoTone => "two-tone",
            SuitSpread::Monotone => "monotone",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BoardTexture {
    pub cards: Vec<Card>,
    pub high_card: char,
    pub is_paired: bool,
    pub is_monotone: bool,
    pub is_two_tone: bool,
    pub is_rainbow: bool,
    pub flush_draw_possible: bool,
    pub straight_draw_possible: bool,
    pub connectedness: Connectedness,
    pub wetness: Wetness,
    pub class: TextureClass,
    /// Short label such as "two-tone connected Q-high".
    pub category: String,
    pub draws: Vec<String>,
}

impl BoardTexture {
    /// Flush-heavy, straight-heavy or wet boards where draws need charging.
    pub fn is_draw_heavy(&self) -> bool {
        matches!(self.class, TextureClass::FlushHeavy | TextureClass::StraightHeavy)
            || self.wetness == Wetness::Wet
    }
}

/// Reads the texture of a flop, turn or river.
pub fn analyze_board(board_cards: &[Card]) -> AdvisorResult<BoardTexture> {
    if board_cards.len() < 3 {
        return Err(AdvisorError::InsufficientCards {
            need: 3,
            got: board_cards.len(),
        });
    }

    let ranks: BTreeSet<u8> = board_cards.iter().map(|c| c.value()).collect();
    let is_paired = ranks.len() < board_cards.len();
    let top = ranks.iter().next_back().copied().unwrap_or(0);
    let high_card = Rank::from_value(top).map(|r| r.to_char()).unwrap_or('?');

    let (spread, most_suited) = SuitSpread::of(board_cards);
    let flush_draw_possible = most_suited >= 2 && board_cards.len() < 5;
    let straight_draw_possible = has_straight_draw(&ranks);

    let ascending: Vec<u8> = ranks.iter().copied().collect();
    let gaps: Vec<u8> = ascending.windows(2).map(|w| w[1] - w[0]).collect();
    let connectedness = Connectedness::from_gaps(&gaps);

    let suit_points = match spread {
        SuitSpread::Monotone => 3,
        SuitSpread::TwoTone => 1,
        SuitSpread::Rainbow => 0,
    };
    let pair_points = if is_paired { -1 } else { 0 };
    let wetness = Wetness::from_score(suit_points + connectedness.wet_points() + pair_points);

    let class = if spread == SuitSpread::Monotone {
        TextureClass::FlushHeavy
    } else if connectedness == Connectedness::Connected {
        TextureClass::StraightHeavy
    } else if is_paired {
        TextureClass::Paired
    } else if wetness == Wetness::Wet {
        TextureClass::FlushHeavy
    } else {
        TextureClass::Dry
    };

    let draws: Vec<String> = [
        (flush_draw_possible && spread == SuitSpread::TwoTone, "flush draw"),
        (spread == SuitSpread::Monotone, "flush complete / 4-flush"),
        (straight_draw_possible, "straight draw"),
        (is_paired, "paired board"),
    ]
    .iter()
    .filter(|(present, _)| *present)
    .map(|(_, label)| label.to_string())
    .collect();

    let mut category = format!("{} {}", spread.label(), connectedness);
    if is_paired {
        category.push_str(" paired");
    }
    category.push_str(&format!(" {}-high", high_card));

    Ok(BoardTexture {
        cards: board_cards.to_vec(),
        high_card,
        is_paired,
        is_monotone: spread == SuitSpread::Monotone,
        is_two_tone: spread == SuitSpread::TwoTone,
        is_rainbow: spread == SuitSpread::Rainbow,
        flush_draw_possible,
        straight_draw_possible,
        connectedness,
        wetness,
        class,
        category,
        draws,
    })
}

/// Three distinct ranks inside any five-rank window, the ace also counting low.
fn has_straight_draw(ranks: &BTreeSet<u8>) -> bool {
    let mut values: Vec<u8> = ranks.iter().copied().collect();
    if ranks.contains(&14) {
        values.insert(0, 1);
    }
    values
        .iter()
        .any(|&low| values.iter().filter(|&&v| v >= low && v <= low + 4).count() >= 3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gap_classification() {
        assert_eq!(Connectedness::from_gaps(&[1, 1]), Connectedness::Connected);
        assert_eq!(Connectedness::from_gaps(&[1, 2]), Connectedness::Connected);
        assert_eq!(Connectedness::from_gaps(&[2, 5]), Connectedness::SemiConnected);
        assert_eq!(Connectedness::from_gaps(&[4, 5]), Connectedness::Disconnected);
    }
}
